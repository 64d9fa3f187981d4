use tracing::debug;

use crate::clock::Clock;
use crate::completion::Completion;
use crate::date::TaskDate;
use crate::error::CoreError;
use crate::models::{Task, TaskDraft};
use crate::recurrence::{next_occurrence, upcoming};
use crate::repository::{TaskRepository, TaskSearch, DEFAULT_LIST_LIMIT};
use crate::rule::parse_rule;

/// Task operations as front ends see them: drafts are validated against the
/// injected clock before anything reaches the repository.
pub struct Scheduler<R, C> {
    repository: R,
    clock: C,
    list_limit: u32,
}

impl<R: TaskRepository, C: Clock> Scheduler<R, C> {
    pub fn new(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Caps how many tasks `list_tasks` returns. Zero falls back to the default.
    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = if limit == 0 { DEFAULT_LIST_LIMIT } else { limit };
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn today(&self) -> TaskDate {
        self.clock.today()
    }

    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task, CoreError> {
        let task = draft.normalize(self.today())?;
        self.repository.insert_task(&task).await
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, CoreError> {
        self.repository
            .find_task_by_id(id)
            .await?
            .ok_or(CoreError::NotFound(id))
    }

    /// Replaces every field of task `id` with the validated draft.
    pub async fn update_task(&self, id: i64, draft: TaskDraft) -> Result<Task, CoreError> {
        let task = draft.normalize(self.today())?.into_task(id);
        self.repository.update_task(&task).await?;
        Ok(task)
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        self.repository.delete_task(id).await
    }

    /// Marks task `id` done: one-off tasks are removed, recurring ones move
    /// to their next occurrence after today.
    pub async fn complete_task(&self, id: i64) -> Result<Completion, CoreError> {
        self.repository.complete_task(id, self.today()).await
    }

    /// Tasks in date order, optionally narrowed by a search term.
    ///
    /// A term shaped like `DD.MM.YYYY` selects one day; anything else matches
    /// title or comment text. A blank term lists everything.
    pub async fn list_tasks(&self, term: Option<&str>) -> Result<Vec<Task>, CoreError> {
        let search = term.and_then(TaskSearch::parse);
        debug!(?search, limit = self.list_limit, "listing tasks");
        self.repository.find_tasks(search.as_ref(), self.list_limit).await
    }

    /// Next date for raw inputs; `now` defaults to today.
    pub async fn next_date(&self, now: Option<&str>, date: &str, repeat: &str) -> Result<TaskDate, CoreError> {
        let now = match now {
            Some(text) => TaskDate::parse(text)?,
            None => self.today(),
        };
        let anchor = TaskDate::parse(date)?;
        let rule = parse_rule(repeat)?;
        Ok(next_occurrence(now, anchor, &rule))
    }

    /// Task `id` together with the next `count` dates it would be
    /// rescheduled to.
    pub async fn upcoming(
        &self,
        id: i64,
        count: usize,
    ) -> Result<(Task, Vec<TaskDate>), CoreError> {
        let task = self.get_task(id).await?;
        let rule = task
            .rule()?
            .ok_or_else(|| CoreError::InvalidInput(format!("task {id} does not repeat")))?;
        let dates = upcoming(self.today(), task.date, &rule).take(count).collect();
        Ok((task, dates))
    }
}
