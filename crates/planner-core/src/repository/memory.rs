use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::completion::{plan_completion, Completion};
use crate::date::TaskDate;
use crate::error::CoreError;
use crate::models::{NewTask, Task};
use crate::repository::{TaskRepository, TaskSearch};

/// Process-local task store.
///
/// Every operation runs under one lock, which also makes `complete_task`
/// atomic per task.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryRepository {
    async fn insert_task(&self, task: &NewTask) -> Result<Task, CoreError> {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let task = task.clone().into_task(state.last_id);
        state.tasks.insert(task.id, task.clone());
        info!(id = task.id, date = %task.date, "task added");
        Ok(task)
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError> {
        Ok(self.state.lock().await.tasks.get(&id).cloned())
    }

    async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        let stored = state
            .tasks
            .get_mut(&task.id)
            .ok_or(CoreError::NotFound(task.id))?;
        *stored = task.clone();
        info!(id = task.id, date = %task.date, "task updated");
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        self.state
            .lock()
            .await
            .tasks
            .remove(&id)
            .ok_or(CoreError::NotFound(id))?;
        info!(id, "task deleted");
        Ok(())
    }

    async fn find_tasks(&self, search: Option<&TaskSearch>, limit: u32) -> Result<Vec<Task>, CoreError> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| search.map_or(true, |s| s.matches(task)))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.date, task.id));
        tasks.truncate(limit as usize);
        Ok(tasks)
    }

    async fn complete_task(&self, id: i64, today: TaskDate) -> Result<Completion, CoreError> {
        let mut state = self.state.lock().await;
        let task = state.tasks.get(&id).ok_or(CoreError::NotFound(id))?;
        let completion = plan_completion(task.date, &task.repeat, today)?;
        match completion {
            Completion::Retire => {
                state.tasks.remove(&id);
            }
            Completion::Reschedule(next) => {
                if let Some(task) = state.tasks.get_mut(&id) {
                    task.date = next;
                }
            }
        }
        info!(id, ?completion, "task completed");
        Ok(completion)
    }
}
