use crate::completion::{plan_completion, Completion};
use crate::date::TaskDate;
use crate::error::CoreError;
use crate::models::{NewTask, Task, TaskRow};
use crate::repository::search::like_pattern;
use crate::repository::{SqliteRepository, TaskRepository, TaskSearch};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info, warn};

const SELECT_TASKS: &str = "SELECT id, date, title, comment, repeat FROM scheduler";
const SELECT_TASK_BY_ID: &str = "SELECT id, date, title, comment, repeat FROM scheduler WHERE id = $1";

#[async_trait]
impl TaskRepository for SqliteRepository {
    async fn insert_task(&self, task: &NewTask) -> Result<Task, CoreError> {
        let id = sqlx::query(
            "INSERT INTO scheduler (date, title, comment, repeat) VALUES ($1, $2, $3, $4)",
        )
        .bind(task.date.to_string())
        .bind(task.title.as_str())
        .bind(task.comment.as_deref())
        .bind(task.repeat.as_str())
        .execute(self.pool())
        .await?
        .last_insert_rowid();

        info!(id, date = %task.date, repeat = %task.repeat, "task added");
        Ok(task.clone().into_task(id))
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError> {
        let row: Option<TaskRow> = sqlx::query_as(SELECT_TASK_BY_ID)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"UPDATE scheduler
            SET date = $1, title = $2, comment = $3, repeat = $4
            WHERE id = $5
            "#,
        )
        .bind(task.date.to_string())
        .bind(task.title.as_str())
        .bind(task.comment.as_deref())
        .bind(task.repeat.as_str())
        .bind(task.id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(task.id));
        }
        info!(id = task.id, date = %task.date, "task updated");
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id));
        }
        info!(id, "task deleted");
        Ok(())
    }

    async fn find_tasks(&self, search: Option<&TaskSearch>, limit: u32) -> Result<Vec<Task>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_TASKS);

        match search {
            Some(TaskSearch::OnDate(date)) => {
                query_builder.push(" WHERE date = ").push_bind(date.to_string());
            }
            Some(TaskSearch::Text(text)) => {
                let pattern = like_pattern(text);
                query_builder
                    .push(" WHERE title LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR comment LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\'");
            }
            None => {}
        }

        query_builder.push(" ORDER BY date, id LIMIT ").push_bind(i64::from(limit));

        let rows: Vec<TaskRow> = query_builder.build_query_as().fetch_all(self.pool()).await?;
        debug!(count = rows.len(), ?search, "listed tasks");
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn complete_task(&self, id: i64, today: TaskDate) -> Result<Completion, CoreError> {
        let mut tx = self.pool().begin().await?;

        // Claims the write lock before the read: a concurrent completion
        // waits here and then reads the row this one wrote.
        sqlx::query("UPDATE scheduler SET id = id WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| busy_as_conflict(e, id))?;

        let row: TaskRow = sqlx::query_as(SELECT_TASK_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound(id))?;
        let task = Task::try_from(row)?;

        let completion = plan_completion(task.date, &task.repeat, today)?;

        // Writes only apply if the row still holds what was read above.
        let stored_date = task.date.to_string();
        let result = match completion {
            Completion::Retire => {
                sqlx::query(
                    "DELETE FROM scheduler WHERE id = $1 AND date = $2 AND COALESCE(repeat, '') = $3",
                )
                .bind(id)
                .bind(stored_date.as_str())
                .bind(task.repeat.as_str())
                .execute(&mut *tx)
                .await?
            }
            Completion::Reschedule(next) => {
                sqlx::query(
                    r#"UPDATE scheduler
                    SET date = $1
                    WHERE id = $2 AND date = $3 AND COALESCE(repeat, '') = $4
                    "#,
                )
                .bind(next.to_string())
                .bind(id)
                .bind(stored_date.as_str())
                .bind(task.repeat.as_str())
                .execute(&mut *tx)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            warn!(id, "task changed while it was being completed");
            return Err(CoreError::Conflict(id));
        }

        tx.commit().await.map_err(|e| busy_as_conflict(e, id))?;
        info!(id, ?completion, "task completed");
        Ok(completion)
    }
}

/// SQLITE_BUSY and SQLITE_LOCKED mean another writer held the task past the
/// busy timeout.
fn busy_as_conflict(error: sqlx::Error, id: i64) -> CoreError {
    let locked = error
        .as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6));
    if locked {
        warn!(id, "task is locked by another completion");
        CoreError::Conflict(id)
    } else {
        CoreError::Database(error)
    }
}
