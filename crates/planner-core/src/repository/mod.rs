use crate::completion::Completion;
use crate::date::TaskDate;
use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{NewTask, Task};
use async_trait::async_trait;

pub mod memory;
pub mod search;
pub mod tasks;

pub use memory::MemoryRepository;
pub use search::TaskSearch;

/// Default cap on the number of tasks a listing returns.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Storage boundary for task records.
///
/// `complete_task` is the one compound operation: implementations read the
/// task, plan the completion and write the outcome as a single unit, so two
/// concurrent completions of the same task can never both apply to the same
/// stored date.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert_task(&self, task: &NewTask) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError>;
    async fn update_task(&self, task: &Task) -> Result<(), CoreError>;
    async fn delete_task(&self, id: i64) -> Result<(), CoreError>;
    /// Tasks ordered by ascending date, then id, at most `limit` of them.
    async fn find_tasks(&self, search: Option<&TaskSearch>, limit: u32) -> Result<Vec<Task>, CoreError>;
    async fn complete_task(&self, id: i64, today: TaskDate) -> Result<Completion, CoreError>;
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
