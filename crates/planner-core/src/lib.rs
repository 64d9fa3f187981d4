//! # Planner Core Library
//!
//! Recurrence rules, next-date calculation and task storage for a personal
//! task scheduler.
//!
//! ## Features
//!
//! - **Compact Rules**: `d <n>`, `y`, `w <days>` and `m <days> [<months>]`,
//!   validated once at parse time into a closed [`rule::RecurrenceRule`]
//! - **Deterministic Calculation**: pure next-date functions that never
//!   return the reference day itself
//! - **Safe Completion**: retire or reschedule as a single read-decide-write
//!   unit per task
//! - **Injected Time**: every "today" comes from a [`clock::Clock`]
//!
//! ## Core Modules
//!
//! - [`date`]: the `YYYYMMDD` calendar day type
//! - [`rule`]: recurrence rule grammar and parser
//! - [`recurrence`]: next-occurrence calculation
//! - [`completion`]: what marking a task done does
//! - [`models`]: tasks and client drafts
//! - [`repository`]: data access layer with Repository pattern
//! - [`service`]: the [`service::Scheduler`] facade used by front ends
//! - [`db`]: database connection and migration management
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use planner_core::{
//!     clock::SystemClock, db, models::TaskDraft, repository::SqliteRepository,
//!     service::Scheduler,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), planner_core::error::CoreError> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let scheduler = Scheduler::new(SqliteRepository::new(pool), SystemClock);
//!
//!     let task = scheduler
//!         .add_task(TaskDraft {
//!             title: "Water the plants".to_string(),
//!             repeat: Some("w 1,4".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created task {} due {}", task.id, task.date);
//!
//!     let outcome = scheduler.complete_task(task.id).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod completion;
pub mod date;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod rule;
pub mod service;
