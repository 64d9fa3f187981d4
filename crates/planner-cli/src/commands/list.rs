use anyhow::Result;
use planner_core::clock::Clock;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::ListCommand;
use crate::views::table::display_tasks;

pub async fn list_tasks<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: ListCommand,
) -> Result<()> {
    let tasks = scheduler.list_tasks(command.search.as_deref()).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        display_tasks(&tasks, scheduler.today());
    }
    Ok(())
}
