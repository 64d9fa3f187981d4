use anyhow::Result;
use planner_core::clock::Clock;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::ShowCommand;
use crate::views::table::display_task;

pub async fn show_task<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: ShowCommand,
) -> Result<()> {
    let task = scheduler.get_task(command.id).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        display_task(&task, scheduler.today());
    }
    Ok(())
}
