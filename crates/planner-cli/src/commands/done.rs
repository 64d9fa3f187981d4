use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::clock::Clock;
use planner_core::completion::Completion;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::DoneCommand;
use crate::views::table::relative_day;

pub async fn done_task<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: DoneCommand,
) -> Result<()> {
    let completion = scheduler.complete_task(command.id).await?;

    if command.json {
        println!("{}", serde_json::to_string(&completion)?);
        return Ok(());
    }

    match completion {
        Completion::Retire => {
            println!("{} Completed task {}, removed", "✓".green().bold(), command.id);
        }
        Completion::Reschedule(next) => {
            println!(
                "{} Completed task {}, next on {} ({})",
                "✓".green().bold(),
                command.id,
                next,
                relative_day(next, scheduler.today())
            );
        }
    }
    Ok(())
}
