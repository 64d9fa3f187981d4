use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use planner_core::clock::Clock;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::DeleteCommand;

pub async fn delete_task<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: DeleteCommand,
) -> Result<()> {
    let task = scheduler.get_task(command.id).await?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", task.title))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    scheduler.delete_task(task.id).await?;
    println!("{} Deleted task {}: {}", "✓".green().bold(), task.id, task.title);
    Ok(())
}
