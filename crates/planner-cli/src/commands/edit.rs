use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use planner_core::clock::Clock;
use planner_core::models::{Task, TaskDraft};
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::EditCommand;

pub async fn edit_task<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: EditCommand,
) -> Result<()> {
    if !command.has_changes() {
        bail!("Nothing to change, pass at least one of --title, --date, --comment or --repeat");
    }

    let current = scheduler.get_task(command.id).await?;
    let id = current.id;
    let updated = scheduler.update_task(id, merge(current, command)).await?;

    println!("{} Updated task {}", "✓".green().bold(), updated.id);
    println!("  Date: {}", updated.date);
    Ok(())
}

/// Full replacement draft: flags given on the command line win, the rest is
/// carried over from the stored task.
fn merge(current: Task, command: EditCommand) -> TaskDraft {
    let comment = if command.comment_clear {
        None
    } else {
        command.comment.or(current.comment)
    };
    let repeat = if command.repeat_clear {
        None
    } else {
        command.repeat.or(Some(current.repeat))
    };

    TaskDraft {
        date: Some(command.date.unwrap_or_else(|| current.date.to_string())),
        title: command.title.unwrap_or(current.title),
        comment,
        repeat,
    }
}
