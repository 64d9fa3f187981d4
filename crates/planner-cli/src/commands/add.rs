use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use planner_core::clock::Clock;
use planner_core::models::TaskDraft;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::AddCommand;
use crate::views::table::relative_day;

pub async fn add_task<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: AddCommand,
) -> Result<()> {
    let draft = TaskDraft {
        date: command.date,
        title: command.title,
        comment: command.comment,
        repeat: command.repeat,
    };
    let task = scheduler.add_task(draft).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    println!("{} Added task {}: {}", "✓".style(success_style), task.id, task.title);
    println!(
        "  {} Date: {} ({})",
        "→".style(info_style),
        task.date,
        relative_day(task.date, scheduler.today())
    );
    if task.is_recurring() {
        println!("  {} Repeats: {}", "→".style(info_style), task.repeat);
    }
    Ok(())
}
