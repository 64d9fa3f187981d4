use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::clock::Clock;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::UpcomingCommand;
use crate::views::table::relative_day;

pub async fn upcoming_dates<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: UpcomingCommand,
) -> Result<()> {
    let (task, dates) = scheduler.upcoming(command.id, command.count).await?;
    let today = scheduler.today();

    println!("{} ({})", task.title.bold(), task.repeat.cyan());
    for date in dates {
        println!(
            "  {}  {}  {}",
            date,
            date.naive().format("%a"),
            relative_day(date, today).bright_black()
        );
    }
    Ok(())
}
