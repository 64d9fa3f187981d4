use anyhow::Result;
use planner_core::clock::Clock;
use planner_core::repository::TaskRepository;
use planner_core::service::Scheduler;

use crate::cli::NextDateCommand;

/// Prints the bare `YYYYMMDD` date so the output can be used in scripts.
pub async fn next_date<R: TaskRepository, C: Clock>(
    scheduler: &Scheduler<R, C>,
    command: NextDateCommand,
) -> Result<()> {
    let next = scheduler
        .next_date(command.now.as_deref(), &command.date, &command.repeat)
        .await?;
    println!("{next}");
    Ok(())
}
