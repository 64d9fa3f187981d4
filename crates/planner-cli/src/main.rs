use clap::Parser;
use owo_colors::{OwoColorize, Style};
use planner_core::db;
use planner_core::error::CoreError;
use planner_core::repository::SqliteRepository;
use planner_core::service::Scheduler;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let config = config::Config::new()?;
    init_tracing(&config.log_level);
    debug!(?config, "configuration loaded");

    let clock = config.clock()?;
    let pool = db::establish_connection(&config.database_path).await?;
    let scheduler = Scheduler::new(SqliteRepository::new(pool), clock.as_ref())
        .with_list_limit(config.list_limit);

    match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&scheduler, command).await,
        cli::Commands::List(command) => commands::list::list_tasks(&scheduler, command).await,
        cli::Commands::Show(command) => commands::show::show_task(&scheduler, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(&scheduler, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(&scheduler, command).await,
        cli::Commands::Done(command) => commands::done::done_task(&scheduler, command).await,
        cli::Commands::NextDate(command) => {
            commands::next_date::next_date(&scheduler, command).await
        }
        cli::Commands::Upcoming(command) => {
            commands::upcoming::upcoming_dates(&scheduler, command).await
        }
    }
}

/// Logs go to stderr so stdout stays clean for `--json` and `next-date`.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotFound(id)) => {
            eprintln!("{} Task {} not found", "Error:".style(error_style), id);
        }
        Some(CoreError::Rule(rule_error)) => {
            eprintln!("{} Invalid repeat rule: {}", "Error:".style(error_style), rule_error);
        }
        Some(CoreError::Conflict(id)) => {
            eprintln!(
                "{} Task {} changed while it was being completed, nothing was written",
                "Error:".style(error_style),
                id.yellow()
            );
        }
        Some(core_error @ (CoreError::Database(_) | CoreError::Migration(_) | CoreError::Io(_))) => {
            let source = std::error::Error::source(core_error)
                .map(|s| format!(": {s}"))
                .unwrap_or_default();
            eprintln!("{} {}{}", "Error:".style(error_style), core_error, source);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
