use clap::{Parser, Subcommand};

/// A personal task scheduler with compact recurrence rules
#[derive(Parser, Debug)]
#[command(name = "planner", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks, optionally filtered by text or a DD.MM.YYYY date
    List(ListCommand),
    /// Show a single task
    Show(ShowCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Mark a task as done
    Done(DoneCommand),
    /// Calculate the next date of a repeat rule
    NextDate(NextDateCommand),
    /// Preview the next dates of a recurring task
    Upcoming(UpcomingCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The date of the task (YYYYMMDD), defaults to today
    #[clap(short, long)]
    pub date: Option<String>,
    /// A free-form comment
    #[clap(short, long)]
    pub comment: Option<String>,
    /// Repeat rule: "d <n>", "y", "w <days>" or "m <days> [<months>]"
    #[clap(short, long)]
    pub repeat: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Text to look for in titles and comments, or a date as DD.MM.YYYY
    pub search: Option<String>,
    /// Print the tasks as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the task
    pub id: i64,
    /// Print the task as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long, conflicts_with = "comment")]
    pub comment_clear: bool,

    #[arg(long)]
    pub repeat: Option<String>,
    #[arg(long, conflicts_with = "repeat")]
    pub repeat_clear: bool,
}

impl EditCommand {
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.date.is_some()
            || self.comment.is_some()
            || self.comment_clear
            || self.repeat.is_some()
            || self.repeat_clear
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: i64,
    /// Delete without asking for confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// The ID of the task to mark as done
    pub id: i64,
    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NextDateCommand {
    /// The anchor date (YYYYMMDD)
    #[arg(long)]
    pub date: String,
    /// The repeat rule
    #[arg(long)]
    pub repeat: String,
    /// The reference day (YYYYMMDD), defaults to today
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct UpcomingCommand {
    /// The ID of a recurring task
    pub id: i64,
    /// How many dates to show
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,
}
