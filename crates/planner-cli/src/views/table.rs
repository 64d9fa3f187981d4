use chrono::Duration;
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::OwoColorize;
use planner_core::date::TaskDate;
use planner_core::models::Task;

/// "today", "tomorrow", "in 2 weeks", "3 days ago", ...
pub fn relative_day(date: TaskDate, today: TaskDate) -> String {
    match date.days_since(today) {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        days => HumanTime::from(Duration::days(days)).to_string(),
    }
}

pub fn build_task_table(tasks: &[Task], today: TaskDate) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Due", "Title", "Repeat", "Comment"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(task.id));
        row.add_cell(Cell::new(task.date));

        let due = Cell::new(relative_day(task.date, today));
        row.add_cell(if task.date < today {
            due.fg(Color::Red)
        } else if task.date == today {
            due.fg(Color::Yellow)
        } else {
            due
        });

        let mut title = Cell::new(&task.title);
        if task.date == today {
            title = title.add_attribute(Attribute::Bold);
        }
        row.add_cell(title);

        row.add_cell(if task.is_recurring() {
            Cell::new(format!("↻ {}", task.repeat)).fg(Color::Cyan)
        } else {
            Cell::new("")
        });
        row.add_cell(Cell::new(task.comment.as_deref().unwrap_or("")));
        table.add_row(row);
    }

    table
}

pub fn display_tasks(tasks: &[Task], today: TaskDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", build_task_table(tasks, today));
}

pub fn display_task(task: &Task, today: TaskDate) {
    println!("{} {}", "Task".bold(), task.id.yellow());
    println!("  Title:   {}", task.title.bright_white().bold());
    println!("  Date:    {} ({})", task.date, relative_day(task.date, today));
    if task.is_recurring() {
        println!("  Repeat:  {}", task.repeat.cyan());
    }
    if let Some(comment) = &task.comment {
        println!("  Comment: {comment}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(text: &str) -> TaskDate {
        TaskDate::parse(text).unwrap()
    }

    #[rstest]
    #[case("20240310", "today")]
    #[case("20240311", "tomorrow")]
    #[case("20240309", "yesterday")]
    fn test_relative_day(#[case] day: &str, #[case] expected: &str) {
        assert_eq!(relative_day(date(day), date("20240310")), expected);
    }

    #[test]
    fn test_relative_day_direction() {
        let today = date("20240310");
        assert!(relative_day(date("20240401"), today).starts_with("in "));
        assert!(relative_day(date("20240201"), today).ends_with(" ago"));
    }

    #[test]
    fn test_table_lists_every_task() {
        let tasks = vec![
            Task {
                id: 1,
                date: date("20240310"),
                title: "Water plants".to_string(),
                comment: None,
                repeat: "d 3".to_string(),
            },
            Task {
                id: 2,
                date: date("20240401"),
                title: "Dentist".to_string(),
                comment: Some("bring card".to_string()),
                repeat: String::new(),
            },
        ];
        let rendered = build_task_table(&tasks, date("20240310")).to_string();
        for expected in ["Water plants", "d 3", "Dentist", "bring card", "20240401"] {
            assert!(rendered.contains(expected), "missing {expected} in\n{rendered}");
        }
    }
}
