use chrono::NaiveDate;

use crate::date::TaskDate;
use crate::models::Task;

/// Input format of date searches, e.g. `08.03.2024`.
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// A listing filter derived from a free-form search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSearch {
    /// Tasks scheduled on exactly this day.
    OnDate(TaskDate),
    /// Tasks whose title or comment contains the text, ASCII case-insensitively.
    Text(String),
}

impl TaskSearch {
    /// `None` for a blank term, which lists everything.
    pub fn parse(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(term, SEARCH_DATE_FORMAT) {
            Ok(date) => Some(TaskSearch::OnDate(date.into())),
            Err(_) => Some(TaskSearch::Text(term.to_string())),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskSearch::OnDate(date) => task.date == *date,
            TaskSearch::Text(text) => {
                let needle = text.to_ascii_lowercase();
                task.title.to_ascii_lowercase().contains(&needle)
                    || task
                        .comment
                        .as_deref()
                        .is_some_and(|c| c.to_ascii_lowercase().contains(&needle))
            }
        }
    }
}

/// `%text%` for `LIKE ... ESCAPE '\'`, with the wildcards in `text` escaped.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, comment: Option<&str>) -> Task {
        Task {
            id: 1,
            date: TaskDate::parse("20240308").unwrap(),
            title: title.to_string(),
            comment: comment.map(String::from),
            repeat: String::new(),
        }
    }

    #[test]
    fn test_parse_term() {
        assert_eq!(TaskSearch::parse(""), None);
        assert_eq!(TaskSearch::parse("  "), None);
        assert_eq!(
            TaskSearch::parse("08.03.2024"),
            Some(TaskSearch::OnDate(TaskDate::parse("20240308").unwrap()))
        );
        assert_eq!(
            TaskSearch::parse("31.02.2024"),
            Some(TaskSearch::Text("31.02.2024".to_string()))
        );
        assert_eq!(
            TaskSearch::parse(" gym "),
            Some(TaskSearch::Text("gym".to_string()))
        );
    }

    #[test]
    fn test_matches() {
        let gym = task("Gym session", Some("leg day"));
        assert!(TaskSearch::parse("gym").unwrap().matches(&gym));
        assert!(TaskSearch::parse("LEG").unwrap().matches(&gym));
        assert!(TaskSearch::parse("08.03.2024").unwrap().matches(&gym));
        assert!(!TaskSearch::parse("09.03.2024").unwrap().matches(&gym));
        assert!(!TaskSearch::parse("swim").unwrap().matches(&task("Gym", None)));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("gym"), "%gym%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
