use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::date::TaskDate;
use crate::error::{CoreError, RuleError};
use crate::recurrence::next_occurrence;
use crate::rule::{parse_rule, RecurrenceRule};

/// Longest repeat rule the `scheduler` table accepts.
pub const MAX_REPEAT_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub date: TaskDate,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Raw rule text; empty for tasks that do not recur.
    #[serde(default)]
    pub repeat: String,
}

impl Task {
    #[inline]
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }

    /// The parsed repeat rule, `None` for one-off tasks.
    pub fn rule(&self) -> Result<Option<RecurrenceRule>, RuleError> {
        if self.is_recurring() {
            parse_rule(&self.repeat).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Row shape of the `scheduler` table.
#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub comment: Option<String>,
    pub repeat: Option<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            date: TaskDate::parse(&row.date)?,
            title: row.title,
            comment: row.comment.filter(|c| !c.is_empty()),
            repeat: row.repeat.unwrap_or_default(),
        })
    }
}

/// Task fields as a client submits them for add or update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskDraft {
    /// `YYYYMMDD`; missing or empty means today.
    pub date: Option<String>,
    pub title: String,
    pub comment: Option<String>,
    pub repeat: Option<String>,
}

/// Validated task fields, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: TaskDate,
    pub title: String,
    pub comment: Option<String>,
    pub repeat: String,
}

impl NewTask {
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

impl TaskDraft {
    /// Validates the draft and settles its date relative to `today`.
    ///
    /// # Behavior
    /// - title is required, surrounding whitespace is dropped
    /// - a missing date becomes `today`
    /// - a repeat rule must parse; a past date moves to the rule's next occurrence
    /// - without a rule, a past date becomes `today`
    pub fn normalize(self, today: TaskDate) -> Result<NewTask, CoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("title is required".to_string()));
        }

        let repeat = self.repeat.as_deref().map(str::trim).unwrap_or_default();
        if repeat.len() > MAX_REPEAT_LEN {
            return Err(CoreError::InvalidInput(format!(
                "repeat rule is longer than {MAX_REPEAT_LEN} characters"
            )));
        }

        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => TaskDate::parse(text)?,
            None => today,
        };

        let date = if repeat.is_empty() {
            date.max(today)
        } else {
            let rule = parse_rule(repeat)?;
            if date < today {
                next_occurrence(today, date, &rule)
            } else {
                date
            }
        };

        Ok(NewTask {
            date,
            title: title.to_string(),
            comment: self.comment.filter(|c| !c.trim().is_empty()),
            repeat: repeat.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> TaskDate {
        TaskDate::parse(text).unwrap()
    }

    fn draft(date: Option<&str>, repeat: Option<&str>) -> TaskDraft {
        TaskDraft {
            date: date.map(String::from),
            title: "Water the plants".to_string(),
            comment: None,
            repeat: repeat.map(String::from),
        }
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let today = date("20240310");
        assert_eq!(draft(None, None).normalize(today).unwrap().date, today);
        assert_eq!(draft(Some(""), None).normalize(today).unwrap().date, today);
    }

    #[test]
    fn test_past_date_without_rule_becomes_today() {
        let today = date("20240310");
        let task = draft(Some("20240101"), None).normalize(today).unwrap();
        assert_eq!(task.date, today);
        let task = draft(Some("20240401"), None).normalize(today).unwrap();
        assert_eq!(task.date, date("20240401"));
    }

    #[test]
    fn test_past_date_with_rule_moves_to_next_occurrence() {
        let today = date("20240310");
        let task = draft(Some("20240301"), Some("d 5")).normalize(today).unwrap();
        assert_eq!(task.date, date("20240311"));
        assert_eq!(task.repeat, "d 5");
    }

    #[test]
    fn test_today_with_rule_is_kept() {
        let today = date("20240310");
        let task = draft(Some("20240310"), Some("d 1")).normalize(today).unwrap();
        assert_eq!(task.date, today);
    }

    #[test]
    fn test_rejects_bad_input() {
        let today = date("20240310");
        let mut untitled = draft(None, None);
        untitled.title = "   ".to_string();
        assert!(matches!(untitled.normalize(today), Err(CoreError::InvalidInput(_))));
        assert!(matches!(
            draft(Some("10.03.2024"), None).normalize(today),
            Err(CoreError::InvalidDate(_))
        ));
        assert!(matches!(
            draft(None, Some("w 9")).normalize(today),
            Err(CoreError::Rule(RuleError::OutOfRange { .. }))
        ));
        let long = format!("w {}", vec!["1"; 70].join(","));
        assert!(matches!(
            draft(None, Some(&long)).normalize(today),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blank_repeat_and_comment_are_cleared() {
        let mut input = draft(None, Some("  "));
        input.comment = Some(" ".to_string());
        let task = input.normalize(date("20240310")).unwrap();
        assert_eq!(task.repeat, "");
        assert_eq!(task.comment, None);
    }

    #[test]
    fn test_row_with_corrupt_date_is_rejected() {
        let row = TaskRow {
            id: 1,
            date: "2024-03-10".to_string(),
            title: "t".to_string(),
            comment: None,
            repeat: None,
        };
        assert!(matches!(Task::try_from(row), Err(CoreError::InvalidDate(_))));
    }

    #[test]
    fn test_task_rule() {
        let mut task = draft(None, Some("w 1"))
            .normalize(date("20240310"))
            .unwrap()
            .into_task(7);
        assert!(task.is_recurring());
        assert!(task.rule().unwrap().is_some());
        task.repeat.clear();
        assert_eq!(task.rule().unwrap(), None);
    }
}
