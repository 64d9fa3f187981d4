use serde::Serialize;

use crate::date::TaskDate;
use crate::error::RuleError;
use crate::recurrence::next_occurrence;
use crate::rule::parse_rule;

/// What marking a task done does to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "date", rename_all = "lowercase")]
pub enum Completion {
    /// Non-recurring task: delete it.
    Retire,
    /// Recurring task: keep it and move its date, nothing else changes.
    Reschedule(TaskDate),
}

/// Decides the outcome of completing a task stored with `date` and `repeat`.
///
/// A stored rule that no longer parses is reported rather than skipped, since
/// it means the record is corrupt. Calling this again with a later `now`
/// advances the task further, so callers must run it once per completion.
pub fn plan_completion(
    date: TaskDate,
    repeat: &str,
    now: impl Into<TaskDate>,
) -> Result<Completion, RuleError> {
    if repeat.is_empty() {
        return Ok(Completion::Retire);
    }
    let rule = parse_rule(repeat)?;
    Ok(Completion::Reschedule(next_occurrence(now, date, &rule)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> TaskDate {
        TaskDate::parse(text).unwrap()
    }

    #[test]
    fn test_without_rule_retires() {
        let completion = plan_completion(date("20240101"), "", date("20240310")).unwrap();
        assert_eq!(completion, Completion::Retire);
    }

    #[test]
    fn test_with_rule_reschedules_past_now() {
        let completion = plan_completion(date("20240301"), "d 7", date("20240310")).unwrap();
        assert_eq!(completion, Completion::Reschedule(date("20240315")));
    }

    #[test]
    fn test_task_due_today_moves_forward() {
        // due today: completing it moves the task past today
        let completion = plan_completion(date("20240320"), "d 7", date("20240320")).unwrap();
        assert_eq!(completion, Completion::Reschedule(date("20240327")));
    }

    #[test]
    fn test_future_task_keeps_its_date() {
        let completion = plan_completion(date("20240320"), "d 7", date("20240310")).unwrap();
        assert_eq!(completion, Completion::Reschedule(date("20240320")));
    }

    #[test]
    fn test_corrupt_rule_is_surfaced() {
        let result = plan_completion(date("20240301"), "q 1", date("20240310"));
        assert!(matches!(result, Err(RuleError::UnknownRuleKind { .. })));
    }

    #[test]
    fn test_repeated_calls_advance_with_now() {
        let first = plan_completion(date("20240301"), "d 1", date("20240310")).unwrap();
        let Completion::Reschedule(next) = first else {
            panic!("expected a reschedule");
        };
        let second = plan_completion(next, "d 1", next).unwrap();
        assert_eq!(second, Completion::Reschedule(date("20240312")));
    }

    #[test]
    fn test_serializes_for_json_output() {
        let json = serde_json::to_string(&Completion::Reschedule(date("20240315"))).unwrap();
        assert_eq!(json, r#"{"action":"reschedule","date":"20240315"}"#);
        let json = serde_json::to_string(&Completion::Retire).unwrap();
        assert_eq!(json, r#"{"action":"retire"}"#);
    }
}
