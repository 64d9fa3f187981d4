use tracing::debug;

use crate::date::TaskDate;
use crate::error::CoreError;
use crate::rule::{parse_rule, RecurrenceRule};

/// Calculates the next date `rule` schedules after `now`.
///
/// The result is the earliest date reachable from `anchor` by the rule's step
/// that is strictly later than `now`; a date equal to `now` never qualifies.
/// `anchor` itself is returned when it is already later than `now` and
/// satisfies the rule. Instants are reduced to their UTC calendar day.
///
/// # Behavior
/// - `d n`: `anchor + k * n` for the smallest `k >= 0` past `now`
/// - `y`: whole years from `anchor`; February 29 becomes March 1 in common years
/// - `w` and `m`: first matching day on or after `anchor` and after `now`
pub fn next_occurrence(
    now: impl Into<TaskDate>,
    anchor: TaskDate,
    rule: &RecurrenceRule,
) -> TaskDate {
    let now = now.into();
    let next = match rule {
        RecurrenceRule::EveryNDays(stride) => every_n_days(now, anchor, u64::from(stride.get())),
        RecurrenceRule::Yearly => yearly(now, anchor),
        RecurrenceRule::WeeklyOn(days) => scan(first_candidate(now, anchor), |d| days.contains(d)),
        RecurrenceRule::MonthlyOn(pattern) => {
            scan(first_candidate(now, anchor), |d| pattern.matches(d))
        }
    };
    debug!(%now, %anchor, %rule, %next, "computed next occurrence");
    next
}

/// Text-level entry point: both dates as `YYYYMMDD` and the raw rule.
///
/// An empty `repeat` is rejected as [`RuleError::EmptyRule`](crate::error::RuleError::EmptyRule).
pub fn next_date(now: &str, date: &str, repeat: &str) -> Result<TaskDate, CoreError> {
    let now = TaskDate::parse(now)?;
    let anchor = TaskDate::parse(date)?;
    let rule = parse_rule(repeat)?;
    Ok(next_occurrence(now, anchor, &rule))
}

/// Successive occurrences after `now`, each one computed from the previous.
pub fn upcoming(
    now: impl Into<TaskDate>,
    anchor: TaskDate,
    rule: &RecurrenceRule,
) -> impl Iterator<Item = TaskDate> + '_ {
    let first = next_occurrence(now, anchor, rule);
    std::iter::successors(Some(first), move |previous| {
        let next = next_occurrence(*previous, anchor, rule);
        (next > *previous).then_some(next)
    })
}

fn every_n_days(now: TaskDate, anchor: TaskDate, stride: u64) -> TaskDate {
    if anchor > now {
        return anchor;
    }
    // anchor <= now, so elapsed is never negative
    let elapsed = now.days_since(anchor) as u64;
    let steps = elapsed / stride + 1;
    anchor.add_days(steps * stride)
}

fn yearly(now: TaskDate, anchor: TaskDate) -> TaskDate {
    let mut next = anchor;
    while next <= now {
        let stepped = next.add_year();
        if stepped == next {
            break;
        }
        next = stepped;
    }
    next
}

fn first_candidate(now: TaskDate, anchor: TaskDate) -> TaskDate {
    if anchor > now {
        anchor
    } else {
        now.succ()
    }
}

/// Day-at-a-time forward search. Rule sets are non-empty and satisfiable by
/// construction, so a match is always found within a few years; near the end
/// of the calendar the search stops at [`TaskDate::max`].
fn scan(start: TaskDate, matches: impl Fn(TaskDate) -> bool) -> TaskDate {
    std::iter::successors(Some(start), |day| {
        let next = day.succ();
        (next != *day).then_some(next)
    })
    .find(|day| matches(*day))
    .unwrap_or_else(TaskDate::max)
}
