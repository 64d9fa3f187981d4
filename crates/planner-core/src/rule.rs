//! Recurrence rules and their textual grammar.
//!
//! | text            | rule                                              |
//! |-----------------|---------------------------------------------------|
//! | `d <n>`         | every `n` days, `1 <= n <= 400`                   |
//! | `y`             | every year on the same month and day              |
//! | `w <days>`      | on ISO weekdays, Monday = 1 .. Sunday = 7         |
//! | `m <days> [<months>]` | on days of month 1..=31, `-1` last, `-2` second to last, optionally only in the listed months |
//!
//! Lists are comma separated. Rule values are only built through
//! [`parse_rule`] or the checked constructors, so every set is non-empty and
//! every monthly pattern can actually occur.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::date::TaskDate;
use crate::error::RuleError;

pub const MAX_DAY_STRIDE: u32 = 400;

/// A stride in days, `1..=400`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStride(u32);

impl DayStride {
    pub fn new(days: i64) -> Option<Self> {
        u32::try_from(days)
            .ok()
            .filter(|d| (1..=MAX_DAY_STRIDE).contains(d))
            .map(Self)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Non-empty set of ISO weekday numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdaySet(BTreeSet<u32>);

impl WeekdaySet {
    pub fn new(days: impl IntoIterator<Item = u32>) -> Option<Self> {
        let set: BTreeSet<u32> = days.into_iter().collect();
        if set.is_empty() || set.iter().any(|d| !(1..=7).contains(d)) {
            return None;
        }
        Some(Self(set))
    }

    #[inline]
    pub fn contains(&self, date: TaskDate) -> bool {
        self.0.contains(&date.iso_weekday())
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

/// Days of the month a monthly rule fires on, plus an optional month filter.
///
/// Day indices are `1..=31`, `-1` (last day) and `-2` (second to last day).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPattern {
    days: BTreeSet<i32>,
    months: Option<BTreeSet<u32>>,
}

impl MonthlyPattern {
    /// Returns `None` for empty or out-of-range sets, and for combinations no
    /// calendar date satisfies (such as day 31 restricted to April).
    pub fn new(
        days: impl IntoIterator<Item = i32>,
        months: Option<impl IntoIterator<Item = u32>>,
    ) -> Option<Self> {
        let days: BTreeSet<i32> = days.into_iter().collect();
        if days.is_empty() || days.iter().any(|d| !is_month_day(*d)) {
            return None;
        }
        let months = match months {
            Some(months) => {
                let months: BTreeSet<u32> = months.into_iter().collect();
                if months.is_empty() || months.iter().any(|m| !(1..=12).contains(m)) {
                    return None;
                }
                Some(months)
            }
            None => None,
        };
        let pattern = Self { days, months };
        pattern.can_occur().then_some(pattern)
    }

    fn can_occur(&self) -> bool {
        let months: Vec<u32> = match &self.months {
            Some(months) => months.iter().copied().collect(),
            None => (1..=12).collect(),
        };
        self.days.iter().any(|&day| {
            day < 0
                || months
                    .iter()
                    .any(|&month| (day as u32) <= longest_month(month))
        })
    }

    /// Day-of-month and month filter are checked on the same date.
    pub fn matches(&self, date: TaskDate) -> bool {
        if let Some(months) = &self.months {
            if !months.contains(&date.month()) {
                return false;
            }
        }
        let day = date.day();
        let last = date.days_in_month();
        self.days.contains(&(day as i32))
            || (self.days.contains(&-1) && day == last)
            || (self.days.contains(&-2) && day + 1 == last)
    }

    pub fn days(&self) -> impl Iterator<Item = i32> + '_ {
        self.days.iter().copied()
    }

    pub fn months(&self) -> Option<impl Iterator<Item = u32> + '_> {
        self.months.as_ref().map(|m| m.iter().copied())
    }
}

fn is_month_day(day: i32) -> bool {
    matches!(day, -2 | -1 | 1..=31)
}

/// Longest length a month ever has, leap Februaries included.
fn longest_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    EveryNDays(DayStride),
    Yearly,
    WeeklyOn(WeekdaySet),
    MonthlyOn(MonthlyPattern),
}

/// Parses a rule such as `d 7`, `y`, `w 1,3,5` or `m -1 1,6`.
///
/// Parsing is all-or-nothing: any invalid token rejects the whole rule.
pub fn parse_rule(text: &str) -> Result<RecurrenceRule, RuleError> {
    let mut tokens = text.split_whitespace();
    let Some(kind) = tokens.next() else {
        return Err(RuleError::EmptyRule);
    };
    let args: Vec<&str> = tokens.collect();
    let malformed = |reason: &'static str| RuleError::MalformedRule {
        rule: text.to_string(),
        reason,
    };

    match kind {
        "y" => {
            if !args.is_empty() {
                return Err(malformed("'y' takes no arguments"));
            }
            Ok(RecurrenceRule::Yearly)
        }
        "d" => {
            let [count] = args[..] else {
                return Err(malformed("'d' takes exactly one day count"));
            };
            if !is_integer(count) {
                return Err(malformed("'d' day count must be an integer"));
            }
            // digits too long for i64 are still a count, just far out of range
            count
                .parse::<i64>()
                .ok()
                .and_then(DayStride::new)
                .map(RecurrenceRule::EveryNDays)
                .ok_or_else(|| out_of_range(text, count, "a day count in 1..=400"))
        }
        "w" => {
            let [list] = args[..] else {
                return Err(malformed("'w' takes exactly one list of weekdays"));
            };
            let days = parse_list(text, list, "weekdays in 1..=7", |d| (1..=7).contains(&d))?;
            WeekdaySet::new(days.into_iter().map(|d| d as u32))
                .map(RecurrenceRule::WeeklyOn)
                .ok_or_else(|| malformed("'w' needs at least one weekday"))
        }
        "m" => {
            let (day_list, month_list) = match args[..] {
                [days] => (days, None),
                [days, months] => (days, Some(months)),
                _ => return Err(malformed("'m' takes a list of days and an optional list of months")),
            };
            let days = parse_list(text, day_list, "days of month in -2..=-1 or 1..=31", is_month_day)?;
            let months = month_list
                .map(|list| parse_list(text, list, "months in 1..=12", |m| (1..=12).contains(&m)))
                .transpose()?
                .map(|months| months.into_iter().map(|m| m as u32));
            MonthlyPattern::new(days, months)
                .map(RecurrenceRule::MonthlyOn)
                .ok_or_else(|| RuleError::NeverOccurs {
                    rule: text.to_string(),
                })
        }
        other => Err(RuleError::UnknownRuleKind {
            rule: text.to_string(),
            kind: other.to_string(),
        }),
    }
}

fn parse_list(
    rule: &str,
    list: &str,
    expected: &'static str,
    valid: impl Fn(i32) -> bool,
) -> Result<Vec<i32>, RuleError> {
    list.split(',')
        .map(|item| {
            if item.is_empty() {
                return Err(RuleError::MalformedRule {
                    rule: rule.to_string(),
                    reason: "empty element in list",
                });
            }
            item.parse::<i32>()
                .ok()
                .filter(|v| valid(*v))
                .ok_or_else(|| out_of_range(rule, item, expected))
        })
        .collect()
}

fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn out_of_range(rule: &str, value: &str, expected: &'static str) -> RuleError {
    RuleError::OutOfRange {
        rule: rule.to_string(),
        value: value.to_string(),
        expected,
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

/// Canonical text: sorted, de-duplicated lists and single spaces.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::EveryNDays(stride) => write!(f, "d {}", stride.get()),
            RecurrenceRule::Yearly => write!(f, "y"),
            RecurrenceRule::WeeklyOn(days) => write!(f, "w {}", join(days.iter())),
            RecurrenceRule::MonthlyOn(pattern) => {
                write!(f, "m {}", join(pattern.days()))?;
                if let Some(months) = pattern.months() {
                    write!(f, " {}", join(months))?;
                }
                Ok(())
            }
        }
    }
}
