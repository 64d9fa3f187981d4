use chrono::{DateTime, NaiveTime, Utc};

use crate::date::TaskDate;

/// Source of the current instant, injected wherever "now" matters.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's UTC calendar day.
    fn today(&self) -> TaskDate {
        TaskDate::from(self.now())
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Pins the clock to midnight UTC of `date`.
    pub fn at_date(date: TaskDate) -> Self {
        Self(date.naive().and_time(NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_its_date() {
        let date = TaskDate::parse("20240229").unwrap();
        let clock = FixedClock::at_date(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }

    #[test]
    fn test_system_clock_today_matches_utc() {
        let before = Utc::now().date_naive();
        let today = SystemClock.today().naive();
        let after = Utc::now().date_naive();
        assert!(before <= today && today <= after);
    }
}
