//! Statistics log: completed focus sessions per local calendar day.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bar height given to days without sessions, in percent.
pub const MIN_BAR_HEIGHT_PCT: f64 = 5.0;

/// One day of the trailing week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsLog {
    days: BTreeMap<NaiveDate, u32>,
}

impl StatsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed focus session on `date`. Returns the new count.
    pub fn record(&mut self, date: NaiveDate) -> u32 {
        let count = self.days.entry(date).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn total(&self) -> u64 {
        self.days.values().map(|&c| u64::from(c)).sum()
    }

    /// Highest daily count ever recorded, not just within the last week.
    pub fn max_to_date(&self) -> u32 {
        self.days.values().copied().max().unwrap_or(0)
    }

    /// Seven days ending at `today`, oldest first, missing days as zero.
    pub fn last_7_days(&self, today: NaiveDate) -> Vec<DayCount> {
        (0..7u64)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| DayCount {
                date,
                label: date.format("%a").to_string(),
                count: self.count_on(date),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &u32)> {
        self.days.iter()
    }
}

/// Chart bar height in percent: `count` scaled against `max`, with a floor
/// for empty days so they stay visible.
pub fn bar_height_pct(count: u32, max: u32) -> f64 {
    if count == 0 {
        return MIN_BAR_HEIGHT_PCT;
    }
    f64::from(count) / f64::from(max.max(1)) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn record_increments_per_day() {
        let mut log = StatsLog::new();
        assert_eq!(log.record(date("2026-10-17")), 1);
        assert_eq!(log.record(date("2026-10-17")), 2);
        assert_eq!(log.record(date("2026-10-16")), 1);
        assert_eq!(log.count_on(date("2026-10-17")), 2);
        assert_eq!(log.count_on(date("2026-10-15")), 0);
        assert_eq!(log.total(), 3);
    }

    #[test]
    fn last_7_days_is_oldest_first_and_zero_filled() {
        let mut log = StatsLog::new();
        log.record(date("2026-10-17"));
        log.record(date("2026-10-13"));
        log.record(date("2026-10-13"));
        log.record(date("2026-10-01"));

        let week = log.last_7_days(date("2026-10-17"));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date("2026-10-11"));
        assert_eq!(week[6].date, date("2026-10-17"));
        let counts: Vec<u32> = week.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 0, 2, 0, 0, 0, 1]);
        assert_eq!(week[6].label, "Sat");
    }

    #[test]
    fn max_spans_all_recorded_days() {
        let mut log = StatsLog::new();
        for _ in 0..9 {
            log.record(date("2026-01-01"));
        }
        log.record(date("2026-10-17"));
        assert_eq!(log.max_to_date(), 9);
        assert_eq!(StatsLog::new().max_to_date(), 0);
    }

    #[test]
    fn bar_heights() {
        assert_eq!(bar_height_pct(0, 9), MIN_BAR_HEIGHT_PCT);
        assert_eq!(bar_height_pct(0, 0), MIN_BAR_HEIGHT_PCT);
        assert!((bar_height_pct(3, 6) - 50.0).abs() < f64::EPSILON);
        assert!((bar_height_pct(6, 6) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_iso_date_keys() {
        let mut log = StatsLog::new();
        log.record(date("2026-10-17"));
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"{"2026-10-17":1}"#);
        let back: StatsLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
