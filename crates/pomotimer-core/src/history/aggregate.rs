//! Derived views over the completed-session history.
//!
//! Everything here is a pure function of the records and the supplied
//! "today"; nothing reads the clock.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::HistoryRecord;
use crate::timer::SessionMode;

/// Number of days in the chart window, ending today.
pub const CHART_DAYS: i64 = 7;

/// One bar of the 7-day chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: u64,
}

impl DayCount {
    /// `MM-DD` axis label.
    pub fn label(&self) -> String {
        self.day.format("%m-%d").to_string()
    }
}

/// Completed sessions per day from `today - 6` through `today`, ascending.
/// Days without completions are present with a zero count.
pub fn daily_counts(records: &[HistoryRecord], today: NaiveDate) -> Vec<DayCount> {
    let mut series: Vec<DayCount> = (0..CHART_DAYS)
        .rev()
        .map(|back| DayCount {
            day: today - Duration::days(back),
            count: 0,
        })
        .collect();

    let first = series[0].day;
    for record in records {
        if record.day_key < first || record.day_key > today {
            continue;
        }
        let idx = (record.day_key - first).num_days() as usize;
        series[idx].count += 1;
    }
    series
}

/// Totals across the stored history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_sessions: u64,
    pub work_sessions: u64,
    pub break_sessions: u64,
    pub total_work_sec: u64,
    pub total_break_sec: u64,
    pub today_sessions: u64,
    pub today_work_sec: u64,
}

pub fn summarize(records: &[HistoryRecord], today: NaiveDate) -> HistoryStats {
    let mut stats = HistoryStats::default();
    for record in records {
        stats.total_sessions += 1;
        let is_today = record.day_key == today;
        if is_today {
            stats.today_sessions += 1;
        }
        match record.mode {
            SessionMode::Work => {
                stats.work_sessions += 1;
                stats.total_work_sec += record.duration_sec;
                if is_today {
                    stats.today_work_sec += record.duration_sec;
                }
            }
            SessionMode::Break => {
                stats.break_sessions += 1;
                stats.total_break_sec += record.duration_sec;
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_on(date: NaiveDate, hour: u32, mode: SessionMode) -> HistoryRecord {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
            .unwrap();
        HistoryRecord::new(mode, 1500, at)
    }

    #[test]
    fn empty_history_is_dense_zero_week() {
        let series = daily_counts(&[], day(2024, 5, 10));
        assert_eq!(series.len(), 7);
        let days: Vec<_> = series.iter().map(|p| p.day).collect();
        let expected: Vec<_> = (4..=10).map(|d| day(2024, 5, d)).collect();
        assert_eq!(days, expected);
        assert!(series.iter().all(|p| p.count == 0));
    }

    #[test]
    fn counts_land_on_matching_days() {
        let records = vec![
            record_on(day(2024, 5, 10), 9, SessionMode::Work),
            record_on(day(2024, 5, 10), 10, SessionMode::Break),
            record_on(day(2024, 5, 10), 11, SessionMode::Work),
            record_on(day(2024, 5, 4), 12, SessionMode::Work),
        ];
        let counts: Vec<_> = daily_counts(&records, day(2024, 5, 10))
            .iter()
            .map(|p| p.count)
            .collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let records = vec![
            record_on(day(2024, 5, 3), 9, SessionMode::Work),
            record_on(day(2024, 5, 11), 9, SessionMode::Work),
        ];
        let series = daily_counts(&records, day(2024, 5, 10));
        assert_eq!(series.iter().map(|p| p.count).sum::<u64>(), 0);
    }

    #[test]
    fn window_crosses_month_boundary() {
        let series = daily_counts(&[], day(2024, 3, 2));
        assert_eq!(series[0].day, day(2024, 2, 25));
        assert_eq!(series[0].label(), "02-25");
        assert_eq!(series[6].label(), "03-02");
    }

    #[test]
    fn summary_splits_by_mode_and_today() {
        let today = day(2024, 5, 10);
        let records = vec![
            record_on(today, 9, SessionMode::Work),
            record_on(today, 10, SessionMode::Break),
            record_on(day(2024, 5, 9), 9, SessionMode::Work),
        ];
        let stats = summarize(&records, today);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.work_sessions, 2);
        assert_eq!(stats.break_sessions, 1);
        assert_eq!(stats.total_work_sec, 3000);
        assert_eq!(stats.today_sessions, 2);
        assert_eq!(stats.today_work_sec, 1500);
    }

    proptest! {
        #[test]
        fn in_window_records_are_all_counted(offsets in proptest::collection::vec(0i64..7, 0..50)) {
            let today = day(2024, 5, 10);
            let records: Vec<_> = offsets
                .iter()
                .map(|back| record_on(today - Duration::days(*back), 12, SessionMode::Work))
                .collect();
            let series = daily_counts(&records, today);
            prop_assert_eq!(series.iter().map(|p| p.count).sum::<u64>(), records.len() as u64);
            prop_assert_eq!(series.clone(), daily_counts(&records, today));
        }
    }
}
