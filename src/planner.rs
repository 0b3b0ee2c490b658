use crate::error::{Error, Result};
use chrono::{Datelike, Days, Months, NaiveDate, TimeZone, Utc};

/// A requested query range in Unix epoch seconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn len_secs(&self) -> i64 {
        self.end - self.start
    }
}

/// Minimum per-bucket sample interval at which each partitioning still
/// provides enough raw points per bucket.
const YEAR_MIN_INTERVAL_SECS: f64 = 3.0 * 3600.0;
const MONTH_MIN_INTERVAL_SECS: f64 = 15.0 * 60.0;

/// Partition coarseness of the reading store. Year and Month are served by
/// named secondary indexes; Day is the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Year,
    Month,
    Day,
}

impl Granularity {
    /// Pick the coarsest partitioning whose native sample spacing still
    /// matches the requested per-bucket density. Pure function of
    /// `window length / resolution`; lower bounds are inclusive.
    pub fn select(window: TimeWindow, resolution: u32) -> Granularity {
        let min_sample_interval = window.len_secs() as f64 / resolution.max(1) as f64;
        if min_sample_interval >= YEAR_MIN_INTERVAL_SECS {
            Granularity::Year
        } else if min_sample_interval >= MONTH_MIN_INTERVAL_SECS {
            Granularity::Month
        } else {
            Granularity::Day
        }
    }

    /// Partition key for the partition containing `date`, zero-padded so the
    /// key text itself stays chronologically ordered.
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Year => date.format("%Y").to_string(),
            Granularity::Month => date.format("%Y%m").to_string(),
            Granularity::Day => date.format("%Y%m%d").to_string(),
        }
    }

    /// Column holding this granularity's partition key.
    pub fn key_column(&self) -> &'static str {
        match self {
            Granularity::Year => "year_key",
            Granularity::Month => "month_key",
            Granularity::Day => "day_key",
        }
    }

    /// Secondary index serving this granularity, if any.
    pub fn index_name(&self) -> Option<&'static str> {
        match self {
            Granularity::Year => Some("idx_readings_year"),
            Granularity::Month => Some("idx_readings_month"),
            Granularity::Day => None,
        }
    }

    /// First day of the partition containing `date`.
    fn truncate(&self, date: NaiveDate) -> NaiveDate {
        let truncated = match self {
            Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            Granularity::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
            Granularity::Day => Some(date),
        };
        // month/day 1 is always a valid date within the year
        truncated.unwrap_or(date)
    }

    /// First day of the next partition. UTC calendar arithmetic, so the step
    /// is strictly monotonic and the planner loop terminates.
    fn step(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Year => date.checked_add_months(Months::new(12)),
            Granularity::Month => date.checked_add_months(Months::new(1)),
            Granularity::Day => date.checked_add_days(Days::new(1)),
        }
    }
}

/// One range query: a partition key plus the granularity that names the
/// column (and index) it applies to. Every entry in a plan shares the same
/// `[start, end]` timestamp predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub key: String,
    pub granularity: Granularity,
}

pub type QueryPlan = Vec<PlanEntry>;

/// Enumerate the ordered partition keys covering `window`, coarsest first
/// choice of granularity per the density thresholds. Emits at least one
/// entry whenever `start <= end`, even when both ends share a partition;
/// an inverted window yields an empty plan (callers validate).
pub fn plan(window: TimeWindow, resolution: u32) -> Result<QueryPlan> {
    if window.end < window.start {
        return Ok(Vec::new());
    }

    let granularity = Granularity::select(window, resolution);
    let first = granularity.truncate(date_of(window.start)?);
    let last = granularity.truncate(date_of(window.end)?);

    let mut entries = Vec::new();
    let mut current = first;
    // date-value comparison, not key-string comparison
    while current <= last {
        entries.push(PlanEntry {
            key: granularity.key(current),
            granularity,
        });
        match granularity.step(current) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(entries)
}

/// UTC calendar date containing the given epoch second.
pub fn date_of(secs: i64) -> Result<NaiveDate> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.date_naive())
        .ok_or(Error::TimestampRange(secs))
}

/// Day partition key for the given epoch second, as used by the
/// latest-reading query.
pub fn day_key(secs: i64) -> Result<String> {
    Ok(Granularity::Day.key(date_of(secs)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    // 2019-01-15 12:00:00 UTC
    const MID_JAN: i64 = 1_547_553_600;

    fn keys(plan: &QueryPlan) -> Vec<&str> {
        plan.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn granularity_thresholds_are_inclusive_on_the_lower_bound() {
        // 3h per bucket exactly selects Year
        let year = TimeWindow::new(0, 3 * 3600);
        assert_eq!(Granularity::select(year, 1), Granularity::Year);
        // 15m exactly selects Month
        let month = TimeWindow::new(0, 15 * 60);
        assert_eq!(Granularity::select(month, 1), Granularity::Month);
        // 14m59s falls through to Day
        let day = TimeWindow::new(0, 15 * 60 - 1);
        assert_eq!(Granularity::select(day, 1), Granularity::Day);
    }

    #[test]
    fn granularity_is_a_pure_function_of_density() {
        // same interval-per-bucket, different absolute spans
        let a = TimeWindow::new(0, 900 * 4);
        let b = TimeWindow::new(MID_JAN, MID_JAN + 900 * 8);
        assert_eq!(Granularity::select(a, 4), Granularity::select(b, 8));
    }

    #[test]
    fn plan_covers_consecutive_months_without_gaps() {
        // 2019-01-15 12:00 .. 2019-03-02 00:00 at a density that picks Month
        let window = TimeWindow::new(MID_JAN, 1_551_484_800);
        assert_eq!(Granularity::select(window, 672), Granularity::Month);
        let plan = plan(window, 672).unwrap();
        assert_eq!(keys(&plan), ["201901", "201902", "201903"]);
    }

    #[test]
    fn forty_day_span_at_day_granularity_yields_one_entry_per_calendar_day() {
        // resolution high enough that per-bucket density drops below 15m
        let window = TimeWindow::new(MID_JAN, MID_JAN + 40 * DAY);
        assert_eq!(Granularity::select(window, 4000), Granularity::Day);
        let plan = plan(window, 4000).unwrap();
        assert_eq!(plan.len(), 41);
        assert_eq!(plan.first().unwrap().key, "20190115");
        assert_eq!(plan.last().unwrap().key, "20190224");
    }

    #[test]
    fn plan_has_no_repeated_keys() {
        let window = TimeWindow::new(MID_JAN, MID_JAN + 400 * DAY);
        let entries = plan(window, 672).unwrap();
        let mut seen = entries.iter().map(|e| e.key.clone()).collect::<Vec<_>>();
        seen.dedup();
        assert_eq!(seen.len(), entries.len());
    }

    #[test]
    fn single_partition_when_both_ends_share_a_key() {
        // 3h at resolution 1 sits exactly on the Year threshold
        let window = TimeWindow::new(MID_JAN, MID_JAN + 3 * 3600);
        let entries = plan(window, 1).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "2019");
        assert_eq!(entries[0].granularity, Granularity::Year);

        // an hour at the same resolution falls into the Month band
        let window = TimeWindow::new(MID_JAN, MID_JAN + 3600);
        let entries = plan(window, 1).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "201901");
        assert_eq!(entries[0].granularity, Granularity::Month);
    }

    #[test]
    fn zero_length_window_still_emits_one_entry() {
        let entries = plan(TimeWindow::new(MID_JAN, MID_JAN), 10).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn inverted_window_yields_empty_plan() {
        let entries = plan(TimeWindow::new(MID_JAN, MID_JAN - 1), 10).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn entry_count_is_monotonic_in_window_length() {
        let mut previous = 0;
        for days in 1..=120 {
            let window = TimeWindow::new(MID_JAN, MID_JAN + days * DAY);
            // fix the granularity by fixing density: one bucket per 10 minutes
            let resolution = (window.len_secs() / 600).max(1) as u32;
            assert_eq!(Granularity::select(window, resolution), Granularity::Day);
            let count = plan(window, resolution).unwrap().len();
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test]
    fn year_spanning_plan_steps_whole_years() {
        let window = TimeWindow::new(MID_JAN, MID_JAN + 800 * DAY);
        assert_eq!(Granularity::select(window, 100), Granularity::Year);
        let entries = plan(window, 100).unwrap();
        assert_eq!(keys(&entries), ["2019", "2020", "2021"]);
    }

    #[test]
    fn day_key_formats_utc_dates() {
        assert_eq!(day_key(MID_JAN).unwrap(), "20190115");
        assert_eq!(day_key(0).unwrap(), "19700101");
    }
}
