use crate::planner::TimeWindow;
use std::fmt;

/// Display period selected by the user, parsed from `<number><unit>` text
/// such as `1d`, `12h`, or `7 day`. A string that fails the pattern is not
/// an error: the dashboard degrades to latest-reading-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub count: u32,
    pub unit: PeriodUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl PeriodUnit {
    /// Fixed span per unit for window arithmetic. Months count as 30 days
    /// and years as 365; partitioning itself always uses true UTC calendar
    /// steps.
    fn secs(&self) -> i64 {
        match self {
            PeriodUnit::Second => 1,
            PeriodUnit::Minute => 60,
            PeriodUnit::Hour => 3_600,
            PeriodUnit::Day => 86_400,
            PeriodUnit::Week => 7 * 86_400,
            PeriodUnit::Month => 30 * 86_400,
            PeriodUnit::Year => 365 * 86_400,
        }
    }

    fn parse(word: &str) -> Option<PeriodUnit> {
        match word {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(PeriodUnit::Second),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(PeriodUnit::Minute),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(PeriodUnit::Hour),
            "d" | "day" | "days" => Some(PeriodUnit::Day),
            "w" | "week" | "weeks" => Some(PeriodUnit::Week),
            "mo" | "mon" | "month" | "months" => Some(PeriodUnit::Month),
            "y" | "yr" | "yrs" | "year" | "years" => Some(PeriodUnit::Year),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PeriodUnit::Second => "s",
            PeriodUnit::Minute => "m",
            PeriodUnit::Hour => "h",
            PeriodUnit::Day => "d",
            PeriodUnit::Week => "w",
            PeriodUnit::Month => "mo",
            PeriodUnit::Year => "y",
        }
    }
}

impl Period {
    pub const fn new(count: u32, unit: PeriodUnit) -> Self {
        Period { count, unit }
    }

    /// Parse `<number><unit>` with optional whitespace between the parts.
    pub fn parse(text: &str) -> Option<Period> {
        let trimmed = text.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let count: u32 = trimmed[..digits_end].parse().ok()?;
        if count == 0 {
            return None;
        }
        let unit = PeriodUnit::parse(trimmed[digits_end..].trim().to_ascii_lowercase().as_str())?;
        Some(Period { count, unit })
    }

    pub fn secs(&self) -> i64 {
        self.count as i64 * self.unit.secs()
    }

    /// The window covering exactly one period up to `end`.
    pub fn window_ending(&self, end: i64) -> TimeWindow {
        TimeWindow::new(end - self.secs(), end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.label())
    }
}
