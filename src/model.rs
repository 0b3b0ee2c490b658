use crate::error::{Error, Result};
use crate::resample::DisplayPoint;
use chrono::{TimeZone, Utc};

/// One raw reading from the store. Immutable once read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Unix epoch seconds, UTC
    pub timestamp: i64,
    pub value: f64,
}

/// The most recent reading, formatted for the header panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub value: f64,
    pub timestamp: i64,
    /// `YYYY-MM-DD HH:MM:SS` in UTC
    pub formatted: String,
}

impl LatestReading {
    pub fn from_sample(sample: Sample) -> Result<Self> {
        let when = Utc
            .timestamp_opt(sample.timestamp, 0)
            .single()
            .ok_or(Error::TimestampRange(sample.timestamp))?;
        Ok(LatestReading {
            value: sample.value,
            timestamp: sample.timestamp,
            formatted: when.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}

/// Everything one refresh cycle hands to the hosting UI. The UI owns all
/// presentation; the series is unordered (grouping is by bucket key).
#[derive(Debug, Clone, Default)]
pub struct DisplayModel {
    pub latest: Option<LatestReading>,
    pub series: Vec<DisplayPoint>,
    /// Requested window, for the x axis; `None` in latest-only mode
    pub x_range: Option<(i64, i64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_reading_formats_utc() {
        let reading = LatestReading::from_sample(Sample {
            timestamp: 1_552_000_000,
            value: 21.5,
        })
        .unwrap();
        assert_eq!(reading.formatted, "2019-03-07 23:06:40");
        assert_eq!(reading.value, 21.5);
    }

    #[test]
    fn latest_reading_rejects_absurd_timestamp() {
        let result = LatestReading::from_sample(Sample {
            timestamp: i64::MAX,
            value: 0.0,
        });
        assert!(matches!(result, Err(Error::TimestampRange(_))));
    }
}
