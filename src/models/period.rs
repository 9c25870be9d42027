//! Resolution period table
//!
//! Maps chart resolution labels to bucket widths and rounds Unix
//! timestamps onto bucket boundaries.
//!
//! All buckets are fixed-width. Sub-day, day and 3-day buckets align to
//! multiples of their width since the Unix epoch, so days start at
//! 00:00 UTC. Weeks start on Monday 00:00 UTC. "1M" is a 30-day bucket.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// 1970-01-01 was a Thursday; the first Monday is four days later.
const WEEK_ORIGIN: i64 = 4 * DAY;

/// Canonical labels in display order
pub const SUPPORTED_RESOLUTIONS: [&str; 15] = [
    "1", "3", "5", "15", "30", "60", "120", "240", "360", "480", "720", "1D", "3D", "1W", "1M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Min1,
    Min3,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
    Month1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Resolution {
    pub const ALL: [Resolution; 15] = [
        Resolution::Min1,
        Resolution::Min3,
        Resolution::Min5,
        Resolution::Min15,
        Resolution::Min30,
        Resolution::Hour1,
        Resolution::Hour2,
        Resolution::Hour4,
        Resolution::Hour6,
        Resolution::Hour8,
        Resolution::Hour12,
        Resolution::Day1,
        Resolution::Day3,
        Resolution::Week1,
        Resolution::Month1,
    ];

    /// Parse a canonical label ("30", "1D", ...)
    pub fn parse(label: &str) -> Result<Self, ChartError> {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == label)
            .ok_or_else(|| ChartError::InvalidResolution {
                resolution: label.to_string(),
            })
    }

    /// Parse a label as sent by charting clients, which also use the
    /// single-letter "D", "W" and "M" aliases.
    pub fn from_udf(label: &str) -> Result<Self, ChartError> {
        match label {
            "D" => Ok(Resolution::Day1),
            "W" => Ok(Resolution::Week1),
            "M" => Ok(Resolution::Month1),
            other => Self::parse(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Min1 => "1",
            Resolution::Min3 => "3",
            Resolution::Min5 => "5",
            Resolution::Min15 => "15",
            Resolution::Min30 => "30",
            Resolution::Hour1 => "60",
            Resolution::Hour2 => "120",
            Resolution::Hour4 => "240",
            Resolution::Hour6 => "360",
            Resolution::Hour8 => "480",
            Resolution::Hour12 => "720",
            Resolution::Day1 => "1D",
            Resolution::Day3 => "3D",
            Resolution::Week1 => "1W",
            Resolution::Month1 => "1M",
        }
    }

    /// Internal interval label
    pub fn interval(&self) -> &'static str {
        match self {
            Resolution::Min1 => "1m",
            Resolution::Min3 => "3m",
            Resolution::Min5 => "5m",
            Resolution::Min15 => "15m",
            Resolution::Min30 => "30m",
            Resolution::Hour1 => "1h",
            Resolution::Hour2 => "2h",
            Resolution::Hour4 => "4h",
            Resolution::Hour6 => "6h",
            Resolution::Hour8 => "8h",
            Resolution::Hour12 => "12h",
            Resolution::Day1 => "1d",
            Resolution::Day3 => "3d",
            Resolution::Week1 => "1w",
            Resolution::Month1 => "1M",
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        match self {
            Resolution::Min1 => MINUTE,
            Resolution::Min3 => 3 * MINUTE,
            Resolution::Min5 => 5 * MINUTE,
            Resolution::Min15 => 15 * MINUTE,
            Resolution::Min30 => 30 * MINUTE,
            Resolution::Hour1 => HOUR,
            Resolution::Hour2 => 2 * HOUR,
            Resolution::Hour4 => 4 * HOUR,
            Resolution::Hour6 => 6 * HOUR,
            Resolution::Hour8 => 8 * HOUR,
            Resolution::Hour12 => 12 * HOUR,
            Resolution::Day1 => DAY,
            Resolution::Day3 => 3 * DAY,
            Resolution::Week1 => 7 * DAY,
            Resolution::Month1 => 30 * DAY,
        }
    }

    fn origin(&self) -> i64 {
        match self {
            Resolution::Week1 => WEEK_ORIGIN,
            _ => 0,
        }
    }

    /// Start of the bucket containing `timestamp`
    pub fn round_down(&self, timestamp: i64) -> i64 {
        let width = self.duration_seconds();
        let origin = self.origin();
        origin + (timestamp - origin).div_euclid(width) * width
    }

    /// `timestamp` itself when it is a boundary, else the next boundary
    pub fn round_up(&self, timestamp: i64) -> i64 {
        let down = self.round_down(timestamp);
        if down == timestamp {
            timestamp
        } else {
            down + self.duration_seconds()
        }
    }

    /// Exclusive end of the bucket containing `timestamp`
    pub fn bucket_end(&self, timestamp: i64) -> i64 {
        self.round_down(timestamp) + self.duration_seconds()
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Duration of a canonical resolution label
pub fn duration_seconds(label: &str) -> Result<i64, ChartError> {
    Resolution::parse(label).map(|r| r.duration_seconds())
}

pub fn round_boundary(timestamp: i64, direction: Direction, resolution: Resolution) -> i64 {
    match direction {
        Direction::Down => resolution.round_down(timestamp),
        Direction::Up => resolution.round_up(timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc, Weekday};

    #[test]
    fn test_duration_seconds() {
        assert_eq!(duration_seconds("1").unwrap(), 60);
        assert_eq!(duration_seconds("30").unwrap(), 1800);
        assert_eq!(duration_seconds("720").unwrap(), 43_200);
        assert_eq!(duration_seconds("1D").unwrap(), 86_400);
        assert_eq!(duration_seconds("3D").unwrap(), 259_200);
        assert_eq!(duration_seconds("1W").unwrap(), 604_800);
        assert_eq!(duration_seconds("1M").unwrap(), 2_592_000);
    }

    #[test]
    fn test_labels_round_trip() {
        for (label, resolution) in SUPPORTED_RESOLUTIONS.iter().zip(Resolution::ALL) {
            assert_eq!(Resolution::parse(label).unwrap(), resolution);
            assert_eq!(resolution.label(), *label);
            assert!(resolution.duration_seconds() > 0);
        }
    }

    #[test]
    fn test_interval_labels() {
        assert_eq!(Resolution::Min1.interval(), "1m");
        assert_eq!(Resolution::Hour4.interval(), "4h");
        assert_eq!(Resolution::Day3.interval(), "3d");
        assert_eq!(Resolution::Week1.interval(), "1w");
        assert_eq!(Resolution::Month1.interval(), "1M");

        let mut seen: Vec<&str> = Resolution::ALL.iter().map(|r| r.interval()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Resolution::ALL.len());
    }

    #[test]
    fn test_invalid_resolution() {
        for label in ["", "2", "1H", "d", "D"] {
            assert!(matches!(
                Resolution::parse(label),
                Err(ChartError::InvalidResolution { .. })
            ));
        }
        assert!(duration_seconds("45").is_err());
    }

    #[test]
    fn test_udf_aliases() {
        assert_eq!(Resolution::from_udf("D").unwrap(), Resolution::Day1);
        assert_eq!(Resolution::from_udf("W").unwrap(), Resolution::Week1);
        assert_eq!(Resolution::from_udf("M").unwrap(), Resolution::Month1);
        assert_eq!(Resolution::from_udf("240").unwrap(), Resolution::Hour4);
        assert!(Resolution::from_udf("Y").is_err());
    }

    #[test]
    fn test_round_down_up_bracket_timestamp() {
        let samples = [0, 1, 59, 60, 1_699_999_999, 1_700_000_000, 1_700_003_601];
        for resolution in Resolution::ALL {
            for t in samples {
                let down = round_boundary(t, Direction::Down, resolution);
                let up = round_boundary(t, Direction::Up, resolution);
                assert!(down <= t && t <= up, "{resolution} {t}: {down} {up}");
                if down == t {
                    assert_eq!(up, t);
                } else {
                    assert_eq!(up - down, resolution.duration_seconds());
                }
            }
        }
    }

    #[test]
    fn test_sub_day_alignment() {
        let r = Resolution::Min30;
        assert_eq!(r.round_down(1_700_000_123), 1_699_999_200);
        assert_eq!(r.round_up(1_700_000_123), 1_700_001_000);
        assert_eq!(r.bucket_end(1_699_999_200), 1_700_001_000);
    }

    #[test]
    fn test_day_starts_at_utc_midnight() {
        let t = Utc.with_ymd_and_hms(2024, 3, 15, 17, 42, 5).unwrap().timestamp();
        let start = Resolution::Day1.round_down(t);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn test_week_starts_on_monday() {
        let t = Utc.with_ymd_and_hms(2024, 3, 15, 17, 42, 5).unwrap().timestamp();
        let start = Resolution::Week1.round_down(t);
        let start_dt = Utc.timestamp_opt(start, 0).unwrap();
        assert_eq!(start_dt.weekday(), Weekday::Mon);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn test_negative_timestamps_round_down() {
        assert_eq!(Resolution::Min1.round_down(-1), -60);
        assert_eq!(Resolution::Min1.round_up(-1), 0);
    }
}
