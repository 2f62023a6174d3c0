//! Timestamps used to order versions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on a key's timeline.
///
/// The store treats timestamps as plain signed integers: any range is valid,
/// negative values included, and nothing requires them to start at zero.
/// [`Timestamp::now`] is a convenience for callers that want wall-clock
/// milliseconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The earliest representable timestamp
    pub const MIN: Timestamp = Timestamp(i64::MIN);

    /// The latest representable timestamp
    pub const MAX: Timestamp = Timestamp(i64::MAX);

    /// Create a timestamp from a raw integer
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current wall-clock time as milliseconds since the Unix epoch
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Get the raw integer value
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Interpret the timestamp as milliseconds since the Unix epoch.
    ///
    /// Returns `None` when the value is outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Timestamp {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_ordering() {
        assert!(Timestamp::new(-5) < Timestamp::new(0));
        assert!(Timestamp::MIN < Timestamp::new(i64::MIN + 1));
        assert!(Timestamp::new(i64::MAX - 1) < Timestamp::MAX);
    }

    #[test]
    fn test_timestamp_now_roundtrips_through_chrono() {
        let ts = Timestamp::now();
        assert!(ts.get() > 0);

        let dt = ts.to_datetime().unwrap();
        assert_eq!(Timestamp::from(dt), ts);
    }

    #[test]
    fn test_timestamp_serializes_as_integer() {
        let json = serde_json::to_string(&Timestamp::new(42)).unwrap();
        assert_eq!(json, "42");

        let ts: Timestamp = serde_json::from_str("-7").unwrap();
        assert_eq!(ts, Timestamp::new(-7));
    }

    #[test]
    fn test_out_of_range_datetime() {
        assert!(Timestamp::MAX.to_datetime().is_none());
        assert_eq!(Timestamp::new(3).to_string(), "3");
    }
}
