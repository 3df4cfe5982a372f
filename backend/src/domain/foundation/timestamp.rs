//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from an RFC 3339 string.
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by adding whole calendar years.
    ///
    /// Uses calendar month arithmetic, so a date that does not exist in the
    /// target year clamps to the last day of that month (Feb 29 -> Feb 28).
    pub fn add_years(&self, years: u32) -> Self {
        let shifted = self
            .0
            .checked_add_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self(shifted)
    }

    /// Returns the calendar date of this instant in the given zone.
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.0.with_timezone(offset).date_naive()
    }

    /// True when both instants fall on the same local calendar day.
    pub fn same_local_day(&self, other: &Timestamp, offset: &FixedOffset) -> bool {
        self.local_date(offset) == other.local_date(offset)
    }

    /// True when both instants fall in the same local calendar month.
    pub fn same_local_month(&self, other: &Timestamp, offset: &FixedOffset) -> bool {
        let a = self.local_date(offset);
        let b = other.local_date(offset);
        a.year() == b.year() && a.month() == b.month()
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let now = Timestamp::now();
        let after = Utc::now();

        assert!(now.as_datetime() >= &before);
        assert!(now.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let json = serde_json::to_string(&ts("2024-01-15T10:30:00Z")).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let parsed: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(parsed.as_datetime().year(), 2024);
        assert_eq!(parsed.as_datetime().hour(), 10);
    }

    #[test]
    fn add_years_keeps_day_of_month() {
        let start = ts("2024-03-10T08:00:00Z");
        assert_eq!(start.add_years(1), ts("2025-03-10T08:00:00Z"));
    }

    #[test]
    fn add_years_clamps_leap_day_to_feb_28() {
        let start = ts("2024-02-29T12:00:00Z");
        assert_eq!(start.add_years(1), ts("2025-02-28T12:00:00Z"));
    }

    #[test]
    fn local_day_boundary_follows_offset() {
        // 18:40 UTC is already the next day in IST
        let evening = ts("2024-05-01T18:40:00Z");
        let afternoon = ts("2024-05-01T10:00:00Z");
        assert!(!evening.same_local_day(&afternoon, &ist()));
        assert!(evening.same_local_day(&afternoon, &FixedOffset::east_opt(0).unwrap()));
    }

    #[test]
    fn same_local_month_spans_whole_month() {
        let first = ts("2024-05-01T00:00:00Z");
        let last = ts("2024-05-31T12:00:00Z");
        let next = ts("2024-06-01T00:00:00Z");
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(first.same_local_month(&last, &utc));
        assert!(!last.same_local_month(&next, &utc));
    }

    #[test]
    fn unix_secs_roundtrip() {
        let start = Timestamp::from_unix_secs(1_705_276_800);
        assert_eq!(start.as_unix_secs(), 1_705_276_800);
        assert_eq!(start.as_datetime().day(), 15);
    }
}
