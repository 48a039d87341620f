//! Relative time formatting.

use chrono::{DateTime, TimeDelta, Utc};

/// Format the age of `t` relative to now, e.g. `"3 hours ago"`.
#[must_use]
pub fn relative_age(t: DateTime<Utc>) -> String {
    relative_age_at(t, Utc::now())
}

/// Format the age of `t` relative to `now`.
#[must_use]
pub fn relative_age_at(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_elapsed(now.signed_duration_since(t))
}

/// Format an elapsed duration as a coarse human readable age.
///
/// Buckets are checked smallest first. Counts are whole units, rounded down.
/// Negative durations (timestamps in the future) fall into the first bucket
/// and read as `"just now"`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use pkgdoc_render::format_elapsed;
///
/// assert_eq!(format_elapsed(TimeDelta::seconds(90)), "one minute ago");
/// assert_eq!(format_elapsed(TimeDelta::hours(5)), "5 hours ago");
/// ```
#[must_use]
pub fn format_elapsed(d: TimeDelta) -> String {
    if d < TimeDelta::seconds(1) {
        "just now".to_owned()
    } else if d < TimeDelta::seconds(2) {
        "one second ago".to_owned()
    } else if d < TimeDelta::minutes(1) {
        format!("{} seconds ago", d.num_seconds())
    } else if d < TimeDelta::minutes(2) {
        "one minute ago".to_owned()
    } else if d < TimeDelta::hours(1) {
        format!("{} minutes ago", d.num_minutes())
    } else if d < TimeDelta::hours(2) {
        "one hour ago".to_owned()
    } else if d < TimeDelta::days(1) {
        format!("{} hours ago", d.num_hours())
    } else if d < TimeDelta::days(2) {
        "one day ago".to_owned()
    } else {
        format!("{} days ago", d.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64) -> TimeDelta {
        TimeDelta::seconds(s)
    }

    fn millis(ms: i64) -> TimeDelta {
        TimeDelta::milliseconds(ms)
    }

    #[test]
    fn test_sample_ages() {
        assert_eq!(format_elapsed(secs(0)), "just now");
        assert_eq!(format_elapsed(millis(1500)), "one second ago");
        assert_eq!(format_elapsed(millis(1900)), "one second ago");
        assert_eq!(format_elapsed(secs(90)), "one minute ago");
        assert_eq!(format_elapsed(secs(5400)), "one hour ago");
        assert_eq!(format_elapsed(secs(90_000)), "one day ago");
        assert_eq!(format_elapsed(secs(200_000)), "2 days ago");
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(format_elapsed(millis(999)), "just now");
        assert_eq!(format_elapsed(secs(1)), "one second ago");
        assert_eq!(format_elapsed(secs(2)), "2 seconds ago");
        assert_eq!(format_elapsed(secs(59)), "59 seconds ago");
        assert_eq!(format_elapsed(secs(60)), "one minute ago");
        assert_eq!(format_elapsed(secs(119)), "one minute ago");
        assert_eq!(format_elapsed(secs(120)), "2 minutes ago");
        assert_eq!(format_elapsed(secs(3599)), "59 minutes ago");
        assert_eq!(format_elapsed(secs(3600)), "one hour ago");
        assert_eq!(format_elapsed(secs(7199)), "one hour ago");
        assert_eq!(format_elapsed(secs(7200)), "2 hours ago");
        assert_eq!(format_elapsed(secs(86_399)), "23 hours ago");
        assert_eq!(format_elapsed(secs(86_400)), "one day ago");
        assert_eq!(format_elapsed(secs(172_799)), "one day ago");
        assert_eq!(format_elapsed(secs(172_800)), "2 days ago");
    }

    #[test]
    fn test_counts_round_down() {
        assert_eq!(format_elapsed(millis(59_999)), "59 seconds ago");
        assert_eq!(format_elapsed(secs(10_000)), "2 hours ago");
        assert_eq!(format_elapsed(secs(20_000)), "5 hours ago");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(format_elapsed(secs(-30)), "just now");
        assert_eq!(format_elapsed(TimeDelta::days(-3)), "just now");
    }

    #[test]
    fn test_relative_age_at() {
        let now = DateTime::parse_from_rfc3339("2024-03-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let t = now - TimeDelta::minutes(42);
        assert_eq!(relative_age_at(t, now), "42 minutes ago");
    }

    #[test]
    fn test_relative_age_recent() {
        assert_eq!(relative_age(Utc::now()), "just now");
    }
}
