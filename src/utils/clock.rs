//! Time source abstraction and human readable time helpers.

use chrono::{DateTime, Duration, Utc};

/// Provides the current time to rendering code.
///
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at the "current time" the server embedded in the page.
///
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Describe how long ago `then` was relative to `now`, e.g. "3 days ago".
/// Timestamps in the future are described as "upcoming".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed < Duration::zero() {
        return "upcoming".to_string();
    }
    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }

    let (amount, unit) = if elapsed < Duration::hours(1) {
        (elapsed.num_minutes(), "minute")
    } else if elapsed < Duration::days(1) {
        (elapsed.num_hours(), "hour")
    } else if elapsed < Duration::days(30) {
        (elapsed.num_days(), "day")
    } else if elapsed < Duration::days(365) {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{} {}{} ago", amount, unit, plural)
}

/// Format a timestamp the way the portal prints dates on cards.
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %-I:%M %p").to_string()
}

/// Format a calendar date without the time of day.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}
