//! Relative-age ("time ago") semantics.
//!
//! Ages are whole seconds (floor of the millisecond delta), growing without
//! bound: there is deliberately no escalation to minutes or hours.

use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeAge {
    /// The timestamp is ahead of the clock.
    Future,
    /// At most five seconds old.
    JustNow,
    SecondsAgo(i64),
}

impl std::fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Future => "in the future".fmt(f),
            Self::JustNow => "just now".fmt(f),
            Self::SecondsAgo(seconds) => write!(f, "{seconds} seconds ago"),
        }
    }
}

pub fn relative_age(now: DateTime<Utc>, then: DateTime<Utc>) -> RelativeAge {
    let seconds = (now.timestamp_millis() - then.timestamp_millis()).div_euclid(1000);
    if seconds < 0 {
        RelativeAge::Future
    } else if seconds <= 5 {
        RelativeAge::JustNow
    } else {
        RelativeAge::SecondsAgo(seconds)
    }
}

/// Parses the RFC 3339 timestamp carried by a display element.
/// `None` means the caller should render nothing.
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn ages() {
        let now = Utc::now();
        assert_eq!(relative_age(now, now - Duration::seconds(3)), RelativeAge::JustNow);
        assert_eq!(
            relative_age(now, now - Duration::seconds(42)),
            RelativeAge::SecondsAgo(42)
        );
        assert_eq!(relative_age(now, now + Duration::seconds(10)), RelativeAge::Future);
    }

    #[test]
    fn boundaries() {
        let now = Utc::now();
        assert_eq!(relative_age(now, now), RelativeAge::JustNow);
        assert_eq!(relative_age(now, now - Duration::seconds(5)), RelativeAge::JustNow);
        assert_eq!(
            relative_age(now, now - Duration::seconds(6)),
            RelativeAge::SecondsAgo(6)
        );
        // One millisecond ahead still counts as the future:
        assert_eq!(
            relative_age(now, now + Duration::milliseconds(1)),
            RelativeAge::Future
        );
        // 5.9 seconds is floor'ed to 5, i.e. still "just now":
        assert_eq!(
            relative_age(now, now - Duration::milliseconds(5_900)),
            RelativeAge::JustNow
        );
    }

    #[test]
    fn rendering() {
        assert_eq!(RelativeAge::Future.to_string(), "in the future");
        assert_eq!(RelativeAge::JustNow.to_string(), "just now");
        assert_eq!(RelativeAge::SecondsAgo(42).to_string(), "42 seconds ago");
    }

    #[test]
    fn timestamp_parsing() {
        assert!(parse_timestamp("2022-05-17T10:26:51+00:00").is_some());
        assert!(parse_timestamp("2022-05-17T10:26:51Z").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday-ish").is_none());
    }
}
