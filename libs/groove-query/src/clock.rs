//! Time references used in compiled queries.
//!
//! By default the compiler emits backend date math (`now`, `now-7d`,
//! `now+1d/d`) and leaves evaluation to the search backend, which keeps the
//! output independent of when it was compiled. A fixed clock resolves the same
//! expressions to concrete UTC instants instead.

use chrono::{DateTime, Duration, Months, SecondsFormat, Utc};

use crate::criteria::ReleaseDateBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Emit date-math expressions evaluated by the backend.
    #[default]
    Relative,
    /// Resolve every expression against this instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self::Fixed(now)
    }

    pub fn now(&self) -> String {
        match self {
            Self::Relative => "now".to_string(),
            Self::Fixed(now) => format_instant(*now),
        }
    }

    /// Current instant plus one day, truncated to midnight UTC.
    pub fn start_of_tomorrow(&self) -> String {
        match self {
            Self::Relative => "now+1d/d".to_string(),
            Self::Fixed(now) => {
                let tomorrow = (*now + Duration::days(1)).date_naive();
                format_instant(tomorrow.and_time(chrono::NaiveTime::MIN).and_utc())
            }
        }
    }

    /// Lower bound on variant release dates for a bucket, if any.
    pub fn release_lower_bound(&self, bucket: ReleaseDateBucket) -> Option<String> {
        let bound = match (self, bucket) {
            (_, ReleaseDateBucket::Anytime) => return None,
            (Self::Relative, ReleaseDateBucket::LastWeek) => "now-7d".to_string(),
            (Self::Relative, ReleaseDateBucket::LastMonth) => "now-1M".to_string(),
            (Self::Relative, ReleaseDateBucket::LastYear) => "now-1y".to_string(),
            (Self::Fixed(now), ReleaseDateBucket::LastWeek) => {
                format_instant(*now - Duration::days(7))
            }
            (Self::Fixed(now), ReleaseDateBucket::LastMonth) => {
                format_instant(now.checked_sub_months(Months::new(1)).unwrap_or(*now))
            }
            (Self::Fixed(now), ReleaseDateBucket::LastYear) => {
                format_instant(now.checked_sub_months(Months::new(12)).unwrap_or(*now))
            }
        };
        Some(bound)
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> Clock {
        Clock::fixed(Utc.with_ymd_and_hms(2024, 3, 31, 15, 42, 7).unwrap())
    }

    #[test]
    fn relative_clock_uses_date_math() {
        let clock = Clock::Relative;
        assert_eq!(clock.now(), "now");
        assert_eq!(clock.start_of_tomorrow(), "now+1d/d");
        assert_eq!(
            clock.release_lower_bound(ReleaseDateBucket::LastWeek).as_deref(),
            Some("now-7d")
        );
        assert_eq!(clock.release_lower_bound(ReleaseDateBucket::Anytime), None);
    }

    #[test]
    fn fixed_clock_truncates_tomorrow_to_midnight() {
        assert_eq!(fixed().now(), "2024-03-31T15:42:07Z");
        assert_eq!(fixed().start_of_tomorrow(), "2024-04-01T00:00:00Z");
    }

    #[test]
    fn fixed_clock_release_buckets() {
        let clock = fixed();
        assert_eq!(
            clock.release_lower_bound(ReleaseDateBucket::LastWeek).as_deref(),
            Some("2024-03-24T15:42:07Z")
        );
        // Month arithmetic clamps to the last day of a shorter month.
        assert_eq!(
            clock.release_lower_bound(ReleaseDateBucket::LastMonth).as_deref(),
            Some("2024-02-29T15:42:07Z")
        );
        assert_eq!(
            clock.release_lower_bound(ReleaseDateBucket::LastYear).as_deref(),
            Some("2023-03-31T15:42:07Z")
        );
    }
}
