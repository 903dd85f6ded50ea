use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Recency bucket a search result is displayed under. Order is fixed:
/// most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeBucket {
    Today,
    Yesterday,
    PreviousSevenDays,
    PreviousThirtyDays,
    Older,
}

impl TimeBucket {
    /// All buckets in display order.
    pub const ALL: [TimeBucket; 5] = [
        TimeBucket::Today,
        TimeBucket::Yesterday,
        TimeBucket::PreviousSevenDays,
        TimeBucket::PreviousThirtyDays,
        TimeBucket::Older,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Today => "Today",
            TimeBucket::Yesterday => "Yesterday",
            TimeBucket::PreviousSevenDays => "Previous 7 Days",
            TimeBucket::PreviousThirtyDays => "Previous 30 Days",
            TimeBucket::Older => "Older",
        }
    }

    /// Bucket for a timestamp relative to `now`. Day boundaries are midnight
    /// in the caller's timezone, given as minutes east of UTC; each bucket is
    /// inclusive on its lower edge.
    pub fn for_timestamp(
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        offset_minutes: i32,
    ) -> Self {
        let offset = fixed_offset(offset_minutes);
        let today = now.with_timezone(&offset).date_naive();
        let created = created_at.with_timezone(&offset).date_naive();
        let days_ago = (today - created).num_days();

        if days_ago <= 0 {
            TimeBucket::Today
        } else if days_ago == 1 {
            TimeBucket::Yesterday
        } else if days_ago <= 7 {
            TimeBucket::PreviousSevenDays
        } else if days_ago <= 30 {
            TimeBucket::PreviousThirtyDays
        } else {
            TimeBucket::Older
        }
    }
}

/// Out-of-range offsets fall back to UTC rather than failing the request.
fn fixed_offset(offset_minutes: i32) -> FixedOffset {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn start_of_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_today_boundary_is_inclusive() {
        let now = noon();
        let just_after_midnight = start_of_day() + Duration::milliseconds(1);
        let at_midnight = start_of_day();
        let just_before_midnight = start_of_day() - Duration::milliseconds(1);

        assert_eq!(
            TimeBucket::for_timestamp(just_after_midnight, now, 0),
            TimeBucket::Today
        );
        assert_eq!(
            TimeBucket::for_timestamp(at_midnight, now, 0),
            TimeBucket::Today
        );
        assert_eq!(
            TimeBucket::for_timestamp(just_before_midnight, now, 0),
            TimeBucket::Yesterday
        );
    }

    #[test]
    fn test_older_buckets() {
        let now = noon();

        assert_eq!(
            TimeBucket::for_timestamp(start_of_day() - Duration::days(1), now, 0),
            TimeBucket::Yesterday
        );
        assert_eq!(
            TimeBucket::for_timestamp(
                start_of_day() - Duration::days(1) - Duration::milliseconds(1),
                now,
                0
            ),
            TimeBucket::PreviousSevenDays
        );
        assert_eq!(
            TimeBucket::for_timestamp(start_of_day() - Duration::days(7), now, 0),
            TimeBucket::PreviousSevenDays
        );
        assert_eq!(
            TimeBucket::for_timestamp(start_of_day() - Duration::days(20), now, 0),
            TimeBucket::PreviousThirtyDays
        );
        assert_eq!(
            TimeBucket::for_timestamp(start_of_day() - Duration::days(30), now, 0),
            TimeBucket::PreviousThirtyDays
        );
        assert_eq!(
            TimeBucket::for_timestamp(start_of_day() - Duration::days(31), now, 0),
            TimeBucket::Older
        );
    }

    #[test]
    fn test_offset_moves_the_midnight_boundary() {
        // Client at UTC+8, local morning of Jun 15: 09:00 local is 01:00 UTC.
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 1, 0, 0).unwrap();
        // Sent at 06:00 local the same morning, which is still Jun 14 in UTC.
        let this_morning = Utc.with_ymd_and_hms(2025, 6, 14, 22, 0, 0).unwrap();

        assert_eq!(
            TimeBucket::for_timestamp(this_morning, now, 480),
            TimeBucket::Today
        );
        assert_eq!(
            TimeBucket::for_timestamp(this_morning, now, 0),
            TimeBucket::Yesterday
        );
    }

    #[test]
    fn test_negative_offset() {
        // Client at UTC-5, evening of Jun 14: 22:00 local is 03:00 UTC Jun 15.
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 3, 0, 0).unwrap();

        let same_local_day = Utc.with_ymd_and_hms(2025, 6, 14, 6, 0, 0).unwrap();
        assert_eq!(
            TimeBucket::for_timestamp(same_local_day, now, -300),
            TimeBucket::Today
        );

        let previous_local_day = Utc.with_ymd_and_hms(2025, 6, 14, 2, 0, 0).unwrap();
        assert_eq!(
            TimeBucket::for_timestamp(previous_local_day, now, -300),
            TimeBucket::Yesterday
        );
    }

    #[test]
    fn test_absurd_offset_falls_back_to_utc() {
        let now = noon();
        let this_morning = start_of_day() + Duration::hours(1);
        assert_eq!(
            TimeBucket::for_timestamp(this_morning, now, i32::MAX),
            TimeBucket::for_timestamp(this_morning, now, 0)
        );
    }

    #[test]
    fn test_display_order() {
        let labels: Vec<&str> = TimeBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Today",
                "Yesterday",
                "Previous 7 Days",
                "Previous 30 Days",
                "Older"
            ]
        );
    }
}
