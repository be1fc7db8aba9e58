use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Length of a challenge window in days.
pub const WINDOW_DAYS: i64 = 3;

/// The derived state of a challenge's 3-day window. Never persisted —
/// recomputed from the start timestamp on every request.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// 0-based index of the current day, clamped to 0..=2.
    pub today_index: u32,
    pub ended: bool,
}

/// Derive the window state at `now` for a challenge started at `start_at`.
///
/// today_index = floor((now - start) / 24h) clamped to [0, 2]; the window
/// is ended once 3 full days have elapsed.
pub fn timeline(start_at: DateTime<Utc>, now: DateTime<Utc>) -> Timeline {
    let elapsed_days = (now - start_at).num_days();
    Timeline {
        start_at,
        end_at: start_at + Duration::days(WINDOW_DAYS),
        today_index: elapsed_days.clamp(0, WINDOW_DAYS - 1) as u32,
        ended: elapsed_days >= WINDOW_DAYS,
    }
}

impl Timeline {
    /// Whether a proof may be submitted for the given 1-based day.
    /// Days unlock one at a time and nothing is accepted after the window.
    pub fn day_open(&self, day: u32) -> bool {
        (1..=WINDOW_DAYS as u32).contains(&day) && !self.ended && day - 1 <= self.today_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: DateTime<Utc>, hours: i64) -> Timeline {
        timeline(start, start + Duration::hours(hours))
    }

    #[test]
    fn day_index_advances_per_24h() {
        let start = Utc::now();
        assert_eq!(at(start, 0).today_index, 0);
        assert_eq!(at(start, 23).today_index, 0);
        assert_eq!(at(start, 25).today_index, 1);
        assert_eq!(at(start, 49).today_index, 2);
    }

    #[test]
    fn window_ends_after_three_days() {
        let start = Utc::now();
        assert!(!at(start, 71).ended);
        assert!(at(start, 72).ended);
        assert!(at(start, 80).ended);
        // index stays clamped even past the end
        assert_eq!(at(start, 80).today_index, 2);
    }

    #[test]
    fn clock_skew_before_start_clamps_to_day_zero() {
        let start = Utc::now();
        let t = timeline(start, start - Duration::hours(2));
        assert_eq!(t.today_index, 0);
        assert!(!t.ended);
    }

    #[test]
    fn day_open_unlocks_sequentially() {
        let start = Utc::now();
        let t = at(start, 25); // day index 1
        assert!(t.day_open(1));
        assert!(t.day_open(2));
        assert!(!t.day_open(3)); // opens tomorrow
        assert!(!t.day_open(0));
        assert!(!t.day_open(4));

        let ended = at(start, 80);
        assert!(!ended.day_open(1));
    }
}
