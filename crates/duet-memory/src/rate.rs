//! Sliding-window rate limiting for a single conversation (spec.md §4.1
//! step 4, `RATE_WINDOW` / `RATE_MAX`).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Record an accepted event at `now`, evict entries older than
/// `window_seconds`, and report whether the conversation is still under
/// `max_count`.
///
/// Returns `true` when the event should be accepted (count including this
/// one is `<= max_count`), `false` when it should be dropped.
pub fn record_and_check(
    window: &mut VecDeque<DateTime<Utc>>,
    now: DateTime<Utc>,
    window_seconds: i64,
    max_count: u32,
) -> bool {
    while let Some(&oldest) = window.front() {
        if now.signed_duration_since(oldest).num_seconds() > window_seconds {
            window.pop_front();
        } else {
            break;
        }
    }
    window.push_back(now);
    window.len() as u32 <= max_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn allows_up_to_max_within_window() {
        let mut window = VecDeque::new();
        let t0 = Utc::now();
        for i in 0..8 {
            assert!(record_and_check(&mut window, t0 + Duration::seconds(i), 60, 8));
        }
    }

    #[test]
    fn rejects_beyond_max_within_window() {
        let mut window = VecDeque::new();
        let t0 = Utc::now();
        for i in 0..8 {
            record_and_check(&mut window, t0 + Duration::seconds(i), 60, 8);
        }
        assert!(!record_and_check(&mut window, t0 + Duration::seconds(8), 60, 8));
    }

    #[test]
    fn old_entries_fall_out_of_window() {
        let mut window = VecDeque::new();
        let t0 = Utc::now();
        for i in 0..8 {
            record_and_check(&mut window, t0 + Duration::seconds(i), 60, 8);
        }
        // 61s later the first 8 entries have all aged out.
        assert!(record_and_check(&mut window, t0 + Duration::seconds(70), 60, 8));
    }
}
