//! OutboundEcho cache (spec.md §3/§4.1 step 3).
//!
//! Many transports echo a just-sent outbound message back as an inbound
//! event. We remember the last few outbound texts per conversation and drop
//! an inbound event whose normalized text matches one within `ECHO_TTL`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Entries retained per conversation before the oldest is evicted, bounding
/// cache growth independent of the TTL.
const MAX_ENTRIES_PER_CHAT: usize = 16;

#[derive(Debug, Clone)]
struct Entry {
    normalized: String,
    sent_at: DateTime<Utc>,
}

/// Per-conversation ring of recently sent outbound texts.
#[derive(Debug, Clone, Default)]
pub struct OutboundEcho {
    entries: VecDeque<Entry>,
}

impl OutboundEcho {
    pub fn record(&mut self, text: &str, sent_at: DateTime<Utc>) {
        self.entries.push_back(Entry {
            normalized: normalize(text),
            sent_at,
        });
        while self.entries.len() > MAX_ENTRIES_PER_CHAT {
            self.entries.pop_front();
        }
    }

    /// Whether `text` matches a recent outbound send within `ttl_seconds`.
    pub fn is_echo(&self, text: &str, now: DateTime<Utc>, ttl_seconds: i64) -> bool {
        let normalized = normalize(text);
        self.entries.iter().any(|e| {
            let age = now.signed_duration_since(e.sent_at).num_seconds();
            age >= 0 && age <= ttl_seconds && e.normalized == normalized
        })
    }
}

/// Trim, collapse internal whitespace runs, and lowercase (spec.md §4.1 step 3).
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn matches_within_ttl_after_normalization() {
        let mut cache = OutboundEcho::default();
        let t0 = Utc::now();
        cache.record("  Hello   World  ", t0);
        assert!(cache.is_echo("hello world", t0 + Duration::seconds(5), 10));
    }

    #[test]
    fn does_not_match_past_ttl() {
        let mut cache = OutboundEcho::default();
        let t0 = Utc::now();
        cache.record("hello world", t0);
        assert!(!cache.is_echo("hello world", t0 + Duration::seconds(11), 10));
    }

    #[test]
    fn does_not_match_different_text() {
        let mut cache = OutboundEcho::default();
        let t0 = Utc::now();
        cache.record("hello world", t0);
        assert!(!cache.is_echo("goodbye world", t0, 10));
    }
}
