//! Score history
//!
//! Append-only log of finished runs, newest first, capped at `MAX_HISTORY`.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HISTORY;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Final score
    pub score: u64,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: f64,
}

/// History of finished runs (most recent first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ScoreHistory {
    entries: Vec<HistoryEntry>,
}

impl ScoreHistory {
    /// Create empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap entries already in most-recent-first order
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(MAX_HISTORY);
        Self { entries }
    }

    /// Record a run at the front, dropping the oldest past the cap
    pub fn record(&mut self, score: u64, timestamp: f64) {
        self.entries.insert(0, HistoryEntry { score, timestamp });
        self.entries.truncate(MAX_HISTORY);
    }

    /// Entries, most recent first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on record (if any)
    pub fn best(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// Rank a score would take among recorded scores (1-indexed)
    pub fn rank_of(&self, score: u64) -> usize {
        self.entries.iter().filter(|e| e.score > score).count() + 1
    }

    /// Decode stored JSON. Anything malformed yields an empty history.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<ScoreHistory>(json) {
            Ok(mut history) => {
                history.entries.truncate(MAX_HISTORY);
                history
            }
            Err(e) => {
                log::warn!("Discarding unreadable score history: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let now = js_sys::Date::now();
    let diff_ms = now - timestamp;
    let diff_mins = diff_ms / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
            format!(
                "{}/{}/{}",
                date.get_month() + 1,
                date.get_date(),
                date.get_full_year() % 100
            )
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut h = ScoreHistory::new();
        h.record(10, 1.0);
        h.record(30, 2.0);
        assert_eq!(h.entries()[0].score, 30);
        assert_eq!(h.entries()[1].score, 10);
        assert_eq!(h.best(), Some(30));
    }

    #[test]
    fn test_capped_at_max() {
        let mut h = ScoreHistory::new();
        for i in 0..(MAX_HISTORY as u64 + 25) {
            h.record(i, i as f64);
        }
        assert_eq!(h.len(), MAX_HISTORY);
        // Oldest dropped
        assert_eq!(h.entries().last().map(|e| e.score), Some(25));
    }

    #[test]
    fn test_json_round_trip_shape() {
        let mut h = ScoreHistory::new();
        h.record(40, 1700000000000.0);
        let json = h.to_json().unwrap();
        assert_eq!(json, r#"[{"score":40,"timestamp":1700000000000.0}]"#);
        assert_eq!(ScoreHistory::from_json(&json), h);
    }

    #[test]
    fn test_corrupt_json_is_empty() {
        assert!(ScoreHistory::from_json("{not json").is_empty());
        assert!(ScoreHistory::from_json(r#"{"score": 3}"#).is_empty());
        assert!(ScoreHistory::from_json("").is_empty());
    }

    #[test]
    fn test_rank_of() {
        let mut h = ScoreHistory::new();
        h.record(50, 0.0);
        h.record(20, 0.0);
        assert_eq!(h.rank_of(60), 1);
        assert_eq!(h.rank_of(30), 2);
        assert_eq!(h.rank_of(10), 3);
    }
}
