//! Conversation history
//!
//! Append-only log of who said what. Used for `/history` and the session
//! duration query; it never feeds back into matching.

use chrono::{DateTime, Local};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "you"),
            Speaker::Bot => write!(f, "bot"),
        }
    }
}

/// One line of conversation
#[derive(Debug, Clone)]
pub struct Exchange {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: Vec<Exchange>,
    started_at: DateTime<Local>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            started_at: Local::now(),
        }
    }

    pub fn record(&mut self, speaker: Speaker, text: &str) {
        self.entries.push(Exchange {
            speaker,
            text: text.to_string(),
            timestamp: Local::now(),
        });
    }

    /// Up to `limit` most recent lines, oldest first
    pub fn recent(&self, limit: usize) -> &[Exchange] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Whole seconds since the session started
    pub fn duration_secs(&self) -> u64 {
        (Local::now() - self.started_at).num_seconds().max(0) as u64
    }

    /// Number of user utterances recorded
    pub fn turn_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.speaker == Speaker::User)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all lines and restart the clock
    pub fn reset(&mut self) {
        self.entries.clear();
        self.started_at = Local::now();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as "1h 2m 3s", "2m 3s" or "3s"
pub fn format_duration(duration: u64) -> String {
    let hours = duration / 3600;
    let minutes = (duration % 3600) / 60;
    let seconds = duration % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_recent() {
        let mut history = ConversationHistory::new();
        for i in 0..5 {
            history.record(Speaker::User, &format!("line {}", i));
        }
        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "line 3");
        assert_eq!(recent[1].text, "line 4");
        assert_eq!(history.recent(100).len(), 5);
    }

    #[test]
    fn test_turn_count_counts_user_lines() {
        let mut history = ConversationHistory::new();
        history.record(Speaker::User, "hi");
        history.record(Speaker::Bot, "hello");
        history.record(Speaker::User, "bye");
        assert_eq!(history.turn_count(), 2);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_reset() {
        let mut history = ConversationHistory::new();
        history.record(Speaker::User, "hi");
        history.reset();
        assert!(history.is_empty());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5), "5s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }
}
