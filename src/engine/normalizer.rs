//! Input normalization
//!
//! Every utterance passes through here once per turn. The normalized form
//! keeps the original casing (so captured values like "Paris" survive) next
//! to a lowercased copy used for case-insensitive lookups.

/// Question openers used by [`Utterance::looks_like_question`]
const QUESTION_WORDS: &[&str] = &[
    "what", "who", "where", "when", "why", "how", "which", "is", "are", "can", "do", "does",
    "did", "will", "would", "should", "could",
];

/// A single normalized turn of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Trimmed text with internal whitespace collapsed, original case
    pub text: String,
    /// Lowercased `text`
    pub lower: String,
}

impl Utterance {
    /// Normalize raw input
    pub fn new(raw: &str) -> Self {
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = text.to_lowercase();
        Utterance { text, lower }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Heuristic: ends with '?' or opens with an interrogative word
    pub fn looks_like_question(&self) -> bool {
        if self.text.ends_with('?') {
            return true;
        }
        self.lower
            .split_whitespace()
            .next()
            .map(|first| QUESTION_WORDS.contains(&first.trim_end_matches(|c: char| !c.is_alphanumeric())))
            .unwrap_or(false)
    }
}

/// Split text into lowercase alphanumeric words
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
