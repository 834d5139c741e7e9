//! Learned responses: user-taught trigger phrases with fixed replies

/// A single taught trigger and its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedResponse {
    pub trigger: String,
    pub reply: String,
}

/// Ordered trigger -> reply store
///
/// Keys are the trimmed trigger, compared exactly. Lookup is a
/// case-insensitive substring scan in insertion order, so the earliest
/// registered trigger wins when several appear in one utterance.
/// Re-learning an existing trigger replaces its reply in place.
#[derive(Debug, Clone, Default)]
pub struct LearnedResponses {
    entries: Vec<LearnedResponse>,
}

impl LearnedResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a trigger. Returns false if the trigger is blank.
    pub fn learn(&mut self, trigger: &str, reply: &str) -> bool {
        let trigger = trigger.trim();
        if trigger.is_empty() {
            return false;
        }
        let reply = reply.trim().to_string();

        match self.entries.iter_mut().find(|e| e.trigger == trigger) {
            Some(existing) => existing.reply = reply,
            None => self.entries.push(LearnedResponse {
                trigger: trigger.to_string(),
                reply,
            }),
        }
        true
    }

    /// Reply for the first trigger contained in `utterance`
    pub fn lookup(&self, utterance: &str) -> Option<&str> {
        let haystack = utterance.to_lowercase();
        self.entries
            .iter()
            .find(|e| haystack.contains(&e.trigger.to_lowercase()))
            .map(|e| e.reply.as_str())
    }

    pub fn entries(&self) -> &[LearnedResponse] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
