//! Fallback responder
//!
//! Used when no command, learned trigger or confident knowledge answer
//! exists. Output is random: a reply from the configured
//! bucket, sometimes followed by a follow-up question.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::FallbackConfig;
use crate::engine::phrases;

#[derive(Debug, Clone)]
pub struct FallbackResponder {
    replies: Vec<String>,
    follow_ups: Vec<String>,
    unknown_question: Vec<String>,
    follow_up_probability: f64,
}

impl FallbackResponder {
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            replies: config.replies.clone(),
            follow_ups: config.follow_ups.clone(),
            unknown_question: phrases::to_owned(phrases::UNKNOWN_QUESTION),
            follow_up_probability: config.follow_up_probability.clamp(0.0, 1.0),
        }
    }

    /// Generic acknowledgement, maybe with a follow-up question
    pub fn respond<R: Rng>(&self, rng: &mut R) -> String {
        let base = choose(&self.replies, rng, "Hmm.");
        self.with_follow_up(base, rng)
    }

    /// Reply for a question the knowledge base could not answer
    pub fn unknown_question<R: Rng>(&self, rng: &mut R) -> String {
        choose(&self.unknown_question, rng, "I don't know.").to_string()
    }

    fn with_follow_up<R: Rng>(&self, base: &str, rng: &mut R) -> String {
        if !self.follow_ups.is_empty() && rng.gen_bool(self.follow_up_probability) {
            let follow_up = choose(&self.follow_ups, rng, "");
            format!("{} {}", base, follow_up)
        } else {
            base.to_string()
        }
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn unknown_question_replies(&self) -> &[String] {
        &self.unknown_question
    }

    /// True if `reply` could have come from this responder
    pub fn is_fallback(&self, reply: &str) -> bool {
        if self.unknown_question.iter().any(|r| r == reply) {
            return true;
        }
        self.replies.iter().any(|base| {
            reply == base
                || reply
                    .strip_prefix(base.as_str())
                    .and_then(|rest| rest.strip_prefix(' '))
                    .map(|rest| self.follow_ups.iter().any(|f| f == rest))
                    .unwrap_or(false)
        })
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(&FallbackConfig::default())
    }
}

fn choose<'a, R: Rng>(options: &'a [String], rng: &mut R, default: &'a str) -> &'a str {
    options.choose(rng).map(String::as_str).unwrap_or(default)
}
