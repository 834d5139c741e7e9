//! Response engine
//!
//! Each utterance flows once, top to bottom, through five stages:
//!
//! 1. normalize the text
//! 2. command matcher (first matching rule wins)
//! 3. learned triggers (first registered trigger wins)
//! 4. knowledge lookup, only for question-shaped input
//! 5. fallback responder
//!
//! The first stage that produces a reply ends the turn. A turn runs to
//! completion on `&mut self`, so rule order and last-write-wins updates are
//! never interleaved with another turn.

pub mod calculator;
pub mod fallback;
pub mod handlers;
pub mod matcher;
pub mod normalizer;
pub mod phrases;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{ChatError, Result};
use crate::memory::{KnowledgeBase, KnowledgeStore, LoadStatus};
use crate::session::{ChatSession, SessionEvent, Speaker};

pub use fallback::FallbackResponder;
pub use handlers::CommandError;
pub use matcher::{Command, CommandMatcher, MatchOutcome};
pub use normalizer::Utterance;

/// Which stage produced a reply
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Command { rule: &'static str },
    Learned,
    Knowledge { score: f64 },
    Fallback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Command { rule } => write!(f, "command:{}", rule),
            Stage::Learned => write!(f, "learned"),
            Stage::Knowledge { score } => write!(f, "knowledge ({:.2})", score),
            Stage::Fallback => write!(f, "fallback"),
        }
    }
}

/// The bot's answer to one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub stage: Stage,
    /// Set when the utterance ended the session
    pub terminate: bool,
}

impl Reply {
    fn new(text: impl Into<String>, stage: Stage) -> Self {
        Self {
            text: text.into(),
            stage,
            terminate: false,
        }
    }
}

/// Session plus the machinery that answers it
pub struct ChatBot {
    session: ChatSession,
    matcher: CommandMatcher,
    fallback: FallbackResponder,
    rng: StdRng,
}

impl ChatBot {
    /// Bot over an existing session, with the built-in command rules
    pub fn new(session: ChatSession, fallback: FallbackResponder) -> Result<Self> {
        Ok(Self {
            session,
            matcher: CommandMatcher::new()?,
            fallback,
            rng: StdRng::from_entropy(),
        })
    }

    /// Bot wired from configuration; the knowledge file is read on [`ChatBot::start`]
    pub fn from_config(config: &Config) -> Result<Self> {
        let knowledge =
            KnowledgeBase::with_defaults(config.knowledge.scorer, config.knowledge.threshold);
        let session = ChatSession::new(config.bot.name.clone(), knowledge).with_store(
            KnowledgeStore::new(config.knowledge_path()),
            config.knowledge.persist_learned,
        );
        Self::new(session, FallbackResponder::new(&config.fallback))
    }

    /// Use a deterministic random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Load knowledge and begin accepting turns (Idle -> Active)
    pub fn start(&mut self) -> Result<Option<LoadStatus>> {
        let status = self.session.load_knowledge();
        match &status {
            Some(LoadStatus::Corrupt { reason, .. }) => {
                warn!(reason = %reason, "Using default knowledge")
            }
            Some(LoadStatus::Missing) => info!("No knowledge file yet, using defaults"),
            _ => {}
        }
        self.session.transition(SessionEvent::Start)?;
        info!(
            session = %self.session.id(),
            entries = self.session.knowledge.len(),
            scorer = %self.session.knowledge.method(),
            "Session started"
        );
        Ok(status)
    }

    /// Answer one utterance
    pub fn respond(&mut self, input: &str) -> Result<Reply> {
        if !self.session.is_active() {
            return Err(ChatError::SessionNotActive {
                state: self.session.state().to_string(),
            });
        }

        let utterance = Utterance::new(input);
        if utterance.is_empty() {
            return Ok(Reply::new(self.fallback.respond(&mut self.rng), Stage::Fallback));
        }

        self.session.history.record(Speaker::User, &utterance.text);
        let reply = self.run_pipeline(&utterance);
        self.session.history.record(Speaker::Bot, &reply.text);

        let event = if reply.terminate {
            SessionEvent::Exit
        } else {
            SessionEvent::Turn
        };
        self.session.transition(event)?;

        debug!(stage = %reply.stage, terminate = reply.terminate, "Turn complete");
        Ok(reply)
    }

    /// End the session from outside (Ctrl-C, end of input); returns a farewell
    pub fn interrupt(&mut self) -> Result<String> {
        self.session.transition(SessionEvent::Interrupt)?;
        Ok(phrases::FAREWELLS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Goodbye!")
            .to_string())
    }

    fn run_pipeline(&mut self, utterance: &Utterance) -> Reply {
        match self.matcher.match_command(utterance) {
            MatchOutcome::Matched { rule, command } => {
                let text = match handlers::execute(&command, &mut self.session, &mut self.rng) {
                    Ok(text) => text,
                    Err(e) => {
                        match &e {
                            CommandError::InvalidInput(reason) => {
                                debug!(rule, reason = %reason, "Command rejected input")
                            }
                            CommandError::Internal(reason) => {
                                warn!(rule, reason = %reason, "Command failed")
                            }
                        }
                        e.user_message()
                    }
                };
                return Reply {
                    text,
                    stage: Stage::Command { rule },
                    terminate: command.is_exit(),
                };
            }
            MatchOutcome::Malformed { rule, reason } => {
                debug!(rule, reason = %reason, "Malformed command");
                return Reply::new(reason, Stage::Command { rule });
            }
            MatchOutcome::NoMatch => {}
        }

        if let Some(reply) = self.session.learned.lookup(&utterance.lower) {
            return Reply::new(reply, Stage::Learned);
        }

        if utterance.looks_like_question() {
            if let Some(found) = self.session.knowledge.lookup(&utterance.text) {
                return Reply::new(
                    found.entry.answer.clone(),
                    Stage::Knowledge { score: found.score },
                );
            }
            return Reply::new(self.fallback.unknown_question(&mut self.rng), Stage::Fallback);
        }

        Reply::new(self.fallback.respond(&mut self.rng), Stage::Fallback)
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn fallback(&self) -> &FallbackResponder {
        &self.fallback
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }
}
