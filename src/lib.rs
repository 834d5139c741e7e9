//! ChatBuddy - a rule-based terminal chatbot
//!
//! Every utterance runs through one pipeline: normalize, match a command,
//! check learned replies, look up the knowledge base, and finally fall back
//! to a canned reply. All conversation state lives in an explicit
//! [`session::ChatSession`].
//!
//! # Architecture
//!
//! - **engine**: the response pipeline and command handlers
//! - **memory**: preferences, learned replies, knowledge base and its file
//! - **session**: lifecycle state machine and conversation history
//! - **repl** / **cli**: the terminal front end

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod memory;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use engine::{ChatBot, Reply, Stage};
pub use errors::{ChatError, Result};
