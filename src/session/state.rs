//! Session lifecycle state machine
//!
//! ```text
//! Idle --Start--> Active --Turn--> Active
//!                 Active --Exit | Interrupt--> Terminated
//! Idle --Interrupt--> Terminated
//! ```
//! `Terminated` absorbs further Exit/Interrupt events and rejects
//! everything else.

use std::fmt;

use crate::errors::{ChatError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, knowledge not yet loaded
    Idle,
    /// Accepting turns
    Active,
    /// Ended by an exit command or an interrupt (terminal)
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Knowledge loaded, ready for input
    Start,
    /// One utterance processed
    Turn,
    /// Goodbye phrase recognized
    Exit,
    /// External interrupt (Ctrl-C, end of input)
    Interrupt,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }

    /// Next state for `event`, or an error for an invalid edge
    pub fn transition(&self, event: SessionEvent) -> Result<SessionState> {
        use SessionEvent::*;
        use SessionState::*;

        let next = match (self, event) {
            (Idle, Start) => Active,
            (Idle, Interrupt) => Terminated,
            (Active, Turn) => Active,
            (Active, Exit) | (Active, Interrupt) => Terminated,
            (Terminated, Exit) | (Terminated, Interrupt) => Terminated,
            (from, event) => {
                return Err(ChatError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };
        Ok(next)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Active => write!(f, "active"),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}
