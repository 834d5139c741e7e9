//! Error types for ChatBuddy
//!
//! Lifecycle, configuration and storage failures surface here. Problems with
//! what the user typed never do: those are turned into replies by the engine.

use thiserror::Error;

/// Main error type for the chatbot
#[derive(Error, Debug)]
pub enum ChatError {
    /// Session state machine transition errors
    #[error("Invalid session transition from {from:?} via {event:?}: {reason}")]
    InvalidTransition {
        from: String,
        event: String,
        reason: String,
    },

    /// A turn was submitted while the session was not accepting input
    #[error("Session is not active (current state: {state})")]
    SessionNotActive { state: String },

    /// Knowledge store errors
    #[error("Knowledge store error: {0}")]
    KnowledgeError(String),

    /// The knowledge file was unreadable and could not be set aside
    #[error("Refusing to overwrite unreadable knowledge file {0}")]
    StoreProtected(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Command pattern compilation errors
    #[error("Invalid command pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::SessionNotActive {
            state: "Terminated".to_string(),
        };
        assert!(err.to_string().contains("Terminated"));
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = ChatError::InvalidTransition {
            from: "Terminated".to_string(),
            event: "Start".to_string(),
            reason: "Session already ended".to_string(),
        };
        assert!(err.to_string().contains("Terminated"));
        assert!(err.to_string().contains("Start"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ChatError = io.into();
        assert!(matches!(err, ChatError::IoError(_)));
    }
}
