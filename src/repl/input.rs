//! Input handler for REPL using rustyline
//!
//! Provides readline functionality with editing and a persisted history file.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// What a single read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A trimmed line; may be empty
    Line(String),
    /// Ctrl-D
    Eof,
    /// Ctrl-C
    Interrupted,
}

/// Input handler managing readline interface and command history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to create line editor")?;

        Ok(InputHandler {
            editor,
            history_path: None,
            prompt: prompt.into(),
        })
    }

    /// Create input handler with persistent history
    pub fn with_history(history_file: PathBuf, prompt: impl Into<String>) -> Result<Self> {
        let mut handler = Self::new(prompt)?;

        // Load existing history if file exists
        if history_file.exists() {
            let _ = handler.editor.load_history(&history_file);
        }
        handler.history_path = Some(history_file);
        Ok(handler)
    }

    /// Read a line of input from user
    pub fn read_line(&mut self) -> Result<InputEvent> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(InputEvent::Line(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create history directory {}", parent.display())
                    })?;
                }
            }
            self.editor
                .save_history(path)
                .with_context(|| format!("Failed to save history to {}", path.display()))?;
        }
        Ok(())
    }

    /// Clear command history
    pub fn clear_history(&mut self) {
        let _ = self.editor.history_mut().clear();
    }

    /// Get history size
    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_input_handler_creation() {
        let handler = InputHandler::new("you> ");
        assert!(handler.is_ok());
    }

    #[test]
    fn test_history_persistence() {
        let temp_dir = TempDir::new().unwrap();
        // Parent directory does not exist yet
        let history_path = temp_dir.path().join("nested").join("history");

        {
            let mut handler = InputHandler::with_history(history_path.clone(), "> ").unwrap();
            let _ = handler.editor.add_history_entry("hello");
            let _ = handler.editor.add_history_entry("what time is it");
            handler.save_history().unwrap();
        }

        assert!(history_path.exists());

        {
            let handler = InputHandler::with_history(history_path, "> ").unwrap();
            assert_eq!(handler.history_len(), 2);
        }
    }

    #[test]
    fn test_clear_history() {
        let mut handler = InputHandler::new("> ").unwrap();
        let _ = handler.editor.add_history_entry("test");
        assert_eq!(handler.history_len(), 1);

        handler.clear_history();
        assert_eq!(handler.history_len(), 0);
    }

    #[test]
    fn test_save_without_history_file_is_noop() {
        let mut handler = InputHandler::new("> ").unwrap();
        assert!(handler.history_path.is_none());
        assert!(handler.save_history().is_ok());
    }

    #[test]
    fn test_history_path_some() {
        let temp_dir = TempDir::new().unwrap();
        let history_path = temp_dir.path().join("history");

        let handler = InputHandler::with_history(history_path.clone(), "> ").unwrap();
        assert_eq!(handler.history_path, Some(history_path));
    }
}
