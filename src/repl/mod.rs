//! REPL (Read-Eval-Print Loop) for chatting in the terminal
//!
//! Reads a line, routes slash commands to [`CommandHandler`] and everything
//! else to the [`ChatBot`], and prints the reply.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use tracing::warn;

use crate::engine::ChatBot;
use crate::memory::LoadStatus;
use crate::repl::commands::{is_command, CommandHandler};
pub use crate::repl::display::DisplayManager;
pub use crate::repl::input::{InputEvent, InputHandler};

/// REPL session coordinator
pub struct ReplSession {
    bot: ChatBot,
    input_handler: InputHandler,
    command_handler: CommandHandler,
    display_manager: DisplayManager,
}

impl ReplSession {
    pub fn new(
        bot: ChatBot,
        input_handler: InputHandler,
        display_manager: DisplayManager,
        verbose: bool,
    ) -> Self {
        ReplSession {
            bot,
            input_handler,
            command_handler: CommandHandler::new(verbose),
            display_manager,
        }
    }

    /// Start the bot and show the banner
    pub fn start(&mut self, version: &str) -> Result<()> {
        let status = self.bot.start()?;
        if let Some(LoadStatus::Corrupt { reason, backup }) = &status {
            let kept = match backup {
                Some(path) => format!("the original was moved to {}", path.display()),
                None => "the original was left untouched".to_string(),
            };
            self.display_manager.show_warning(&format!(
                "Knowledge file could not be read ({}); using built-in answers, {}.",
                reason, kept
            ));
        }
        let name = self.bot_name();
        self.display_manager.show_banner(&name, version);
        Ok(())
    }

    /// Handle one line of input
    ///
    /// Returns true if session should continue, false to exit
    pub fn handle_input(&mut self, input: &str) -> Result<bool> {
        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self
                .command_handler
                .execute(command, &mut self.bot, &mut self.display_manager);
        }

        let name = self.bot_name();
        self.display_manager.start_typing(&name);
        let reply = match self.bot.respond(input) {
            Ok(reply) => reply,
            Err(e) => {
                self.display_manager.finish_typing();
                return Err(e.into());
            }
        };

        let stage = self.command_handler.is_verbose().then_some(&reply.stage);
        self.display_manager.show_reply(&name, &reply.text, stage);
        Ok(!reply.terminate)
    }

    /// Run until the user leaves
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.input_handler.read_line()? {
                InputEvent::Line(line) => match self.handle_input(&line) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => self.display_manager.show_error(&e.to_string()),
                },
                InputEvent::Eof | InputEvent::Interrupted => {
                    let farewell = self.bot.interrupt()?;
                    let name = self.bot_name();
                    println!();
                    self.display_manager.show_reply(&name, &farewell, None);
                    break;
                }
            }
        }

        self.save();
        Ok(())
    }

    /// Persist line history; failure is reported but not fatal
    pub fn save(&mut self) {
        if let Err(e) = self.input_handler.save_history() {
            warn!(error = %e, "Failed to save input history");
            self.display_manager
                .show_warning(&format!("Could not save input history: {:#}", e));
        }
    }

    fn bot_name(&self) -> String {
        self.bot.session().bot_name().to_string()
    }

    pub fn bot(&self) -> &ChatBot {
        &self.bot
    }

    pub fn bot_mut(&mut self) -> &mut ChatBot {
        &mut self.bot
    }

    pub fn is_verbose(&self) -> bool {
        self.command_handler.is_verbose()
    }

    pub fn set_verbose(&mut self, enable: bool) {
        self.command_handler.set_verbose(enable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FallbackResponder;
    use crate::memory::knowledge::{ScoringMethod, DEFAULT_THRESHOLD};
    use crate::memory::KnowledgeBase;
    use crate::session::{ChatSession, SessionState};

    fn repl() -> ReplSession {
        let session = ChatSession::new(
            "Buddy",
            KnowledgeBase::with_defaults(ScoringMethod::Overlap, DEFAULT_THRESHOLD),
        );
        let bot = ChatBot::new(session, FallbackResponder::default())
            .unwrap()
            .with_seed(5);
        let mut repl = ReplSession::new(
            bot,
            InputHandler::new("you> ").unwrap(),
            DisplayManager::new(false),
            false,
        );
        repl.start("test").unwrap();
        repl
    }

    #[test]
    fn test_start_activates_bot() {
        let repl = repl();
        assert!(repl.bot().is_active());
    }

    #[test]
    fn test_handle_command() {
        let mut repl = repl();
        assert!(repl.handle_input("/help").unwrap());
        // Commands are not part of the conversation
        assert!(repl.bot().session().history.is_empty());
    }

    #[test]
    fn test_handle_exit_command() {
        let mut repl = repl();
        assert!(!repl.handle_input("/exit").unwrap());
        assert_eq!(repl.bot().session().state(), SessionState::Terminated);
    }

    #[test]
    fn test_chat_turns() {
        let mut repl = repl();
        assert!(repl.handle_input("hello").unwrap());
        assert!(repl.handle_input("learn xyzzy::Nothing happens.").unwrap());
        assert_eq!(
            repl.bot().session().learned.lookup("xyzzy"),
            Some("Nothing happens.")
        );
        assert!(!repl.handle_input("goodbye").unwrap());
    }

    #[test]
    fn test_empty_input_continues() {
        let mut repl = repl();
        assert!(repl.handle_input("").unwrap());
        assert!(repl.handle_input("   ").unwrap());
    }

    #[test]
    fn test_input_after_exit_is_error() {
        let mut repl = repl();
        repl.handle_input("bye").unwrap();
        assert!(repl.handle_input("hello").is_err());
    }

    #[test]
    fn test_verbose_mode() {
        let mut repl = repl();
        assert!(!repl.is_verbose());
        repl.set_verbose(true);
        assert!(repl.is_verbose());
        assert!(repl.handle_input("tell me a joke").unwrap());
    }
}
