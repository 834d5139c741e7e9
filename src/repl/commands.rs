//! Slash commands for the REPL
//!
//! Anything starting with `/` is handled here and never reaches the bot.

use anyhow::Result;
use colored::*;

use crate::engine::ChatBot;
use crate::repl::display::DisplayManager;
use crate::session::format_duration;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    History { limit: Option<usize> },
    Status,
    Knowledge,
    Learned,
    Prefs,
    Save,
    Reset,
    Verbose { enable: bool },
    Clear,
    Exit,
    Unknown { input: String },
}

/// Parses and runs slash commands
pub struct CommandHandler {
    verbose: bool,
}

impl CommandHandler {
    pub fn new(verbose: bool) -> Self {
        CommandHandler { verbose }
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> ReplCommand {
        let trimmed = input.trim();

        let Some(body) = trimmed.strip_prefix('/') else {
            return ReplCommand::Unknown {
                input: input.to_string(),
            };
        };

        let parts: Vec<&str> = body.split_whitespace().collect();
        if parts.is_empty() {
            return ReplCommand::Unknown {
                input: input.to_string(),
            };
        }

        match parts[0].to_lowercase().as_str() {
            "help" | "h" => ReplCommand::Help,
            "exit" | "quit" | "q" => ReplCommand::Exit,
            "history" => {
                let limit = parts.get(1).and_then(|s| s.parse().ok());
                ReplCommand::History { limit }
            }
            "status" => ReplCommand::Status,
            "knowledge" | "kb" => ReplCommand::Knowledge,
            "learned" => ReplCommand::Learned,
            "prefs" | "preferences" => ReplCommand::Prefs,
            "save" => ReplCommand::Save,
            "reset" => ReplCommand::Reset,
            "verbose" => {
                let enable = parts
                    .get(1)
                    .map(|s| matches!(s.to_lowercase().as_str(), "on" | "1" | "true"))
                    .unwrap_or(true);
                ReplCommand::Verbose { enable }
            }
            "clear" | "cls" => ReplCommand::Clear,
            _ => ReplCommand::Unknown {
                input: input.to_string(),
            },
        }
    }

    /// Execute a command
    ///
    /// Returns true if the REPL should continue, false if it should exit
    pub fn execute(
        &mut self,
        command: ReplCommand,
        bot: &mut ChatBot,
        display: &mut DisplayManager,
    ) -> Result<bool> {
        match command {
            ReplCommand::Help => self.show_help(),
            ReplCommand::Exit => {
                let farewell = bot.interrupt()?;
                let name = bot.session().bot_name().to_string();
                display.show_reply(&name, &farewell, None);
                return Ok(false);
            }
            ReplCommand::History { limit } => self.show_history(bot, display, limit.unwrap_or(10)),
            ReplCommand::Status => self.show_status(bot, display),
            ReplCommand::Knowledge => show_knowledge(bot, display),
            ReplCommand::Learned => show_learned(bot, display),
            ReplCommand::Prefs => show_prefs(bot, display),
            ReplCommand::Save => match bot.session().save_knowledge() {
                Ok(true) => {
                    let path = bot
                        .session()
                        .store()
                        .map(|s| s.path().display().to_string())
                        .unwrap_or_default();
                    display.show_info(&format!(
                        "Saved {} knowledge entries to {}",
                        bot.session().knowledge.len(),
                        path
                    ));
                }
                Ok(false) => display.show_warning("No knowledge file is configured."),
                Err(e) => display.show_error(&format!("Could not save knowledge: {}", e)),
            },
            ReplCommand::Reset => {
                bot.session_mut().reset();
                println!("{}", "Session reset. Preferences and learned replies cleared.".yellow());
            }
            ReplCommand::Verbose { enable } => {
                self.verbose = enable;
                let status = if enable { "enabled" } else { "disabled" };
                println!("{}", format!("Verbose mode {}", status).cyan());
            }
            ReplCommand::Clear => display.clear_screen()?,
            ReplCommand::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
            }
        }
        Ok(true)
    }

    /// Display help information
    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/history [n]", "Show the last n lines of conversation (default: 10)"),
            ("/status", "Show session status"),
            ("/knowledge, /kb", "List knowledge base entries"),
            ("/learned", "List learned replies"),
            ("/prefs", "List remembered preferences"),
            ("/save", "Write the knowledge base to disk"),
            ("/reset", "Forget preferences, learned replies and history"),
            ("/verbose [on|off]", "Show which stage answered each message"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, /quit, /q", "Say goodbye and exit"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }

        println!("\n{}", "Things to try:".bold());
        println!("  hello, what time is it?, tell me a joke, roll a 20-sided dice");
        println!("  my name is Ada, remember that my city is Paris, what is my city?");
        println!("  learn that xyzzy -> Nothing happens., calculate 2 x (3 + 4)");
        println!(
            "  Press {} or type {} to exit",
            "Ctrl-D".cyan(),
            "bye".cyan()
        );
        println!();
    }

    fn show_history(&self, bot: &ChatBot, display: &DisplayManager, limit: usize) {
        let recent = bot.session().history.recent(limit);
        if recent.is_empty() {
            println!("{}", "Nothing said yet.".yellow());
            return;
        }

        display.show_section(&format!("Conversation (last {}):", recent.len()));
        for exchange in recent {
            let when = if self.verbose {
                format!(" {}", exchange.timestamp.format("%H:%M:%S")).dimmed().to_string()
            } else {
                String::new()
            };
            println!("  {}{} {}", format!("{}:", exchange.speaker).cyan(), when, exchange.text);
        }
        println!();
    }

    fn show_status(&self, bot: &ChatBot, display: &DisplayManager) {
        let session = bot.session();
        display.show_section("Session Status:");
        display.show_field("Session", &session.id().to_string());
        display.show_field("State", &session.state().to_string());
        display.show_field("Bot", session.bot_name());
        display.show_field("User", session.user_name().unwrap_or("(unknown)"));
        display.show_field("Turns", &session.history.turn_count().to_string());
        display.show_field(
            "Duration",
            &format_duration(session.history.duration_secs()),
        );
        display.show_field(
            "Knowledge",
            &format!(
                "{} entries, {} scorer, threshold {}",
                session.knowledge.len(),
                session.knowledge.method(),
                session.knowledge.threshold()
            ),
        );
        display.show_field("Learned", &session.learned.len().to_string());
        display.show_field("Preferences", &session.preferences.len().to_string());
        display.show_field("Verbose", if self.verbose { "On" } else { "Off" });
        println!();
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, enable: bool) {
        self.verbose = enable;
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new(false)
    }
}

fn show_knowledge(bot: &ChatBot, display: &DisplayManager) {
    let entries = bot.session().knowledge.entries();
    if entries.is_empty() {
        println!("{}", "The knowledge base is empty.".yellow());
        return;
    }
    display.show_section(&format!("Knowledge ({}):", entries.len()));
    for (i, entry) in entries.iter().enumerate() {
        display.show_numbered(i + 1, &format!("{} {} {}", entry.question, "->".dimmed(), entry.answer));
    }
    println!();
}

fn show_learned(bot: &ChatBot, display: &DisplayManager) {
    let learned = bot.session().learned.entries();
    if learned.is_empty() {
        println!("{}", "Nothing learned yet. Try 'learn that hi there -> Hello!'".yellow());
        return;
    }
    display.show_section(&format!("Learned replies ({}):", learned.len()));
    for (i, pair) in learned.iter().enumerate() {
        display.show_numbered(i + 1, &format!("{} {} {}", pair.trigger, "->".dimmed(), pair.reply));
    }
    println!();
}

fn show_prefs(bot: &ChatBot, display: &DisplayManager) {
    let prefs = bot.session().preferences.entries();
    if prefs.is_empty() {
        println!("{}", "No preferences remembered yet.".yellow());
        return;
    }
    display.show_section("Preferences:");
    for (key, value) in prefs {
        display.show_field(key, value);
    }
    println!();
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}
