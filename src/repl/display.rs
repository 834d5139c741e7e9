//! Display manager for REPL terminal UI
//!
//! Colored replies and notices on stdout, plus a short typing spinner.

use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

use crate::engine::Stage;

/// Display manager for REPL UI
pub struct DisplayManager {
    typing_indicator: bool,
    current_spinner: Option<ProgressBar>,
    update_interval: Duration,
}

impl DisplayManager {
    pub fn new(typing_indicator: bool) -> Self {
        DisplayManager {
            typing_indicator,
            current_spinner: None,
            update_interval: Duration::from_millis(80),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, bot_name: &str, version: &str) {
        let width = 64;
        let rule = "=".repeat(width).cyan();
        let title = format!("  ChatBuddy {} - {} is listening", version, bot_name);

        println!("\n{}", rule);
        println!("{}", title.bold().cyan());
        println!("{}\n", rule);
        println!(
            "Say something (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Start the "typing" spinner, if enabled
    pub fn start_typing(&mut self, bot_name: &str) {
        if !self.typing_indicator {
            return;
        }
        self.finish_typing();

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{} is typing...", bot_name));
        pb.enable_steady_tick(self.update_interval);
        self.current_spinner = Some(pb);
    }

    /// Remove the spinner
    pub fn finish_typing(&mut self) {
        if let Some(pb) = self.current_spinner.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a bot reply; `stage` is shown when given (verbose mode)
    pub fn show_reply(&mut self, bot_name: &str, text: &str, stage: Option<&Stage>) {
        self.finish_typing();
        match stage {
            Some(stage) => println!(
                "{} {} {}",
                format!("{}:", bot_name).bold().green(),
                text,
                format!("[{}]", stage).dimmed()
            ),
            None => println!("{} {}", format!("{}:", bot_name).bold().green(), text),
        }
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "=".repeat(60).cyan());
    }

    /// Show a label/value row
    pub fn show_field(&self, label: &str, value: &str) {
        println!("  {:<18} {}", format!("{}:", label), value.green());
    }

    /// Show numbered item
    pub fn show_numbered(&self, index: usize, text: &str) {
        println!("  {}. {}", index.to_string().cyan(), text);
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn typing_indicator(&self) -> bool {
        self.typing_indicator
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new(true)
    }
}
