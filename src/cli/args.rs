//! Command-line argument parsing for ChatBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::errors::Result;
use crate::memory::ScoringMethod;

/// ChatBuddy - a small rule-based chatbot for the terminal
#[derive(Parser, Debug)]
#[command(name = "chatbuddy")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Chat with a rule-based bot that can learn new replies", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Knowledge file (overrides config)
    #[arg(long)]
    pub knowledge: Option<PathBuf>,

    /// Knowledge scorer: overlap or tfidf (overrides config)
    #[arg(long)]
    pub scorer: Option<String>,

    /// Bot name (overrides config)
    #[arg(long)]
    pub name: Option<String>,

    /// Seed for reproducible replies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,

    /// Answer a single utterance and exit
    Ask {
        /// What to say to the bot
        #[arg(value_name = "UTTERANCE", required = true, num_args = 1..)]
        utterance: Vec<String>,
    },

    /// List the knowledge base entries
    Knowledge,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run; chat when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(path) = &self.knowledge {
            config.knowledge.path = path.to_string_lossy().into_owned();
        }
        if let Some(scorer) = &self.scorer {
            config.knowledge.scorer = scorer.parse::<ScoringMethod>()?;
        }
        if let Some(name) = &self.name {
            config.bot.name = name.clone();
        }
        config.validate()
    }
}

impl Commands {
    /// Joined utterance for `ask`
    pub fn utterance(&self) -> Option<String> {
        match self {
            Commands::Ask { utterance } => Some(utterance.join(" ")),
            _ => None,
        }
    }
}

impl Verbosity {
    /// Check if should show the typing indicator
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show which stage answered
    pub fn show_stages(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
