//! Command handlers
//!
//! One arm per [`Command`] variant. Handlers never panic on user input:
//! bad arguments come back as [`CommandError::InvalidInput`], storage
//! trouble as [`CommandError::Internal`].

use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::engine::calculator::{self, format_number};
use crate::engine::matcher::{Command, SmallTalkTopic};
use crate::engine::phrases;
use crate::errors::ChatError;
use crate::session::{format_duration, ChatSession, NAME_KEY};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The user can fix this by rephrasing
    #[error("{0}")]
    InvalidInput(String),

    /// Something on our side went wrong
    #[error("{0}")]
    Internal(String),
}

impl CommandError {
    /// Text shown to the user in place of a reply
    pub fn user_message(&self) -> String {
        match self {
            CommandError::InvalidInput(reason) => reason.clone(),
            CommandError::Internal(_) => {
                "Sorry, something went wrong on my side. Please try again.".to_string()
            }
        }
    }
}

/// Execute a command against the session
pub fn execute<R: Rng>(
    command: &Command,
    session: &mut ChatSession,
    rng: &mut R,
) -> Result<String, CommandError> {
    let reply = match command {
        Command::Exit => pick(phrases::FAREWELLS, rng),
        Command::Greeting => pick(phrases::GREETINGS, rng),
        Command::SmallTalk(topic) => small_talk(*topic, rng),
        Command::Time => format!("It's {}.", Local::now().format("%H:%M:%S")),
        Command::Date => format!("Today is {}.", Local::now().format("%A, %B %-d, %Y")),
        Command::SetName { name } => {
            session.preferences.remember(NAME_KEY, name);
            format!("Nice to meet you, {}!", name)
        }
        Command::Remember { key, value } => {
            session.preferences.remember(key, value);
            format!("Got it! I'll remember that your {} is {}.", key.to_lowercase(), value)
        }
        Command::Recall { key } => session.preferences.recall(key),
        Command::Learn { trigger, reply } => learn(session, trigger, reply)?,
        Command::Joke => pick(phrases::JOKES, rng),
        Command::FlipCoin => {
            let side = if rng.gen_bool(0.5) { "Heads" } else { "Tails" };
            format!("{}!", side)
        }
        Command::RollDice { sides } => roll_dice(*sides, rng)?,
        Command::Weather { location } => weather(location, rng),
        Command::Define { word } => match phrases::define(word) {
            Some(definition) => format!("{}: {}.", word.to_lowercase(), definition),
            None => format!("I don't have a definition for '{}' yet.", word),
        },
        Command::NameQuery => format!("I'm {}, your friendly chatbot.", session.bot_name()),
        Command::SessionDuration => format!(
            "We've been chatting for {}.",
            format_duration(session.history.duration_secs())
        ),
        Command::Calculate { expression } => {
            let value = calculator::evaluate(expression).map_err(|e| {
                CommandError::InvalidInput(format!(
                    "I couldn't calculate that: {}. Try something like '2 x 3 + 4'.",
                    e
                ))
            })?;
            format!("{} = {}", expression, format_number(value))
        }
    };
    Ok(reply)
}

fn pick<R: Rng>(options: &[&str], rng: &mut R) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

fn small_talk<R: Rng>(topic: SmallTalkTopic, rng: &mut R) -> String {
    let options = match topic {
        SmallTalkTopic::HowAreYou => phrases::HOW_ARE_YOU,
        SmallTalkTopic::DoYouLikeMe => phrases::DO_YOU_LIKE_ME,
        SmallTalkTopic::WhatAreYouDoing => phrases::WHAT_ARE_YOU_DOING,
    };
    pick(options, rng)
}

fn roll_dice<R: Rng>(sides: u32, rng: &mut R) -> Result<String, CommandError> {
    if sides < 2 {
        return Err(CommandError::InvalidInput(
            "A dice needs at least 2 sides.".to_string(),
        ));
    }
    let result = rng.gen_range(1..=sides);
    Ok(format!("You rolled a {} on a {}-sided dice.", result, sides))
}

/// Simulated forecast; no network access
fn weather<R: Rng>(location: &str, rng: &mut R) -> String {
    let condition = phrases::WEATHER_CONDITIONS
        .choose(rng)
        .copied()
        .unwrap_or("clear");
    let temperature: i32 = rng.gen_range(-5..=35);
    format!(
        "The weather in {} is {} with a temperature of {}°C (simulated).",
        location, condition, temperature
    )
}

fn learn(session: &mut ChatSession, trigger: &str, reply: &str) -> Result<String, CommandError> {
    if trigger.trim().is_empty() || reply.trim().is_empty() {
        return Err(CommandError::InvalidInput(
            "Both the phrase and the reply need some text.".to_string(),
        ));
    }

    let confirmation = format!("Got it! When you say '{}', I'll reply '{}'.", trigger, reply);
    match session.learn(trigger, reply) {
        Ok(_) => Ok(confirmation),
        Err(
            e @ (ChatError::IoError(_)
            | ChatError::SerializationError(_)
            | ChatError::StoreProtected(_)),
        ) => {
            // The in-memory pair is in place; only the file write failed.
            warn!(error = %e, "Failed to persist learned response");
            Ok(format!(
                "{} (I couldn't save it to disk, so I'll only remember it for this session.)",
                confirmation
            ))
        }
        Err(e) => Err(CommandError::Internal(e.to_string())),
    }
}
