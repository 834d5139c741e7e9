//! Command matcher
//!
//! Maps an utterance to at most one typed [`Command`]. Rules are tried in
//! declaration order and the first pattern that matches wins; later rules
//! are never consulted, even if they would also match.

use regex::{Captures, Regex};
use std::fmt;

use crate::engine::normalizer::Utterance;
use crate::errors::Result;

/// Canned small-talk topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallTalkTopic {
    HowAreYou,
    DoYouLikeMe,
    WhatAreYouDoing,
}

/// A recognized command with its typed parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Greeting,
    SmallTalk(SmallTalkTopic),
    Time,
    Date,
    SetName { name: String },
    Remember { key: String, value: String },
    Recall { key: String },
    Learn { trigger: String, reply: String },
    Joke,
    FlipCoin,
    RollDice { sides: u32 },
    Weather { location: String },
    Define { word: String },
    NameQuery,
    SessionDuration,
    Calculate { expression: String },
}

impl Command {
    pub fn is_exit(&self) -> bool {
        matches!(self, Command::Exit)
    }
}

/// Result of running the rule list against one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No rule matched; the pipeline moves on
    NoMatch,
    /// A rule matched and its captures were well-formed
    Matched { rule: &'static str, command: Command },
    /// A rule matched but its captures could not be used
    Malformed { rule: &'static str, reason: String },
}

type Builder = fn(&Captures<'_>) -> std::result::Result<Command, String>;

/// A pattern bound to a command builder
pub struct CommandRule {
    name: &'static str,
    pattern: Regex,
    build: Builder,
}

impl CommandRule {
    /// Compile a rule. The pattern is anchored, case-insensitive, and
    /// tolerates trailing `?`, `!` and `.`.
    pub fn new(name: &'static str, pattern: &str, build: Builder) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?i)^(?:{})\s*[?!.]*$", pattern))?;
        Ok(Self {
            name,
            pattern,
            build,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for CommandRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Ordered rule list
#[derive(Debug)]
pub struct CommandMatcher {
    rules: Vec<CommandRule>,
}

const ARITHMETIC: &str = r"[-+*/xX×÷^().\s]*\d[-+*/xX×÷^().\d\s]*";

impl CommandMatcher {
    /// Matcher with the built-in command vocabulary
    pub fn new() -> Result<Self> {
        let rules = vec![
            CommandRule::new(
                "exit",
                r"bye|good\s?bye|exit|quit|farewell|cya|see you(?: later)?",
                |_| Ok(Command::Exit),
            )?,
            CommandRule::new(
                "greeting",
                r"(?:hello|hi|hey|hiya|howdy|greetings|good (?:morning|afternoon|evening))(?: there)?",
                |_| Ok(Command::Greeting),
            )?,
            CommandRule::new(
                "how_are_you",
                r"how are you(?: doing)?(?: today)?|how's it going|how are things",
                |_| Ok(Command::SmallTalk(SmallTalkTopic::HowAreYou)),
            )?,
            CommandRule::new("do_you_like_me", r"do you (?:like|love) me", |_| {
                Ok(Command::SmallTalk(SmallTalkTopic::DoYouLikeMe))
            })?,
            CommandRule::new("what_are_you_doing", r"what are you (?:doing|up to)", |_| {
                Ok(Command::SmallTalk(SmallTalkTopic::WhatAreYouDoing))
            })?,
            CommandRule::new(
                "time",
                r"what(?:'s| is) the (?:current )?time|what time is it(?: now)?|(?:the |current )?time(?: now)?|tell me the time",
                |_| Ok(Command::Time),
            )?,
            CommandRule::new(
                "date",
                r"what(?:'s| is) (?:the |today's )?date(?: today)?|what day is (?:it|today)|today's date|date",
                |_| Ok(Command::Date),
            )?,
            CommandRule::new("set_name", r"(?:my name is|call me)\s+(.+?)", |caps| {
                Ok(Command::SetName {
                    name: capture(caps, 1),
                })
            })?,
            CommandRule::new(
                "remember",
                r"remember(?: that)? my (.+?) (?:is|are) (.+?)",
                |caps| {
                    Ok(Command::Remember {
                        key: capture(caps, 1),
                        value: capture(caps, 2),
                    })
                },
            )?,
            CommandRule::new("recall", r"what(?:'s| is| are) my (.+?)", |caps| {
                Ok(Command::Recall {
                    key: capture(caps, 1),
                })
            })?,
            CommandRule::new("learn", r"learn(?: that)?\s+(.+)", |caps| {
                parse_learn(&capture(caps, 1))
            })?,
            CommandRule::new(
                "joke",
                r"(?:tell me )?(?:a |another )?joke|make me laugh|say something funny",
                |_| Ok(Command::Joke),
            )?,
            CommandRule::new("flip_coin", r"(?:flip|toss) a coin|coin (?:flip|toss)", |_| {
                Ok(Command::FlipCoin)
            })?,
            CommandRule::new(
                "roll_dice",
                r"roll(?: (?:a|an|the))? (?:(\S+?)[- ]sided )?(?:dice|die)",
                |caps| parse_dice(caps.get(1).map(|m| m.as_str())),
            )?,
            CommandRule::new(
                "weather",
                r"(?:what(?:'s| is) the )?weather (?:in|for|at) (.+?)|how(?:'s| is) the weather in (.+?)",
                |caps| {
                    Ok(Command::Weather {
                        location: first_capture(caps, &[1, 2]),
                    })
                },
            )?,
            CommandRule::new("define", r"define\s+(.+?)|what does (.+?) mean", |caps| {
                Ok(Command::Define {
                    word: first_capture(caps, &[1, 2]),
                })
            })?,
            CommandRule::new(
                "name_query",
                r"what(?:'s| is) your name|who are you|what should i call you",
                |_| Ok(Command::NameQuery),
            )?,
            CommandRule::new(
                "session_duration",
                r"how long have we been (?:talking|chatting)|session (?:duration|length|time)|how long is this session",
                |_| Ok(Command::SessionDuration),
            )?,
            CommandRule::new(
                "calculate",
                &format!(
                    r"(?:calculate|calc|compute|evaluate)\s+(.+)|(?:what(?:'s| is)|solve)\s+({})",
                    ARITHMETIC
                ),
                |caps| {
                    Ok(Command::Calculate {
                        expression: first_capture(caps, &[1, 2]),
                    })
                },
            )?,
        ];
        Ok(Self { rules })
    }

    /// Matcher over a custom rule list
    pub fn with_rules(rules: Vec<CommandRule>) -> Self {
        Self { rules }
    }

    /// Try each rule in order; the first match decides the outcome
    pub fn match_command(&self, utterance: &Utterance) -> MatchOutcome {
        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(&utterance.text) {
                return match (rule.build)(&caps) {
                    Ok(command) => MatchOutcome::Matched {
                        rule: rule.name,
                        command,
                    },
                    Err(reason) => MatchOutcome::Malformed {
                        rule: rule.name,
                        reason,
                    },
                };
            }
        }
        MatchOutcome::NoMatch
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}

fn capture(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn first_capture(caps: &Captures<'_>, indices: &[usize]) -> String {
    indices
        .iter()
        .find_map(|&i| caps.get(i))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Split "A -> B" or "A::B" into a learn command
fn parse_learn(body: &str) -> std::result::Result<Command, String> {
    let usage = "Use 'learn that <phrase> -> <reply>' (or 'learn <phrase>::<reply>').";
    let (trigger, reply) = body
        .split_once("->")
        .or_else(|| body.split_once("::"))
        .ok_or_else(|| format!("I couldn't tell the phrase from the reply. {}", usage))?;

    let (trigger, reply) = (trigger.trim(), reply.trim());
    if trigger.is_empty() || reply.is_empty() {
        return Err(format!("Both the phrase and the reply need some text. {}", usage));
    }
    Ok(Command::Learn {
        trigger: trigger.to_string(),
        reply: reply.to_string(),
    })
}

/// Default six sides; otherwise a whole number of at least two
fn parse_dice(sides: Option<&str>) -> std::result::Result<Command, String> {
    let Some(raw) = sides else {
        return Ok(Command::RollDice { sides: 6 });
    };
    match raw.parse::<u32>() {
        Ok(n) if n >= 2 => Ok(Command::RollDice { sides: n }),
        Ok(_) => Err("A dice needs at least 2 sides.".to_string()),
        Err(_) => Err(format!(
            "'{}' isn't a number of sides I understand. Try something like 'roll a 20-sided dice'.",
            raw
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(input: &str) -> Command {
        let matcher = CommandMatcher::new().unwrap();
        match matcher.match_command(&Utterance::new(input)) {
            MatchOutcome::Matched { command, .. } => command,
            other => panic!("expected a command for {:?}, got {:?}", input, other),
        }
    }

    fn outcome(input: &str) -> MatchOutcome {
        CommandMatcher::new()
            .unwrap()
            .match_command(&Utterance::new(input))
    }

    #[test]
    fn test_exit_synonyms() {
        for input in ["bye", "Goodbye!", "quit", "exit", "see you later"] {
            assert_eq!(matched(input), Command::Exit, "{}", input);
        }
    }

    #[test]
    fn test_greetings() {
        assert_eq!(matched("hello"), Command::Greeting);
        assert_eq!(matched("Hi there!"), Command::Greeting);
        assert_eq!(matched("good morning"), Command::Greeting);
    }

    #[test]
    fn test_time_and_date() {
        assert_eq!(matched("what time is it"), Command::Time);
        assert_eq!(matched("What's the time?"), Command::Time);
        assert_eq!(matched("what is the date today"), Command::Date);
        assert_eq!(matched("what day is it?"), Command::Date);
    }

    #[test]
    fn test_remember_keeps_case() {
        assert_eq!(
            matched("Remember that my favorite city is Paris."),
            Command::Remember {
                key: "favorite city".to_string(),
                value: "Paris".to_string()
            }
        );
    }

    #[test]
    fn test_recall() {
        assert_eq!(
            matched("what is my favorite city?"),
            Command::Recall {
                key: "favorite city".to_string()
            }
        );
    }

    #[test]
    fn test_set_name() {
        assert_eq!(
            matched("my name is Ada"),
            Command::SetName {
                name: "Ada".to_string()
            }
        );
        assert_eq!(
            matched("call me Captain"),
            Command::SetName {
                name: "Captain".to_string()
            }
        );
    }

    #[test]
    fn test_learn_arrow_and_colons() {
        let expected = Command::Learn {
            trigger: "xyzzy".to_string(),
            reply: "plugh".to_string(),
        };
        assert_eq!(matched("learn that xyzzy -> plugh"), expected);
        assert_eq!(matched("learn xyzzy::plugh"), expected);
    }

    #[test]
    fn test_learn_keeps_reply_punctuation() {
        assert_eq!(
            matched("learn that hi -> hello there!"),
            Command::Learn {
                trigger: "hi".to_string(),
                reply: "hello there!".to_string()
            }
        );
    }

    #[test]
    fn test_learn_malformed() {
        assert!(matches!(
            outcome("learn that nothing useful"),
            MatchOutcome::Malformed { rule: "learn", .. }
        ));
        assert!(matches!(
            outcome("learn that -> reply"),
            MatchOutcome::Malformed { rule: "learn", .. }
        ));
    }

    #[test]
    fn test_dice() {
        assert_eq!(matched("roll a 20-sided dice"), Command::RollDice { sides: 20 });
        assert_eq!(matched("roll an 8 sided die"), Command::RollDice { sides: 8 });
        assert_eq!(matched("roll a dice"), Command::RollDice { sides: 6 });
    }

    #[test]
    fn test_dice_non_numeric_is_malformed() {
        match outcome("roll a twenty-sided dice") {
            MatchOutcome::Malformed { rule, reason } => {
                assert_eq!(rule, "roll_dice");
                assert!(reason.contains("twenty"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            outcome("roll a 1-sided dice"),
            MatchOutcome::Malformed { .. }
        ));
    }

    #[test]
    fn test_weather_and_define() {
        assert_eq!(
            matched("what's the weather in New York?"),
            Command::Weather {
                location: "New York".to_string()
            }
        );
        assert_eq!(
            matched("how is the weather in Oslo"),
            Command::Weather {
                location: "Oslo".to_string()
            }
        );
        assert_eq!(
            matched("define serendipity"),
            Command::Define {
                word: "serendipity".to_string()
            }
        );
        assert_eq!(
            matched("what does ephemeral mean?"),
            Command::Define {
                word: "ephemeral".to_string()
            }
        );
    }

    #[test]
    fn test_calculate() {
        assert_eq!(
            matched("what is 2 x 3 + 4?"),
            Command::Calculate {
                expression: "2 x 3 + 4".to_string()
            }
        );
        assert_eq!(
            matched("calculate (1 + 2) ^ 3"),
            Command::Calculate {
                expression: "(1 + 2) ^ 3".to_string()
            }
        );
    }

    #[test]
    fn test_questions_without_numbers_do_not_calculate() {
        assert_eq!(outcome("What is the capital of France?"), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_misc_commands() {
        assert_eq!(matched("tell me a joke"), Command::Joke);
        assert_eq!(matched("flip a coin"), Command::FlipCoin);
        assert_eq!(matched("what is your name?"), Command::NameQuery);
        assert_eq!(matched("how long have we been chatting?"), Command::SessionDuration);
        assert_eq!(
            matched("how are you"),
            Command::SmallTalk(SmallTalkTopic::HowAreYou)
        );
    }

    #[test]
    fn test_unmatched_input() {
        assert_eq!(outcome("I like turtles"), MatchOutcome::NoMatch);
        assert_eq!(outcome("say hello to xyzzy"), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = vec![
            CommandRule::new("first", r"ping", |_| Ok(Command::Joke)).unwrap(),
            CommandRule::new("second", r"ping", |_| Ok(Command::FlipCoin)).unwrap(),
        ];
        let matcher = CommandMatcher::with_rules(rules);
        assert_eq!(
            matcher.match_command(&Utterance::new("ping")),
            MatchOutcome::Matched {
                rule: "first",
                command: Command::Joke
            }
        );
    }

    #[test]
    fn test_rule_order_is_declaration_order() {
        let matcher = CommandMatcher::new().unwrap();
        let names = matcher.rule_names();
        assert_eq!(names.first(), Some(&"exit"));
        assert_eq!(names.last(), Some(&"calculate"));
    }
}
