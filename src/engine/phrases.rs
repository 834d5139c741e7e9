//! Canned reply sets used by the handlers and the fallback responder

pub const GREETINGS: &[&str] = &[
    "Hi there!",
    "Hello!",
    "Hey!",
    "Hello, nice to see you!",
];

pub const FAREWELLS: &[&str] = &["Goodbye!", "See you later!", "Take care!"];

pub const HOW_ARE_YOU: &[&str] = &[
    "I'm good, thanks!",
    "Doing great!",
    "I'm just a bot, but I'm fine!",
];

pub const DO_YOU_LIKE_ME: &[&str] = &[
    "Of course I do!",
    "You're one of my favourite people to chat with.",
    "Absolutely!",
];

pub const WHAT_ARE_YOU_DOING: &[&str] = &[
    "Talking to you, I guess!",
    "Just thinking about things.",
    "Waiting for your next question.",
];

pub const FALLBACK_REPLIES: &[&str] = &[
    "Sorry, I don't understand.",
    "Can you rephrase that?",
    "I'm not sure about that.",
    "Interesting, tell me more.",
    "Hmm, I see.",
];

pub const FOLLOW_UPS: &[&str] = &[
    "What else is on your mind?",
    "How has your day been?",
    "Want to hear a joke?",
    "Is there something you'd like me to remember?",
];

pub const UNKNOWN_QUESTION: &[&str] = &[
    "I don't know the answer to that yet. Teach me with 'learn that <question> -> <answer>'.",
    "Good question! I don't have an answer for it yet.",
];

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "I told my computer I needed a break, and it said: 'No problem, I'll go to sleep.'",
    "Why did the scarecrow win an award? He was outstanding in his field.",
    "There are 10 kinds of people: those who understand binary and those who don't.",
    "Why don't skeletons fight each other? They don't have the guts.",
];

pub const WEATHER_CONDITIONS: &[&str] = &[
    "sunny",
    "cloudy",
    "rainy",
    "windy",
    "snowy",
    "foggy",
    "partly cloudy",
];

/// Built-in mini dictionary, word -> definition.
pub const DICTIONARY: &[(&str, &str)] = &[
    ("algorithm", "a step-by-step procedure for solving a problem"),
    ("bot", "a program that performs automated tasks, such as chatting"),
    ("compiler", "a program that translates source code into machine code"),
    ("python", "a large snake, or a popular programming language"),
    ("rust", "a reddish oxide on iron, or a systems programming language"),
    ("serendipity", "finding something good without looking for it"),
    ("ephemeral", "lasting for a very short time"),
    ("ubiquitous", "present, appearing, or found everywhere"),
];

/// Default knowledge entries used when no knowledge file can be loaded.
pub const DEFAULT_KNOWLEDGE: &[(&str, &str)] = &[
    ("What is the capital of France?", "The capital of France is Paris."),
    ("What is the largest planet in our solar system?", "Jupiter is the largest planet in our solar system."),
    ("Who wrote Romeo and Juliet?", "William Shakespeare wrote Romeo and Juliet."),
    ("What is the boiling point of water?", "Water boils at 100 degrees Celsius at sea level."),
    ("How many continents are there?", "There are seven continents."),
    ("What is the speed of light?", "Light travels at about 299,792 kilometres per second."),
    ("Who painted the Mona Lisa?", "Leonardo da Vinci painted the Mona Lisa."),
    ("What is the chemical symbol for gold?", "The chemical symbol for gold is Au."),
];

/// Convert a static phrase table into owned strings.
pub fn to_owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

/// Look up a word in the built-in dictionary (case-insensitive).
pub fn define(word: &str) -> Option<&'static str> {
    let word = word.to_lowercase();
    DICTIONARY
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, definition)| *definition)
}
