//! ChatBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use chatbuddy::{
    cli::{Args, Commands},
    config::Config,
    engine::ChatBot,
    logging,
    memory::LoadStatus,
    repl::{DisplayManager, InputHandler, ReplSession},
};
use clap::Parser;
use colored::Colorize;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbosity());

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config)
        .context("Invalid command-line option")?;

    match args.command() {
        Commands::Chat => run_chat(&args, &config),
        Commands::Ask { .. } => {
            let utterance = args.command().utterance().unwrap_or_default();
            ask(&args, &config, &utterance)
        }
        Commands::Knowledge => list_knowledge(&args, &config),
        Commands::Config => show_config(&args, &config),
    }
}

fn build_bot(args: &Args, config: &Config) -> Result<ChatBot> {
    let bot = ChatBot::from_config(config).context("Failed to build chatbot")?;
    Ok(match args.seed {
        Some(seed) => bot.with_seed(seed),
        None => bot,
    })
}

fn warn_on_load(status: &Option<LoadStatus>) {
    if let Some(LoadStatus::Corrupt { reason, backup }) = status {
        eprintln!(
            "{}: knowledge file could not be read ({}); using built-in answers.",
            "Warning".yellow(),
            reason
        );
        match backup {
            Some(path) => eprintln!("  The unreadable file was moved to {}", path.display()),
            None => eprintln!("  It was left in place and will not be overwritten."),
        }
    }
}

/// Interactive REPL mode
fn run_chat(args: &Args, config: &Config) -> Result<()> {
    let verbosity = args.verbosity();
    let bot = build_bot(args, config)?;
    let input = InputHandler::with_history(config.history_path(), config.repl.prompt.clone())?;
    let display = DisplayManager::new(config.bot.typing_indicator && verbosity.show_progress());

    let mut repl = ReplSession::new(bot, input, display, verbosity.show_stages());
    repl.start(env!("CARGO_PKG_VERSION"))?;
    repl.run()
}

/// Answer one utterance and exit
fn ask(args: &Args, config: &Config, utterance: &str) -> Result<()> {
    let mut bot = build_bot(args, config)?;
    warn_on_load(&bot.start()?);

    let reply = bot.respond(utterance)?;
    if args.verbosity().show_stages() {
        eprintln!("{}", format!("[{}]", reply.stage).dimmed());
    }
    println!("{}", reply.text);
    Ok(())
}

fn list_knowledge(args: &Args, config: &Config) -> Result<()> {
    let mut bot = build_bot(args, config)?;
    let status = bot.start()?;
    warn_on_load(&status);

    let knowledge = &bot.session().knowledge;
    let source = if status.map_or(true, |s| s.used_defaults()) {
        "built-in defaults"
    } else {
        "from file"
    };

    println!("\n{}", "Knowledge Base".bold().cyan());
    println!("{}", "=".repeat(60).cyan());
    println!("  File:      {}", config.knowledge_path().display());
    println!("  Source:    {}", source);
    println!(
        "  Scorer:    {} (threshold {})",
        knowledge.method(),
        knowledge.threshold()
    );
    println!();

    for (i, entry) in knowledge.entries().iter().enumerate() {
        println!("  {}. {}", (i + 1).to_string().cyan(), entry.question);
        println!("     {}", entry.answer.dimmed());
    }
    println!();
    Ok(())
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    match &args.config {
        Some(path) => println!("# {}", path.display()),
        None => println!("# effective configuration"),
    }
    println!("{}", config.to_toml()?);
    Ok(())
}
