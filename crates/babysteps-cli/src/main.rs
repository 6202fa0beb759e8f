use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use babysteps_cli::commands::{
    ask, babies, history, init, log, lullabies, summary, theme, timer, videos,
};
use babysteps_cli::session::{Clock, Session};
use babysteps_cli::{Cli, Commands, Config};

/// Opens the signed-in session, runs `f` and saves the local snapshot.
fn with_session(config: &Config, f: impl FnOnce(&mut Session) -> Result<()>) -> Result<()> {
    let mut session = Session::open(config)?;
    f(&mut session)?;
    session.close()
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let clock = Clock::system();
    let mut out = io::stdout().lock();

    match command {
        Commands::Init(args) => with_session(&config, |s| init::run(&mut out, s, args, &clock))?,
        Commands::Babies(action) => {
            with_session(&config, |s| babies::run(&mut out, s, action, &clock))?;
        }
        Commands::Log(entry) => with_session(&config, |s| log::run(&mut out, s, entry, &clock))?,
        Commands::Timer => with_session(&config, |s| {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            runtime()?.block_on(timer::run(&mut out, s, input, chrono::Utc::now))
        })?,
        Commands::Summary { json } => {
            with_session(&config, |s| summary::run(&mut out, s, *json, &clock))?;
        }
        Commands::History { date } => {
            with_session(&config, |s| history::run(&mut out, s, *date, &clock))?;
        }
        Commands::Ask { question } => with_session(&config, |s| {
            let question = question.join(" ");
            runtime()?.block_on(ask::run(&mut out, s, &question, &config, &clock))
        })?,
        Commands::Lullabies => lullabies::run(&mut out, io::stdin().lock(), &config.media_dir)?,
        Commands::Videos { select } => videos::run(&mut out, *select)?,
        Commands::Theme => with_session(&config, |s| theme::run(&mut out, s))?,
    }

    out.flush()?;
    Ok(())
}
