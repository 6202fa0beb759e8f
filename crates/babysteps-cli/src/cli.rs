//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::commands::babies::{BabiesAction, ChildArgs};
use crate::commands::log::LogCommand;

/// Baby-care tracker.
///
/// Records feedings, sleeps, diaper changes and growth for your children,
/// summarizes the day and answers parenting questions.
#[derive(Debug, Parser)]
#[command(name = "babysteps", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register your first child.
    Init(ChildArgs),

    /// Manage children.
    #[command(subcommand)]
    Babies(BabiesAction),

    /// Record an event for the active child.
    #[command(subcommand)]
    Log(LogCommand),

    /// Sleep stopwatch (p = pause, r = resume, s = stop and save).
    Timer,

    /// Today's status, advisory and the weekly sleep chart.
    Summary {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Logs of one day (default: today).
    History {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Ask the parenting assistant.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Lullaby player.
    Lullabies,

    /// Video catalog.
    Videos {
        /// Show the embed link for one video.
        #[arg(long)]
        select: Option<u32>,
    },

    /// Toggle the light/dark theme.
    Theme,
}
