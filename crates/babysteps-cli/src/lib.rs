//! Baby-care tracker CLI library.
//!
//! This crate provides the CLI interface for the tracker.

mod cli;
pub mod commands;
mod config;
pub mod session;

pub use cli::{Cli, Commands};
pub use config::Config;
