//! Manual logging for the active child.

use std::io::Write;

use anyhow::{Result, bail};
use babysteps_core::{
    ControllerError, DiaperKind, EntryError, Log, LogDetails, ManualEntry, ManualKind,
};
use clap::Subcommand;

use crate::commands::util::parse_datetime;
use crate::session::{Clock, Session, localized};

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Record a feeding (water, porridge, fruit or other).
    Feed {
        #[arg(long, default_value = "")]
        food: String,
        /// When it happened: RFC 3339, local YYYY-MM-DDTHH:MM, or "N minutes ago".
        #[arg(long, default_value = "now")]
        at: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Record a sleep of a given length.
    Sleep {
        #[arg(long, default_value = "")]
        minutes: String,
        #[arg(long, default_value = "now")]
        at: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Record a diaper change.
    Diaper {
        #[arg(long)]
        kind: DiaperKind,
        #[arg(long)]
        note: Option<String>,
    },
    /// Record a weight and/or height measurement.
    Growth {
        /// Weight in kilograms.
        #[arg(long)]
        weight: Option<f64>,
        /// Height in centimetres.
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        note: Option<String>,
    },
}

pub fn run<W: Write>(
    writer: &mut W,
    session: &mut Session,
    command: &LogCommand,
    clock: &Clock,
) -> Result<()> {
    let locale = session.locale();
    let log = match command {
        LogCommand::Feed { food, at, note } => {
            manual(session, ManualKind::Feeding, food, at, note, clock)?
        }
        LogCommand::Sleep { minutes, at, note } => {
            manual(session, ManualKind::Sleep, minutes, at, note, clock)?
        }
        LogCommand::Diaper { kind, note } => {
            let details = LogDetails::Diaper {
                kind: Some(*kind),
                notes: note.clone(),
            };
            instant(session, details, clock)?
        }
        LogCommand::Growth {
            weight,
            height,
            note,
        } => {
            if weight.is_none() && height.is_none() {
                bail!("growth needs --weight or --height");
            }
            let details = LogDetails::Growth {
                weight_kg: *weight,
                height_cm: *height,
                notes: note.clone(),
            };
            instant(session, details, clock)?
        }
    };

    let start = log.start_time.with_timezone(&clock.offset);
    write!(writer, "Saved {} at {}", log.log_type(), start.format("%Y-%m-%d %H:%M"))?;
    if let Some(end) = log.end_time.filter(|end| *end != log.start_time) {
        write!(writer, "-{}", end.with_timezone(&clock.offset).format("%H:%M"))?;
    }
    match log.details.notes() {
        Some(notes) => writeln!(writer, ": {notes}")?,
        None => writeln!(writer)?,
    }
    tracing::debug!(log = %log.id, %locale, "logged from cli");
    Ok(())
}

fn manual(
    session: &mut Session,
    kind: ManualKind,
    value: &str,
    at: &str,
    note: &str,
    clock: &Clock,
) -> Result<Log> {
    let entry = ManualEntry {
        kind,
        picked_at: parse_datetime(at, clock)?,
        value: value.to_string(),
        note: note.to_string(),
    };
    session
        .app
        .add_manual_entry(&entry, clock.now)
        .map_err(|e| localized(&e, session.locale()))
}

fn instant(session: &mut Session, details: LogDetails, clock: &Clock) -> Result<Log> {
    let locale = session.locale();
    let baby_id = session
        .app
        .state()
        .active_baby_id()
        .cloned()
        .ok_or_else(|| localized(&ControllerError::from(EntryError::NoActiveBaby), locale))?;
    let log = Log::new(baby_id, clock.now, None, details)?;
    session
        .app
        .record_log(log.clone())
        .map_err(|e| localized(&e, locale))?;
    Ok(log)
}
