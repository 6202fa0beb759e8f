//! Interactive sleep stopwatch.
//!
//! Reads single-letter commands from `input`: `p` pauses, `r` resumes, `s`
//! (or end of input) stops and saves the session as a sleep log.

use std::io::Write;

use anyhow::Result;
use babysteps_core::{TimerDriver, TimerState};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::session::{Session, localized};

pub async fn run<W, R, F>(writer: &mut W, session: &mut Session, input: R, now: F) -> Result<()>
where
    W: Write,
    R: AsyncBufRead + Unpin,
    F: Fn() -> DateTime<Utc>,
{
    let locale = session.locale();
    let mut driver = TimerDriver::new();
    let mut ticks = driver.subscribe();
    let mut lines = input.lines();

    driver.start();
    writeln!(writer, "{}", locale.timer_help())?;

    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                write!(writer, "\r{}", driver.display())?;
                writer.flush()?;
            }
            line = lines.next_line() => {
                match line?.as_deref().map(str::trim) {
                    Some("p") if driver.state() == TimerState::Running => {
                        driver.pause();
                        writeln!(writer, "\n{}", locale.timer_paused(&driver.display()))?;
                    }
                    Some("r") if driver.state() == TimerState::Paused => {
                        driver.start();
                        writeln!(writer, "\n{}", locale.timer_resumed())?;
                    }
                    Some("s") | None => break,
                    Some(_) => {}
                }
            }
        }
    }

    let active = session.app.state().active_baby_id().cloned();
    match driver.stop(active.as_ref(), now(), locale) {
        Some(log) => {
            let note = log.details.notes().unwrap_or_default().to_string();
            session
                .app
                .record_log(log)
                .map_err(|e| localized(&e, locale))?;
            writeln!(writer, "\n{}", locale.sleep_saved(&note))?;
        }
        None => writeln!(writer, "\n{}", locale.no_active_baby())?,
    }
    Ok(())
}
