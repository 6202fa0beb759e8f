//! Calendar view: the trailing week and one day's logs.

use std::io::Write;

use anyhow::{Result, bail};
use babysteps_core::history::{day_logs, describe_details, history_days};
use chrono::{Datelike, NaiveDate};

use crate::session::{Clock, Session};

pub fn run<W: Write>(
    writer: &mut W,
    session: &Session,
    date: Option<NaiveDate>,
    clock: &Clock,
) -> Result<()> {
    let locale = session.locale();
    let state = session.app.state();
    let Some(baby_id) = state.active_baby_id() else {
        bail!(locale.no_active_baby());
    };
    let selected = date.unwrap_or_else(|| clock.today());

    let strip: Vec<String> = history_days(clock.today())
        .into_iter()
        .map(|day| {
            let label = day.format("%m-%d").to_string();
            if day == selected {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect();
    writeln!(writer, "Days: {}", strip.join(" "))?;
    writeln!(
        writer,
        "{} {}:",
        locale.weekday_short(selected.weekday()),
        selected
    )?;

    let logs = day_logs(state.logs(), baby_id, selected, &clock.offset);
    if logs.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }
    for log in logs {
        let mut times = log
            .start_time
            .with_timezone(&clock.offset)
            .format("%H:%M")
            .to_string();
        if let Some(end) = log.end_time.filter(|end| *end != log.start_time) {
            times.push_str(&end.with_timezone(&clock.offset).format("-%H:%M").to_string());
        }
        let line = format!(
            "{times:<11} {:<8} {}",
            log.log_type().as_str(),
            describe_details(log)
        );
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}
