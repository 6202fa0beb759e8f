//! Home view: status, advisory, latest activity and the weekly sleep chart.

use std::io::Write;

use anyhow::{Result, bail};
use babysteps_core::LogType;
use babysteps_core::home::{describe_age, display_time, last_log, time_ago};

use crate::session::{Clock, Session};

pub fn run<W: Write>(writer: &mut W, session: &Session, json: bool, clock: &Clock) -> Result<()> {
    let locale = session.locale();
    let state = session.app.state();
    let (Some(baby), Some(summary)) = (state.active_baby(), session.app.summary(&clock.local_now()))
    else {
        bail!(locale.no_active_baby());
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "{}, {}",
        baby.name,
        describe_age(baby.dob, clock.today(), locale)
    )?;
    writeln!(writer, "Status: {}", summary.status)?;
    writeln!(writer, "Sleep today: {:.1} h", summary.sleep_hours)?;
    writeln!(writer, "Feedings today: {}", summary.feed_count)?;
    for (label, log_type) in [("Last feeding", LogType::Feeding), ("Last sleep", LogType::Sleep)] {
        if let Some(log) = last_log(state.logs(), &baby.id, log_type) {
            let when = display_time(log, clock.now);
            writeln!(writer, "{label}: {}", time_ago(when, clock.now, locale))?;
        }
    }
    writeln!(writer, "{}", summary.advisory)?;

    writeln!(writer)?;
    writeln!(writer, "Sleep, last 7 days:")?;
    for day in &summary.weekly {
        let line = format!(
            "{:<4} {} {:>4.1} {}",
            day.label,
            day.date.format("%m-%d"),
            day.hours,
            bar(day.hours)
        );
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to 0..=24 before the cast"
)]
fn bar(hours: f64) -> String {
    "#".repeat(hours.clamp(0.0, 24.0).round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::session::testing::{clock, config, seeded_session};

    use insta::assert_snapshot;

    #[test]
    fn summary_renders_home_view() {
        let temp = tempfile::tempdir().unwrap();
        let session = seeded_session(temp.path());

        let mut output = Vec::new();
        run(&mut output, &session, false, &clock()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output);
    }

    #[test]
    fn summary_json_carries_status_and_week() {
        let temp = tempfile::tempdir().unwrap();
        let session = seeded_session(temp.path());

        let mut output = Vec::new();
        run(&mut output, &session, true, &clock()).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["status"], "good");
        assert_eq!(json["feed_count"], 2);
        assert_eq!(json["sleep_hours"], 10.5);
        assert_eq!(json["weekly"].as_array().unwrap().len(), 7);
        assert_eq!(json["weekly"][6]["label"], "Wed");
    }

    #[test]
    fn summary_without_child_fails() {
        let temp = tempfile::tempdir().unwrap();
        let session = Session::open(&config(temp.path())).unwrap();
        let err = run(&mut Vec::new(), &session, false, &clock()).unwrap_err();
        assert_eq!(err.to_string(), "Error: no child selected!");
    }
}
