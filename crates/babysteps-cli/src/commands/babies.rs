//! Child management: list, add, switch and delete.

use std::io::Write;

use anyhow::{Context, Result};
use babysteps_core::home::describe_age;
use babysteps_core::{BabyId, Gender};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::session::{Clock, Session, localized};

#[derive(Debug, Args)]
pub struct ChildArgs {
    /// Child's name.
    #[arg(long)]
    pub name: String,
    /// Date of birth (YYYY-MM-DD).
    #[arg(long)]
    pub dob: NaiveDate,
    /// boy, girl or other.
    #[arg(long, default_value = "boy")]
    pub gender: Gender,
}

#[derive(Debug, Subcommand)]
pub enum BabiesAction {
    /// List children; the active one is starred.
    List,
    /// Add a child and make it active.
    Add(ChildArgs),
    /// Make another child active.
    Switch { id: String },
    /// Delete a child and all of its logs.
    Delete { id: String },
}

pub fn run<W: Write>(
    writer: &mut W,
    session: &mut Session,
    action: &BabiesAction,
    clock: &Clock,
) -> Result<()> {
    match action {
        BabiesAction::List => list(writer, session, clock),
        BabiesAction::Add(args) => add(writer, session, args, clock),
        BabiesAction::Switch { id } => {
            let id = BabyId::new(id.as_str()).context("invalid child id")?;
            session
                .app
                .switch_baby(&id)
                .and_then(|()| session.app.sync())
                .map_err(|e| localized(&e, session.locale()))?;
            list(writer, session, clock)
        }
        BabiesAction::Delete { id } => {
            let id = BabyId::new(id.as_str()).context("invalid child id")?;
            session
                .app
                .delete_baby(&id)
                .map_err(|e| localized(&e, session.locale()))?;
            writeln!(writer, "Deleted {id}")?;
            list(writer, session, clock)
        }
    }
}

pub fn add<W: Write>(
    writer: &mut W,
    session: &mut Session,
    args: &ChildArgs,
    clock: &Clock,
) -> Result<()> {
    let baby = session
        .app
        .add_baby(&args.name, args.dob, args.gender)
        .map_err(|e| localized(&e, session.locale()))?;
    writeln!(
        writer,
        "Added {} ({}), now active. id: {}",
        baby.name,
        describe_age(baby.dob, clock.today(), session.locale()),
        baby.id
    )?;
    Ok(())
}

fn list<W: Write>(writer: &mut W, session: &Session, clock: &Clock) -> Result<()> {
    let state = session.app.state();
    if state.babies().is_empty() {
        writeln!(writer, "No children yet. Run `babysteps init`.")?;
        return Ok(());
    }
    for baby in state.babies() {
        let marker = if state.active_baby_id() == Some(&baby.id) {
            '*'
        } else {
            ' '
        };
        writeln!(
            writer,
            "{marker} {:<12} {:<6} {:<20} {}",
            baby.name,
            baby.gender,
            describe_age(baby.dob, clock.today(), session.locale()),
            baby.id
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{clock, config};

    fn child(name: &str, gender: Gender) -> ChildArgs {
        ChildArgs {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            gender,
        }
    }

    #[test]
    fn switch_marks_new_active_child() {
        let temp = tempfile::tempdir().unwrap();
        let mut session = Session::open(&config(temp.path())).unwrap();
        let clock = clock();
        add(&mut Vec::new(), &mut session, &child("Aziza", Gender::Girl), &clock).unwrap();
        let first = session.app.state().active_baby_id().unwrap().clone();
        add(&mut Vec::new(), &mut session, &child("Timur", Gender::Boy), &clock).unwrap();

        let mut output = Vec::new();
        let action = BabiesAction::Switch {
            id: first.to_string(),
        };
        run(&mut output, &mut session, &action, &clock).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("* Aziza"));
        assert!(lines[0].contains("2 years, 1 months"));
        assert!(lines[1].starts_with("  Timur"));
    }

    #[test]
    fn delete_last_child_is_refused() {
        let temp = tempfile::tempdir().unwrap();
        let mut session = Session::open(&config(temp.path())).unwrap();
        let clock = clock();
        add(&mut Vec::new(), &mut session, &child("Aziza", Gender::Girl), &clock).unwrap();
        let only = session.app.state().active_baby_id().unwrap().clone();

        let action = BabiesAction::Delete {
            id: only.to_string(),
        };
        let err = run(&mut Vec::new(), &mut session, &action, &clock).unwrap_err();
        assert_eq!(err.to_string(), "At least one child is required!");
    }

    #[test]
    fn switch_to_unknown_child_fails() {
        let temp = tempfile::tempdir().unwrap();
        let mut session = Session::open(&config(temp.path())).unwrap();
        let action = BabiesAction::Switch {
            id: "ghost".to_string(),
        };
        let err = run(&mut Vec::new(), &mut session, &action, &clock()).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
