//! Onboarding: register the first child.

use std::io::Write;

use anyhow::{Result, bail};

use crate::commands::babies::{self, ChildArgs};
use crate::session::{Clock, Session};

pub fn run<W: Write>(
    writer: &mut W,
    session: &mut Session,
    args: &ChildArgs,
    clock: &Clock,
) -> Result<()> {
    if !session.app.state().babies().is_empty() {
        bail!("already set up; use `babysteps babies add` for another child");
    }
    babies::add(writer, session, args, clock)
}
