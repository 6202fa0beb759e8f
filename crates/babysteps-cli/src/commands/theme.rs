//! Light/dark preference, kept in the local snapshot.

use std::io::Write;

use anyhow::Result;

use crate::session::Session;

pub fn run<W: Write>(writer: &mut W, session: &mut Session) -> Result<()> {
    let theme = session.app.toggle_theme();
    writeln!(writer, "Theme: {theme}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::session::testing::config;

    #[test]
    fn theme_toggle_survives_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());

        let mut session = Session::open(&config).unwrap();
        let mut output = Vec::new();
        run(&mut output, &mut session).unwrap();
        session.close().unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Theme: dark\n");

        let mut session = Session::open(&config).unwrap();
        let mut output = Vec::new();
        run(&mut output, &mut session).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Theme: light\n");
    }
}
