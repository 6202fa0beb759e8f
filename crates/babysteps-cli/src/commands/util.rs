//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use crate::session::Clock;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day)s?\s+ago$").unwrap());

/// One month of minutes; nobody back-fills a log further than that.
const MAX_RELATIVE_MINUTES: i64 = 31 * 24 * 60;

/// Parse a `--at` value.
///
/// Supports:
/// - RFC 3339: "2025-03-12T14:30:00+05:00"
/// - Local wall time: "2025-03-12T14:30"
/// - Relative: "40 minutes ago", "2 hours ago", "1 day ago"
pub fn parse_datetime(s: &str, clock: &Clock) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s == "now" {
        return Ok(clock.now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return clock
            .offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("ambiguous local time: {s}"));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use RFC 3339 (e.g., 2025-03-12T14:30:00+05:00), local time (e.g., 2025-03-12T14:30) or relative (e.g., '40 minutes ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let minutes_per_unit = match &caps[2] {
        "minute" => 1,
        "hour" => 60,
        "day" => 60 * 24,
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > MAX_RELATIVE_MINUTES / minutes_per_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(clock.now - Duration::minutes(n * minutes_per_unit))
}
