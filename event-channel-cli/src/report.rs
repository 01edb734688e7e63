//! Report generation
//!
//! Renders a scenario outcome as plain text or JSON.

use crate::config::OutputFormat;
use crate::runner::Outcome;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

/// Render `outcome` in the requested format
pub fn render(outcome: &Outcome, format: OutputFormat, generated_at: DateTime<Utc>) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome, generated_at)),
        OutputFormat::Json => render_json(outcome, generated_at),
    }
}

fn render_text(outcome: &Outcome, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Channel:    {}", outcome.channel);
    let _ = writeln!(out, "Generated:  {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "Rounds:     {}", outcome.rounds);
    let _ = writeln!(out, "Calls:      {}", outcome.invocations.len());
    let _ = writeln!(out, "Remaining:  {} listener(s)", outcome.remaining_listeners);

    for round in 1..=outcome.rounds {
        let calls = outcome.round(round);

        let _ = writeln!(out);
        let _ = writeln!(out, "Round {}", round);
        if calls.is_empty() {
            let _ = writeln!(out, "  (no listeners)");
        }
        for call in calls {
            if call.payload.is_empty() {
                let _ = writeln!(out, "  {}", call.listener);
            } else {
                let _ = writeln!(out, "  {} <- {:?}", call.listener, call.payload);
            }
        }
    }

    out
}

fn render_json(outcome: &Outcome, generated_at: DateTime<Utc>) -> Result<String> {
    let report = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        outcome,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
