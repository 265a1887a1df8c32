use std::fmt::Write;

use crate::checklist::{StepResult, StepStatus};
use crate::profile::{VendorRiskProfile, Verdict};

/// Format styles supported by [`render_profile`].
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Produce a report string from a `VendorRiskProfile` using the desired format.
pub fn render_profile(profile: &VendorRiskProfile, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => render_human(profile),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(profile)?),
    }
}

fn render_human(profile: &VendorRiskProfile) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "Risk Assessment for: {}", profile.domain)?;

    match (profile.verdict, profile.percentage) {
        (Verdict::Disqualified, _) => {
            writeln!(out, "Overall Result: DISQUALIFIED")?;
            writeln!(out, "Score: {} points", profile.total_score)?;
        }
        (verdict, Some(percentage)) => {
            writeln!(out, "Overall Result: {}", verdict.label())?;
            writeln!(
                out,
                "Score: {} points ({:.1}%)",
                profile.total_score, percentage
            )?;
        }
        (verdict, None) => {
            writeln!(out, "Overall Result: {}", verdict.label())?;
            writeln!(out, "Score: {} points (partial)", profile.total_score)?;
        }
    }
    if let Some(err) = &profile.run_error {
        writeln!(out, "Run error: {err}")?;
    }

    writeln!(out)?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  {}", profile.summary)?;

    writeln!(out)?;
    writeln!(out, "Detailed Checklist:")?;
    for result in &profile.checklist_results {
        render_step(&mut out, result)?;
    }
    Ok(out)
}

fn render_step(out: &mut String, result: &StepResult) -> anyhow::Result<()> {
    let points = match result.status {
        StepStatus::Completed => format!("{:+} pts", result.points),
        _ => "--".to_string(),
    };
    writeln!(
        out,
        "  - [{status:9}] {question} ({points})",
        status = result.status.as_str(),
        question = result.question,
    )?;
    writeln!(out, "      Finding: {}", single_line(&result.finding))?;
    if !result.justification.trim().is_empty() {
        writeln!(out, "      Justification: {}", single_line(&result.justification))?;
    }
    Ok(())
}

fn single_line(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            _ => c,
        })
        .collect()
}
