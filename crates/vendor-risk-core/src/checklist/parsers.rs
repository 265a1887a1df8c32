//! Reply-to-score mapping for each checklist item.
//!
//! Every function here is pure: it receives the raw oracle reply and returns the
//! points, finding and justification for that step. Label checks run against the
//! trimmed, lower-cased reply.

use std::collections::BTreeSet;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ChecklistItemId, StepOutcome};

pub const DISQUALIFYING_POINTS: f64 = -10.0;
pub const GRC_POINTS_PER_POLICY: f64 = 2.5;
pub const GRC_POINTS_CAP: f64 = 10.0;

/// GRC categories: (label used in findings, simplified keyword searched in replies).
pub const GRC_POLICIES: [(&str, &str); 4] = [
    ("ISO 27001 certification", "iso 27001"),
    ("SOC attestations", "soc"),
    ("Privacy Policy", "privacy policy"),
    ("Information Security Policy", "information security policy"),
];

static FIRST_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("integer pattern is valid"));

static GRC_AUTOMATON: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(GRC_POLICIES.iter().map(|(_, keyword)| *keyword))
        .expect("GRC keywords form a valid automaton")
});

/// Map a reply to the outcome of the given checklist item.
pub fn evaluate(id: ChecklistItemId, reply: &str) -> StepOutcome {
    match id {
        ChecklistItemId::DomainPresence => domain_presence(reply),
        ChecklistItemId::Dmarc => dmarc(reply),
        ChecklistItemId::WebsiteSecurity => website_security(reply),
        ChecklistItemId::GrcPolicies => grc_policies(reply),
        ChecklistItemId::Breaches => breaches(reply),
        ChecklistItemId::Litigation => litigation(reply),
        ChecklistItemId::OnlineReviews => online_reviews(reply),
        ChecklistItemId::YearsInBusiness => years_in_business(reply),
        ChecklistItemId::Vulnerabilities => vulnerabilities(reply),
    }
}

pub fn domain_presence(reply: &str) -> StepOutcome {
    if normalize(reply).contains("yes") {
        return outcome(
            0.0,
            "Vendor appears to have own domain, email, and website.",
            "Base requirement met. Analysis continues.",
        );
    }
    outcome(
        DISQUALIFYING_POINTS,
        "Vendor does NOT appear to have own domain, email, or website.",
        "Critical failure. Risk assessment terminated.",
    )
}

pub fn dmarc(reply: &str) -> StepOutcome {
    let normalized = normalize(reply);
    if normalized.contains("reject") {
        return outcome(
            10.0,
            "DMARC policy is p=reject.",
            "Full DMARC compliance with reject policy enhances email security.",
        );
    }
    outcome(
        -10.0,
        format!("DMARC policy is '{normalized}' (not p=reject)."),
        "DMARC policy is not 'reject', indicating potential email spoofing risks.",
    )
}

pub fn website_security(reply: &str) -> StepOutcome {
    let normalized = normalize(reply);
    let justification = reply.trim();
    if normalized.starts_with("insecure") {
        return outcome(-10.0, "Website appears insecure.", justification);
    }
    if normalized.starts_with("secure") || normalized.starts_with("moderately secure") {
        return outcome(5.0, "Website appears reasonably secure.", justification);
    }
    outcome(
        0.0,
        "Could not definitively assess website security.",
        justification,
    )
}

pub fn grc_policies(reply: &str) -> StepOutcome {
    let trimmed = reply.trim();
    let matched: BTreeSet<usize> = if normalize(reply).contains("none found") {
        BTreeSet::new()
    } else {
        GRC_AUTOMATON
            .find_overlapping_iter(trimmed)
            .map(|mat| mat.pattern().as_usize())
            .collect()
    };

    let points = (matched.len() as f64 * GRC_POINTS_PER_POLICY).min(GRC_POINTS_CAP);
    let finding = if matched.is_empty() {
        "No clear GRC policies found or declared prominently.".to_string()
    } else {
        let labels: Vec<_> = matched.iter().map(|idx| GRC_POLICIES[*idx].0).collect();
        format!("Found: {}.", labels.join(", "))
    };
    outcome(
        points,
        finding,
        format!("Awarded {points} points for declared GRC policies. {trimmed}"),
    )
}

pub fn breaches(reply: &str) -> StepOutcome {
    let trimmed = reply.trim();
    let count = first_integer(trimmed).unwrap_or(0);
    let assessment = format!("Model assessment: {trimmed}");
    let (points, justification) = match count {
        0 => (0.0, format!("No major breaches reported. {assessment}")),
        1 => (-5.0, format!("One major breach reported. {assessment}")),
        n => (-10.0, format!("{n} major breaches reported. {assessment}")),
    };
    outcome(
        points,
        format!("{count} major breach(es) found."),
        justification,
    )
}

pub fn litigation(reply: &str) -> StepOutcome {
    let justification = reply.trim();
    if normalize(reply).starts_with("yes") {
        return outcome(
            -3.0,
            "History of significant litigation found.",
            justification,
        );
    }
    outcome(
        0.0,
        "No significant history of >2 major litigation cases found.",
        justification,
    )
}

pub fn online_reviews(reply: &str) -> StepOutcome {
    let normalized = normalize(reply);
    let justification = reply.trim();
    if normalized.starts_with("positive") {
        outcome(3.0, "Positive sentiment.", justification)
    } else if normalized.starts_with("negative") {
        outcome(-2.0, "Negative sentiment.", justification)
    } else {
        outcome(0.0, "Neutral/Mixed sentiment.", justification)
    }
}

pub fn years_in_business(reply: &str) -> StepOutcome {
    let years = first_integer(reply.trim()).unwrap_or(0);
    if years > 5 {
        return outcome(
            1.0,
            format!("In business for approx {years} years."),
            "Company established for over 5 years.",
        );
    }
    outcome(
        0.0,
        format!("In business for approx {years} years (or unknown/less than 5)."),
        "Company established for 5 years or less, or age unknown from this check.",
    )
}

pub fn vulnerabilities(reply: &str) -> StepOutcome {
    const SERIOUS_LABELS: [&str; 3] = [
        "serious/critical vulnerabilities likely",
        "critical vulnerabilities likely",
        "serious vulnerabilities likely",
    ];

    let normalized = normalize(reply);
    let justification = reply.trim();
    if SERIOUS_LABELS
        .iter()
        .any(|label| normalized.starts_with(label))
    {
        return outcome(
            -10.0,
            "Serious/Critical vulnerabilities likely.",
            justification,
        );
    }
    if normalized.starts_with("none found") {
        return outcome(
            10.0,
            "No serious/critical vulnerabilities identified.",
            justification,
        );
    }
    outcome(
        0.0,
        "Minor or no critical vulnerabilities identified from simulated scan.",
        justification,
    )
}

fn normalize(reply: &str) -> String {
    reply.trim().to_lowercase()
}

/// First run of ASCII digits in `text`; runs too long for `u64` saturate.
fn first_integer(text: &str) -> Option<u64> {
    FIRST_INTEGER
        .find(text)
        .map(|digits| digits.as_str().parse::<u64>().unwrap_or(u64::MAX))
}

fn outcome(points: f64, finding: impl Into<String>, justification: impl Into<String>) -> StepOutcome {
    StepOutcome {
        points,
        finding: finding.into(),
        justification: justification.into(),
    }
}
