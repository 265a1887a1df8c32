use serde::{Deserialize, Serialize};

use crate::checklist::{ChecklistItemId, StepResult};
pub use crate::checklist::parsers::DISQUALIFYING_POINTS;

/// Best attainable score once the domain-presence check has passed:
/// DMARC 10 + website 5 + GRC 10 + reviews 3 + years 1 + vulnerabilities 10.
pub const MAX_POSSIBLE_SCORE: f64 = 39.0;
pub const PASS_THRESHOLD_PERCENT: f64 = 60.0;

pub const DISQUALIFIED_SUMMARY: &str =
    "Vendor does not meet basic criteria (domain presence). Risk assessment terminated. FAILED.";
pub const ERRORED_SUMMARY: &str = "Analysis could not be completed due to an error.";

/// Overall outcome of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    Disqualified,
    Incomplete,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Disqualified => "DISQUALIFIED",
            Self::Incomplete => "INCOMPLETE",
        }
    }
}

/// Scored report for one vendor domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRiskProfile {
    pub domain: String,
    pub checklist_results: Vec<StepResult>,
    pub total_score: f64,
    /// Share of [`MAX_POSSIBLE_SCORE`]; only present for fully scored runs.
    pub percentage: Option<f64>,
    pub verdict: Verdict,
    pub summary: String,
    pub disqualified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_error: Option<String>,
}

impl VendorRiskProfile {
    /// Profile for a vendor that failed the domain-presence check.
    pub fn disqualified(domain: impl Into<String>, results: Vec<StepResult>) -> Self {
        let total_score = results
            .iter()
            .find(|r| r.id == ChecklistItemId::DomainPresence)
            .map(|r| r.points)
            .unwrap_or_default();
        Self {
            domain: domain.into(),
            checklist_results: results,
            total_score,
            percentage: None,
            verdict: Verdict::Disqualified,
            summary: DISQUALIFIED_SUMMARY.to_string(),
            disqualified: true,
            run_error: None,
        }
    }

    /// Profile for a run that evaluated every checklist item.
    pub fn scored(domain: impl Into<String>, results: Vec<StepResult>) -> Self {
        let total_score = qualified_score(results.iter());
        let percentage = total_score / MAX_POSSIBLE_SCORE * 100.0;
        let (verdict, summary) = if percentage >= PASS_THRESHOLD_PERCENT {
            (
                Verdict::Pass,
                format!(
                    "Vendor PASSES with {total_score} points ({percentage:.1}%). Strengths observed in DMARC, security posture, and GRC. Continuous monitoring advised."
                ),
            )
        } else {
            (
                Verdict::Fail,
                format!(
                    "Vendor FAILS with {total_score} points ({percentage:.1}%). Shortcomings identified in areas such as {}. Further investigation needed.",
                    shortcomings(&results)
                ),
            )
        };
        Self {
            domain: domain.into(),
            checklist_results: results,
            total_score,
            percentage: Some(percentage),
            verdict,
            summary,
            disqualified: false,
            run_error: None,
        }
    }

    /// Profile for a run aborted by an unexpected failure.
    ///
    /// Still-pending items are marked as errored; the score covers whatever
    /// non-domain-presence items had finished.
    pub fn errored(
        domain: impl Into<String>,
        mut results: Vec<StepResult>,
        message: impl Into<String>,
    ) -> Self {
        let total_score = qualified_score(results.iter().filter(|r| !r.is_pending()));
        for result in results.iter_mut() {
            result.mark_aborted();
        }
        Self {
            domain: domain.into(),
            checklist_results: results,
            total_score,
            percentage: None,
            verdict: Verdict::Incomplete,
            summary: ERRORED_SUMMARY.to_string(),
            disqualified: false,
            run_error: Some(message.into()),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn result(&self, id: ChecklistItemId) -> Option<&StepResult> {
        self.checklist_results.iter().find(|r| r.id == id)
    }
}

/// Sum of points, leaving out the domain-presence item.
fn qualified_score<'a>(results: impl Iterator<Item = &'a StepResult>) -> f64 {
    results
        .filter(|r| r.id != ChecklistItemId::DomainPresence)
        .fold(0.0, |total, r| total + r.points)
}

fn shortcomings(results: &[StepResult]) -> String {
    let areas: Vec<_> = results
        .iter()
        .filter(|r| r.points < 0.0 && r.id != ChecklistItemId::DomainPresence)
        .map(|r| r.question.split(" - ").next().unwrap_or(&r.question))
        .collect();
    if areas.is_empty() {
        "various criteria".to_string()
    } else {
        areas.join(", ")
    }
}
