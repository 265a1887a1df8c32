use serde::{Deserialize, Serialize};

pub mod parsers;
pub mod prompts;

/// Canonical identifiers for the nine checklist questions, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItemId {
    DomainPresence,
    Dmarc,
    WebsiteSecurity,
    GrcPolicies,
    Breaches,
    Litigation,
    OnlineReviews,
    YearsInBusiness,
    Vulnerabilities,
}

impl ChecklistItemId {
    /// Every checklist item in canonical order.
    pub const ALL: [ChecklistItemId; 9] = [
        Self::DomainPresence,
        Self::Dmarc,
        Self::WebsiteSecurity,
        Self::GrcPolicies,
        Self::Breaches,
        Self::Litigation,
        Self::OnlineReviews,
        Self::YearsInBusiness,
        Self::Vulnerabilities,
    ];

    /// Position of the item within [`ChecklistItemId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainPresence => "domain_presence",
            Self::Dmarc => "dmarc",
            Self::WebsiteSecurity => "website_security",
            Self::GrcPolicies => "grc_policies",
            Self::Breaches => "breaches",
            Self::Litigation => "litigation",
            Self::OnlineReviews => "online_reviews",
            Self::YearsInBusiness => "years_in_business",
            Self::Vulnerabilities => "vulnerabilities",
        }
    }

    pub fn definition(self) -> &'static ChecklistStepDefinition {
        &CHECKLIST[self.index()]
    }
}

/// Static description of a checklist question.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistStepDefinition {
    pub id: ChecklistItemId,
    /// Short question shown next to each result.
    pub question: &'static str,
    /// Longer explanation of what the question is probing.
    pub description: Option<&'static str>,
}

/// The checklist, indexed by [`ChecklistItemId::index`].
pub static CHECKLIST: [ChecklistStepDefinition; 9] = [
    ChecklistStepDefinition {
        id: ChecklistItemId::DomainPresence,
        question: "Own Domain, Email & Website Presence",
        description: Some(
            "Does the vendor have their own domain, email system, and a functional website? (Critical)",
        ),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::Dmarc,
        question: "DMARC Compliance (p=reject)",
        description: Some(
            "Does the vendor's email domain fully comply with DMARC with a 'reject' policy?",
        ),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::WebsiteSecurity,
        question: "Reasonable Website Security",
        description: Some(
            "Is the vendor's website reasonably secure (e.g., HTTPS, no obvious major flaws)?",
        ),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::GrcPolicies,
        question: "Declared Policies & GRC Status",
        description: Some(
            "Does the website declare GRC status (ISO 27001, SOC, Privacy Policy, InfoSec Policy) in a dedicated section?",
        ),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::Breaches,
        question: "History of Cyber/Privacy Breaches",
        description: Some(
            "Are there publicly reported cybersecurity or privacy breaches associated with the vendor?",
        ),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::Litigation,
        question: "History of Significant Litigation",
        description: Some(
            "Does the vendor have a history of more than two significant litigation cases?",
        ),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::OnlineReviews,
        question: "Online Comments/Reviews Sentiment",
        description: Some("What is the general sentiment of online reviews about the organization?"),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::YearsInBusiness,
        question: "Years in Business",
        description: Some("Has the organization been in business for more than 5 years?"),
    },
    ChecklistStepDefinition {
        id: ChecklistItemId::Vulnerabilities,
        question: "Identified Vulnerabilities (Online Scan)",
        description: Some(
            "Does a simulated online scan identify any serious or critical vulnerabilities in owned assets?",
        ),
    },
];

/// Lifecycle of a single checklist item during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Completed,
    Error,
    Skipped,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

/// Points and texts derived from a single oracle reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub points: f64,
    pub finding: String,
    pub justification: String,
}

/// Result of one checklist item within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub id: ChecklistItemId,
    pub question: String,
    pub finding: String,
    pub points: f64,
    pub justification: String,
    pub status: StepStatus,
}

impl StepResult {
    pub const PENDING_FINDING: &'static str = "Pending analysis...";
    pub const FAILED_FINDING: &'static str = "Error in analysis";
    pub const ABORTED_FINDING: &'static str = "Error during analysis";

    /// Placeholder created before a run starts.
    pub fn pending(id: ChecklistItemId) -> Self {
        Self {
            id,
            question: id.definition().question.to_string(),
            finding: Self::PENDING_FINDING.to_string(),
            points: 0.0,
            justification: String::new(),
            status: StepStatus::Pending,
        }
    }

    pub fn completed(id: ChecklistItemId, outcome: StepOutcome) -> Self {
        Self {
            id,
            question: id.definition().question.to_string(),
            finding: outcome.finding,
            points: outcome.points,
            justification: outcome.justification,
            status: StepStatus::Completed,
        }
    }

    /// Result for a step whose oracle call reported an error.
    pub fn failed(id: ChecklistItemId, message: impl Into<String>) -> Self {
        Self {
            id,
            question: id.definition().question.to_string(),
            finding: Self::FAILED_FINDING.to_string(),
            points: 0.0,
            justification: message.into(),
            status: StepStatus::Error,
        }
    }

    /// Promote a still-pending result to `error` after the run was aborted.
    pub fn mark_aborted(&mut self) {
        if self.status == StepStatus::Pending {
            self.status = StepStatus::Error;
            self.finding = Self::ABORTED_FINDING.to_string();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }
}

/// Fresh set of pending results in canonical order.
pub fn initial_results() -> Vec<StepResult> {
    ChecklistItemId::ALL
        .iter()
        .copied()
        .map(StepResult::pending)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_follow_canonical_order() {
        for (idx, id) in ChecklistItemId::ALL.iter().enumerate() {
            assert_eq!(id.index(), idx);
            assert_eq!(CHECKLIST[idx].id, *id);
        }
    }

    #[test]
    fn serialized_ids_match_as_str() {
        for id in ChecklistItemId::ALL {
            let value = serde_json::to_value(id).unwrap();
            assert_eq!(value, serde_json::json!(id.as_str()));
        }
    }

    #[test]
    fn initial_results_are_pending() {
        let results = initial_results();
        assert_eq!(results.len(), 9);
        assert!(results.iter().all(|r| r.is_pending()));
        assert!(results
            .iter()
            .all(|r| r.finding == StepResult::PENDING_FINDING && r.points == 0.0));
    }

    #[test]
    fn mark_aborted_only_touches_pending() {
        let mut done = StepResult::completed(
            ChecklistItemId::Dmarc,
            StepOutcome {
                points: 10.0,
                finding: "DMARC policy is p=reject.".into(),
                justification: "ok".into(),
            },
        );
        done.mark_aborted();
        assert_eq!(done.status, StepStatus::Completed);

        let mut pending = StepResult::pending(ChecklistItemId::Breaches);
        pending.mark_aborted();
        assert_eq!(pending.status, StepStatus::Error);
        assert_eq!(pending.finding, StepResult::ABORTED_FINDING);
    }
}
