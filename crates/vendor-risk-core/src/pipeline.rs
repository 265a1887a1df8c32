use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::checklist::{initial_results, parsers, prompts, ChecklistItemId, StepResult};
use crate::oracle::{OracleClient, OracleError};
use crate::profile::VendorRiskProfile;

/// Conditions that block a run; no profile is produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("please enter a vendor domain")]
    EmptyDomain,
    #[error("cannot analyze: {0}")]
    Configuration(String),
}

/// Runs the nine checklist questions for a domain against an oracle.
///
/// Steps execute one at a time in canonical order. A failed domain-presence
/// check halts the run; oracle errors on any other step only affect that step.
pub struct RiskPipeline<O: OracleClient + ?Sized> {
    oracle: Arc<O>,
}

/// Why a run stopped before scoring.
enum RunAbort {
    Configuration(String),
    Unexpected(OracleError),
}

impl<O: OracleClient + ?Sized> RiskPipeline<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Analyze `domain` and produce its risk profile.
    #[instrument(name = "analyze_vendor", skip(self, domain), fields(domain = %domain.trim()))]
    pub async fn analyze(&self, domain: &str) -> Result<VendorRiskProfile, AnalysisError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(AnalysisError::EmptyDomain);
        }
        self.oracle
            .ensure_configured()
            .map_err(|err| AnalysisError::Configuration(err.to_string()))?;

        let mut results = initial_results();
        match self.evaluate(domain, &mut results).await {
            Ok(true) => {
                info!("vendor disqualified by domain presence check");
                Ok(VendorRiskProfile::disqualified(domain, results))
            }
            Ok(false) => {
                let profile = VendorRiskProfile::scored(domain, results);
                info!(
                    total_score = profile.total_score,
                    verdict = profile.verdict.label(),
                    "analysis completed"
                );
                Ok(profile)
            }
            Err(RunAbort::Configuration(message)) => Err(AnalysisError::Configuration(message)),
            Err(RunAbort::Unexpected(err)) => {
                error!(error = %err, "analysis aborted");
                Ok(VendorRiskProfile::errored(domain, results, err.to_string()))
            }
        }
    }

    /// Fill `results` in place; returns whether the vendor was disqualified.
    async fn evaluate(&self, domain: &str, results: &mut [StepResult]) -> Result<bool, RunAbort> {
        let presence = self.run_step(ChecklistItemId::DomainPresence, domain).await?;
        let disqualified = presence.points < 0.0;
        results[ChecklistItemId::DomainPresence.index()] = presence;
        if disqualified {
            return Ok(true);
        }

        for id in ChecklistItemId::ALL.into_iter().skip(1) {
            results[id.index()] = self.run_step(id, domain).await?;
        }
        Ok(false)
    }

    async fn run_step(&self, id: ChecklistItemId, domain: &str) -> Result<StepResult, RunAbort> {
        let prompt = prompts::prompt_for(id, domain);
        match self.oracle.generate(&prompt).await {
            Ok(reply) => {
                let outcome = parsers::evaluate(id, &reply);
                info!(step = id.as_str(), points = outcome.points, "step completed");
                Ok(StepResult::completed(id, outcome))
            }
            Err(OracleError::Configuration(message)) => Err(RunAbort::Configuration(message)),
            Err(err) if err.is_step_scoped() => {
                warn!(step = id.as_str(), error = %err, "oracle call failed");
                Ok(StepResult::failed(id, err.to_string()))
            }
            Err(err) => Err(RunAbort::Unexpected(err)),
        }
    }
}

impl<O: OracleClient + ?Sized> Clone for RiskPipeline<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::StepStatus;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted replies in call order and records the prompts it saw.
    struct ScriptedOracle {
        replies: Mutex<VecDeque<Result<String, OracleError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        fn new(replies: Vec<Result<String, OracleError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn texts(replies: &[&str]) -> Arc<Self> {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OracleClient for ScriptedOracle {
        async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted").into()))
        }
    }

    struct UnconfiguredOracle;

    #[async_trait]
    impl OracleClient for UnconfiguredOracle {
        async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
            Err(OracleError::missing_credential("test"))
        }

        fn ensure_configured(&self) -> Result<(), OracleError> {
            Err(OracleError::missing_credential("test"))
        }
    }

    const PERFECT: [&str; 9] = [
        "Yes",
        "reject",
        "Secure - HSTS and modern TLS",
        "ISO 27001 certification, SOC attestations, Privacy Policy, Information Security Policy",
        "0 breaches",
        "No",
        "Positive - customers are happy",
        "10",
        "None found",
    ];

    #[tokio::test]
    async fn rejects_blank_domain_before_calling_oracle() {
        let oracle = ScriptedOracle::texts(&PERFECT);
        let pipeline = RiskPipeline::new(Arc::clone(&oracle));
        let err = pipeline.analyze("   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyDomain));
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_blocks_the_run() {
        let pipeline = RiskPipeline::new(Arc::new(UnconfiguredOracle));
        let err = pipeline.analyze("good.example").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
        assert!(err.to_string().contains(OracleError::MISSING_CREDENTIAL));
    }

    #[tokio::test]
    async fn perfect_replies_score_full_marks() {
        let oracle = ScriptedOracle::texts(&PERFECT);
        let pipeline = RiskPipeline::new(Arc::clone(&oracle));
        let profile = pipeline.analyze("good.example").await.unwrap();
        assert_eq!(oracle.calls(), 9);
        assert_eq!(profile.total_score, 39.0);
        assert_eq!(profile.percentage, Some(100.0));
        assert!(profile.passed());
        assert!(profile.summary.contains("PASSES"));
        let ids: Vec<_> = profile.checklist_results.iter().map(|r| r.id).collect();
        assert_eq!(ids, ChecklistItemId::ALL.to_vec());
        assert!(profile
            .checklist_results
            .iter()
            .all(|r| r.status == StepStatus::Completed));
    }

    #[tokio::test]
    async fn prompts_are_sent_in_canonical_order() {
        let oracle = ScriptedOracle::texts(&PERFECT);
        let pipeline = RiskPipeline::new(Arc::clone(&oracle));
        pipeline.analyze("  order.example ").await.unwrap();
        let prompts = oracle.prompts.lock().unwrap().clone();
        let expected: Vec<_> = ChecklistItemId::ALL
            .iter()
            .map(|id| prompts::prompt_for(*id, "order.example"))
            .collect();
        assert_eq!(prompts, expected);
    }

    #[tokio::test]
    async fn domain_presence_failure_halts_run() {
        let oracle = ScriptedOracle::texts(&["No"]);
        let pipeline = RiskPipeline::new(Arc::clone(&oracle));
        let profile = pipeline.analyze("bad.example").await.unwrap();
        assert_eq!(oracle.calls(), 1);
        assert!(profile.disqualified);
        assert_eq!(profile.total_score, -10.0);
        assert!(profile.checklist_results[1..]
            .iter()
            .all(|r| r.status == StepStatus::Pending));
    }

    #[tokio::test]
    async fn step_errors_do_not_stop_the_run() {
        let mut replies: Vec<Result<String, OracleError>> =
            PERFECT.iter().map(|r| Ok(r.to_string())).collect();
        replies[1] = Err(OracleError::Transport("network unreachable".into()));
        replies[4] = Err(OracleError::Auth("key rejected".into()));
        let oracle = ScriptedOracle::new(replies);
        let pipeline = RiskPipeline::new(Arc::clone(&oracle));
        let profile = pipeline.analyze("flaky.example").await.unwrap();

        assert_eq!(oracle.calls(), 9);
        let dmarc = profile.result(ChecklistItemId::Dmarc).unwrap();
        assert_eq!(dmarc.status, StepStatus::Error);
        assert_eq!(dmarc.points, 0.0);
        assert_eq!(dmarc.finding, StepResult::FAILED_FINDING);
        assert_eq!(dmarc.justification, "network unreachable");
        assert_eq!(
            profile.result(ChecklistItemId::Breaches).unwrap().status,
            StepStatus::Error
        );
        assert_eq!(profile.total_score, 29.0);
    }

    #[tokio::test]
    async fn domain_presence_oracle_error_does_not_disqualify() {
        let mut replies: Vec<Result<String, OracleError>> =
            PERFECT.iter().map(|r| Ok(r.to_string())).collect();
        replies[0] = Err(OracleError::UnexpectedFormat("empty".into()));
        let pipeline = RiskPipeline::new(ScriptedOracle::new(replies));
        let profile = pipeline.analyze("odd.example").await.unwrap();
        assert!(!profile.disqualified);
        assert_eq!(profile.checklist_results[0].status, StepStatus::Error);
        assert_eq!(profile.total_score, 39.0);
    }

    #[tokio::test]
    async fn unexpected_error_aborts_remaining_steps() {
        let replies: Vec<Result<String, OracleError>> = vec![
            Ok("Yes".to_string()),
            Ok("reject".to_string()),
            Ok("Insecure".to_string()),
            Err(anyhow::anyhow!("decoder panicked").into()),
        ];
        let oracle = ScriptedOracle::new(replies);
        let pipeline = RiskPipeline::new(Arc::clone(&oracle));
        let profile = pipeline.analyze("broken.example").await.unwrap();

        assert_eq!(oracle.calls(), 4);
        assert_eq!(profile.summary, crate::profile::ERRORED_SUMMARY);
        assert_eq!(profile.run_error.as_deref(), Some("decoder panicked"));
        assert_eq!(profile.total_score, 0.0);
        assert!(profile.checklist_results[3..].iter().all(|r| {
            r.status == StepStatus::Error && r.finding == StepResult::ABORTED_FINDING
        }));
        assert_eq!(profile.checklist_results[2].status, StepStatus::Completed);
    }

    #[tokio::test]
    async fn configuration_error_mid_run_blocks() {
        let replies: Vec<Result<String, OracleError>> = vec![
            Ok("Yes".to_string()),
            Err(OracleError::missing_credential("test")),
        ];
        let pipeline = RiskPipeline::new(ScriptedOracle::new(replies));
        let err = pipeline.analyze("good.example").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[tokio::test]
    async fn identical_replies_give_identical_profiles() {
        let first = RiskPipeline::new(ScriptedOracle::texts(&PERFECT))
            .analyze("same.example")
            .await
            .unwrap();
        let second = RiskPipeline::new(ScriptedOracle::texts(&PERFECT))
            .analyze("same.example")
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
