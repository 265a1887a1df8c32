pub mod checklist;
pub mod oracle;
pub mod pipeline;
pub mod profile;
pub mod report;

pub use checklist::{
    ChecklistItemId, ChecklistStepDefinition, StepOutcome, StepResult, StepStatus, CHECKLIST,
};
pub use oracle::{build_oracle, NoopOracle, OracleClient, OracleError, OracleSettings, ProviderKind};
pub use pipeline::{AnalysisError, RiskPipeline};
pub use profile::{
    VendorRiskProfile, Verdict, DISQUALIFYING_POINTS, MAX_POSSIBLE_SCORE, PASS_THRESHOLD_PERCENT,
};
pub use report::{render_profile, OutputFormat};
