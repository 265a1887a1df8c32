mod anthropic;
mod gemini;
mod openai;
mod settings;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub use anthropic::AnthropicOracle;
pub use gemini::GeminiOracle;
pub use openai::OpenAiOracle;
pub use settings::OracleSettings;

/// Text-generation backend answering the checklist questions.
///
/// Implementations issue exactly one request per call and return the generated
/// text verbatim; interpreting it is left to the caller.
#[async_trait]
pub trait OracleClient: Send + Sync {
    /// Send `prompt` and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;

    /// Report whether the client can be used at all (e.g. a credential is present).
    fn ensure_configured(&self) -> Result<(), OracleError> {
        Ok(())
    }
}

/// Failures reported by an oracle call.
#[derive(Debug, Error)]
pub enum OracleError {
    /// No usable credential or otherwise invalid settings.
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Auth(String),
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
    /// Anything that is not a structured oracle failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl OracleError {
    pub const MISSING_CREDENTIAL: &'static str = "credential not configured";

    pub fn missing_credential(provider: &str) -> Self {
        Self::Configuration(format!(
            "{} ({provider} requires {} or {})",
            Self::MISSING_CREDENTIAL,
            OracleSettings::API_KEY_ENV,
            OracleSettings::FALLBACK_API_KEY_ENV
        ))
    }

    /// Whether the failure only affects the step that made the call.
    pub fn is_step_scoped(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Auth(_) | Self::UnexpectedFormat(_)
        )
    }
}

/// Map a non-success HTTP response to an oracle error.
pub(crate) fn classify_http_failure(provider: &str, status: StatusCode, body: &str) -> OracleError {
    let lowered = body.to_ascii_lowercase();
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || lowered.contains("api key not valid")
        || lowered.contains("invalid api key")
        || lowered.contains("invalid x-api-key")
    {
        return OracleError::Auth(format!(
            "{provider} rejected the configured credential ({status}): {body}"
        ));
    }
    OracleError::Transport(format!("{provider} API error ({status}): {body}"))
}

/// Supported oracle backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Anthropic,
    Noop,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Noop => "noop",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = OracleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "noop" => Ok(Self::Noop),
            other => Err(OracleError::Configuration(format!(
                "unsupported oracle provider `{other}`"
            ))),
        }
    }
}

/// Construct the oracle described by `settings`.
///
/// Networked providers fail here with [`OracleError::Configuration`] when no
/// credential is configured, before any request is attempted.
pub fn build_oracle(settings: &OracleSettings) -> Result<Arc<dyn OracleClient>, OracleError> {
    let client: Arc<dyn OracleClient> = match settings.provider.parse::<ProviderKind>()? {
        ProviderKind::Gemini => Arc::new(GeminiOracle::new(settings)?),
        ProviderKind::OpenAi => Arc::new(OpenAiOracle::new(settings)?),
        ProviderKind::Anthropic => Arc::new(AnthropicOracle::new(settings)?),
        ProviderKind::Noop => Arc::new(NoopOracle),
    };
    Ok(client)
}

/// Offline oracle that answers every question with "Unknown".
#[derive(Debug, Default, Clone)]
pub struct NoopOracle;

impl NoopOracle {
    pub const REPLY: &'static str = "Unknown";
}

#[async_trait]
impl OracleClient for NoopOracle {
    async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
        Ok(Self::REPLY.to_string())
    }
}

pub(crate) fn http_client(
    provider: &str,
    settings: &OracleSettings,
) -> Result<reqwest::Client, OracleError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        "vendor-risk/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = settings.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|err| {
        OracleError::Configuration(format!("failed to build {provider} HTTP client: {err}"))
    })
}

pub(crate) fn require_credential<'a>(
    provider: &str,
    settings: &'a OracleSettings,
) -> Result<&'a str, OracleError> {
    settings
        .credential()
        .ok_or_else(|| OracleError::missing_credential(provider))
}
