use super::{classify_http_failure, http_client, require_credential, OracleClient, OracleError, OracleSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

#[derive(Debug, Clone)]
pub struct AnthropicOracle {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl AnthropicOracle {
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let api_key = require_credential("Anthropic", settings)?.to_string();
        let base = settings
            .endpoint
            .as_deref()
            .unwrap_or("https://api.anthropic.com");
        let url = format!("{}/v1/messages", base.trim_end_matches('/'));
        Ok(Self {
            http: http_client("Anthropic", settings)?,
            url,
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| "claude-3-5-haiku-latest".to_string()),
        })
    }
}

#[async_trait]
impl OracleClient for AnthropicOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let payload = AnthropicRequest {
            model: &self.model,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                OracleError::Transport(format!(
                    "network error reaching Anthropic messages API: {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure("Anthropic", status, &body));
        }

        let message: AnthropicResponse = response.json().await.map_err(|err| {
            OracleError::UnexpectedFormat(format!(
                "failed to parse Anthropic response: {}",
                err.without_url()
            ))
        })?;
        message
            .content
            .into_iter()
            .filter(|part| part.kind == "text")
            .find_map(|part| part.text)
            .ok_or_else(|| {
                OracleError::UnexpectedFormat("Anthropic response missing text content".into())
            })
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
