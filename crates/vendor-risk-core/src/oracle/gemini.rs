use super::{classify_http_failure, http_client, require_credential, OracleClient, OracleError, OracleSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiOracle {
    http: Client,
    url: String,
    api_key: String,
}

impl GeminiOracle {
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let api_key = require_credential("Gemini", settings)?.to_string();
        let base = settings.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let model = settings.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base.trim_end_matches('/'),
            model
        );
        Ok(Self {
            http: http_client("Gemini", settings)?,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl OracleClient for GeminiOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let payload = GeminiRequest {
            contents: vec![GeminiRequestContent {
                role: "user",
                parts: vec![GeminiRequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                OracleError::Transport(format!(
                    "network error reaching Gemini generateContent API: {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure("Gemini", status, &body));
        }

        let message: GeminiResponse = response.json().await.map_err(|err| {
            OracleError::UnexpectedFormat(format!(
                "failed to parse Gemini response: {}",
                err.without_url()
            ))
        })?;
        let text = message
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .filter_map(|part| part.text)
            .reduce(|mut acc, part| {
                acc.push_str(&part);
                acc
            })
            .ok_or_else(|| {
                OracleError::UnexpectedFormat("Gemini response missing text content".into())
            })?;
        debug!(reply_len = text.len(), "gemini reply received");
        Ok(text)
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiRequestContent<'a>>,
}

#[derive(Serialize)]
struct GeminiRequestContent<'a> {
    role: &'static str,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Serialize)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}
