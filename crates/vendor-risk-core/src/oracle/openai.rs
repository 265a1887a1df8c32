use super::{classify_http_failure, http_client, require_credential, OracleClient, OracleError, OracleSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct OpenAiOracle {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiOracle {
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let api_key = require_credential("OpenAI", settings)?.to_string();
        let base = settings
            .endpoint
            .as_deref()
            .unwrap_or("https://api.openai.com");
        let url = format!("{}/v1/chat/completions", base.trim_end_matches('/'));
        Ok(Self {
            http: http_client("OpenAI", settings)?,
            url,
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
        })
    }
}

#[async_trait]
impl OracleClient for OpenAiOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                OracleError::Transport(format!(
                    "network error reaching OpenAI chat completions API: {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure("OpenAI", status, &body));
        }

        let chat: ChatCompletionResponse = response.json().await.map_err(|err| {
            OracleError::UnexpectedFormat(format!(
                "failed to parse OpenAI response: {}",
                err.without_url()
            ))
        })?;
        chat.choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| {
                OracleError::UnexpectedFormat("OpenAI response missing message content".into())
            })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
