//! Model-backed analysis of extracted workflow XML.
//!
//! Talks to any endpoint that follows the OpenAI chat completions API
//! format. The rest of the crate only sees the [`Analyzer`] trait, so the
//! generation pipeline can run against a stub in tests.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::core::config::ApiConfig;

pub mod prompts;

/// Errors from the model analysis subsystem.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// No API key in the config or the environment.
    #[error("no API key found: set the {env} environment variable")]
    AuthFailed { env: String },

    /// The endpoint answered with a non-success status.
    #[error("model endpoint returned HTTP {status}: {message}")]
    ApiRequest { status: u16, message: String },

    /// The endpoint answered 2xx but the body was not a chat completion.
    #[error("unexpected model response: {message}")]
    ResponseParse { message: String },

    /// The request never completed.
    #[error("request to model endpoint failed: {0}")]
    Connection(#[from] reqwest::Error),
}

/// Completion backend used by the generation pipeline.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Send one prompt and return the model reply text.
    async fn complete(&self, prompt: &str) -> Result<String, AnalyzerError>;
}

/// Analyzer speaking the OpenAI chat completions protocol.
pub struct OpenAiAnalyzer {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiAnalyzer {
    /// Create an analyzer from configuration.
    ///
    /// The API key comes from `api.api_key` when set, otherwise from the
    /// environment variable named by `api.api_key_env`.
    pub fn new(config: &ApiConfig) -> Result<Self, AnalyzerError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(&config.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AnalyzerError::AuthFailed {
                env: config.api_key_env.clone(),
            })?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Pull the reply text out of a chat completion body.
    fn parse_content(body: &str) -> Result<String, AnalyzerError> {
        let json: Value = serde_json::from_str(body).map_err(|err| AnalyzerError::ResponseParse {
            message: format!("invalid JSON: {}", err),
        })?;

        json.get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(|content| content.to_string())
            .ok_or_else(|| AnalyzerError::ResponseParse {
                message: "no message content in choices[0]".to_string(),
            })
    }
}

#[async_trait]
impl Analyzer for OpenAiAnalyzer {
    async fn complete(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        debug!("sending completion request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            return Err(AnalyzerError::ApiRequest {
                status: status.as_u16(),
                message: response_body,
            });
        }

        Self::parse_content(&response_body)
    }
}

/// Pull the first fenced code block out of a model reply.
///
/// Returns None when the reply carries no non-empty fenced block.
pub fn extract_code(reply: &str) -> Option<String> {
    let mut lines = reply.lines();
    lines.find(|line| line.trim_start().starts_with("```"))?;

    let mut body = Vec::new();
    for line in lines {
        if line.trim_start().starts_with("```") {
            break;
        }
        body.push(line);
    }

    if body.is_empty() {
        return None;
    }
    Some(body.join("\n"))
}

/// Reduce a model reply to code: the first fenced block when present, the
/// reply unchanged otherwise.
pub fn strip_code_fences(reply: &str) -> String {
    match extract_code(reply) {
        Some(code) => code,
        None => reply.trim().to_string(),
    }
}
