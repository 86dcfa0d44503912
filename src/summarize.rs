//! Specification summarizer abstraction and implementations.
//!
//! The catalog treats summarization as an opaque, possibly failing remote
//! call: one text blob in (the specification), one text blob out. Two
//! implementations ship:
//!
//! - **[`DisabledSummarizer`]**: always errors; used when no provider is configured.
//! - **[`OpenAiSummarizer`]**: calls an OpenAI-compatible chat completions endpoint.
//!
//! Use [`create_summarizer`] to pick one from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::config::SummarizerConfig;

const SYSTEM_PROMPT: &str = "You are an expert API summarizer. You will be given the OpenAPI \
specification of an API and you will generate a concise summary of the API.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Produce a concise summary of an API specification.
    async fn summarize(&self, specification: &str) -> Result<String>;
}

/// Instantiate the summarizer named by `summarizer.provider`.
///
/// ```rust
/// # use api_catalog::config::SummarizerConfig;
/// # use api_catalog::summarize::create_summarizer;
/// let summarizer = create_summarizer(&SummarizerConfig::default()).unwrap();
/// assert_eq!(summarizer.name(), "disabled");
/// ```
pub fn create_summarizer(config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(DisabledSummarizer)),
        "openai" => Ok(Arc::new(OpenAiSummarizer::new(config)?)),
        other => bail!("Unknown summarizer provider: {}", other),
    }
}

// ============ Disabled ============

pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn summarize(&self, _specification: &str) -> Result<String> {
        bail!("Summarizer is disabled")
    }
}

// ============ OpenAI ============

/// Summarizer backed by an OpenAI-compatible `chat/completions` endpoint.
///
/// Requires `OPENAI_API_KEY` in the environment.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl OpenAiSummarizer {
    /// # Errors
    ///
    /// Returns an error if `model` is not set or `OPENAI_API_KEY` is missing.
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("summarizer.model required for OpenAI provider"))?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model,
            api_key,
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, specification: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("API Specification: {}", specification) },
            ],
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Summarizer request to {} failed", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Summarizer API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_chat_response(&json)
    }
}

/// Extract `choices[0].message.content` from a chat completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid summarizer response: missing message content"))?;

    let summary = content.trim();
    if summary.is_empty() {
        bail!("Summarizer returned an empty summary");
    }
    Ok(summary.to_string())
}
