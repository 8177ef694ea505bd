//! LLM client for niche analysis
//!
//! This module talks to an OpenAI-compatible chat completions endpoint in
//! JSON response mode and decodes the answers into [`NicheAnalysis`] and
//! [`TrendingReport`] documents. There is no retry: a failed call is
//! reported to the caller, with quota problems classified separately.

pub mod prompts;
pub mod response;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

pub use response::{
    InsightDraft, MetricsDraft, MonetizationDraft, NicheAnalysis, NicheDraft,
    RecommendationDraft, TrendingReport,
};

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Message returned for quota failures
pub const QUOTA_MESSAGE: &str =
    "API quota exceeded: Please check your OpenAI API key or billing details.";

/// Configuration for LLM client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the trailing `/chat/completions`
    pub base_url: String,

    /// API key; may also be supplied at runtime
    pub api_key: Option<String>,

    /// Model name to use
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
            temperature: None,
        }
    }
}

impl LlmConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            temperature: std::env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Errors from the LLM call-out
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured
    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    /// Quota exhausted or rate limited by the provider
    #[error("API quota exceeded: Please check your OpenAI API key or billing details.")]
    QuotaExceeded,

    /// Transport failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status from the provider
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Model output did not match the expected document
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LlmError {
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }

    /// Transport errors and server-side failures may succeed on a later run
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Whether a provider error message describes a quota problem
pub fn is_quota_message(message: &str) -> bool {
    message.contains("quota") || message.contains("429") || message.contains("insufficient_quota")
}

/// Source of AI-generated analysis documents
#[async_trait]
pub trait InsightSource: Send + Sync {
    /// Run the full niche analysis prompt
    async fn analyze_niches(&self) -> Result<NicheAnalysis, LlmError>;

    /// Run the trending categories prompt
    async fn trending_report(&self) -> Result<TrendingReport, LlmError>;

    /// Replace the API key used for subsequent calls
    async fn set_api_key(&self, api_key: String);

    /// Whether an API key is currently configured
    async fn has_api_key(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// OpenAI chat completions client
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    api_key: Arc<RwLock<Option<String>>>,
}

impl LlmClient {
    /// Create a new LLM client with custom config
    pub fn with_config(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("nichepulse/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let api_key = Arc::new(RwLock::new(config.api_key.clone()));
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        Self::with_config(LlmConfig::from_env())
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one system+user exchange and decode the JSON answer
    async fn complete_json<T: DeserializeOwned>(
        &self,
        what: &'static str,
        system: &str,
        user: &str,
    ) -> Result<T, LlmError> {
        let api_key = self
            .api_key
            .read()
            .await
            .clone()
            .ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: self.config.temperature,
        };

        let _timer = crate::metrics::start_llm_timer(what);
        tracing::debug!(model = %self.config.model, what, "Sending chat completion request");

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let chat: ChatResponse = response.json().await.map_err(classify_transport)?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "{}".to_string());

        let json = extract_json(&content);
        tracing::debug!("Extracted JSON: {}", truncate(&json, 500));

        serde_json::from_str(&json).map_err(|source| LlmError::Decode { what, source })
    }
}

#[async_trait]
impl InsightSource for LlmClient {
    async fn analyze_niches(&self) -> Result<NicheAnalysis, LlmError> {
        self.complete_json("niche analysis", prompts::ANALYSIS_SYSTEM, prompts::ANALYSIS_USER)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error analyzing YouTube niches"))
    }

    async fn trending_report(&self) -> Result<TrendingReport, LlmError> {
        self.complete_json("trending data", prompts::TRENDING_SYSTEM, prompts::TRENDING_USER)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error getting trending data"))
    }

    async fn set_api_key(&self, api_key: String) {
        *self.api_key.write().await = Some(api_key);
        tracing::info!("OpenAI API key updated");
    }

    async fn has_api_key(&self) -> bool {
        self.api_key.read().await.is_some()
    }
}

fn classify_transport(err: reqwest::Error) -> LlmError {
    if err.status() == Some(StatusCode::TOO_MANY_REQUESTS) || is_quota_message(&err.to_string()) {
        LlmError::QuotaExceeded
    } else {
        LlmError::Request(err)
    }
}

fn classify_status(status: StatusCode, body: &str) -> LlmError {
    let detail = serde_json::from_str::<ApiErrorEnvelope>(body).ok().map(|e| e.error);

    let mentions_quota = detail.as_ref().is_some_and(|d| {
        is_quota_message(&d.message)
            || d.kind.as_deref().is_some_and(is_quota_message)
            || d.code.as_deref().is_some_and(is_quota_message)
    });

    if status == StatusCode::TOO_MANY_REQUESTS || mentions_quota {
        return LlmError::QuotaExceeded;
    }

    let message = match detail {
        Some(d) if !d.message.is_empty() => d.message,
        _ => truncate(body, 200).to_string(),
    };

    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extract JSON from markdown code blocks or surrounding prose
fn extract_json(text: &str) -> String {
    // JSON mode answers with a bare object; string values may contain fences
    let trimmed = text.trim();
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return trimmed.to_string();
    }

    // Try to find JSON in code block
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim().to_string();
        }
    }

    // Generic code block; skip the language identifier line
    if let Some(start) = text.find("```") {
        let after_start = &text[start + 3..];
        let content_start = after_start.find('\n').map_or(0, |i| i + 1);
        if let Some(end) = after_start[content_start..].find("```") {
            return after_start[content_start..content_start + end]
                .trim()
                .to_string();
        }
    }

    // Raw JSON object
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return text[start..=end].to_string();
        }
    }

    text.trim().to_string()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
