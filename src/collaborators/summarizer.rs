//! Entity-at-a-time prose summaries from an OpenAI-compatible chat endpoint.
//!
//! The summarizer only ever sees finished [`SemanticEntity`] values, so a
//! failing or unreachable backend cannot affect the semantic model itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{EntityKind, SemanticEntity, SemanticModel};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl SummarizerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("no API key configured for the summarization backend")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarization backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("summarization backend returned no content")]
    EmptyResponse,
}

/// Produces free-text prose for one entity. No determinism or latency guarantee.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, entity: &SemanticEntity) -> Result<String, SummarizeError>;
}

/// Prompt sent to the backend for `entity`.
pub fn build_prompt(entity: &SemanticEntity) -> String {
    match &entity.kind {
        EntityKind::Class {
            base_classes,
            methods,
        } => {
            let bases = if base_classes.is_empty() {
                "no base class".to_string()
            } else {
                base_classes.join(", ")
            };
            let mut prompt = format!(
                "Summarize the following class for documentation purposes:\n\n\
                 Class Name: {}\nBase Classes: {}\nMethods:\n",
                entity.name, bases
            );
            for method in methods {
                let _ = writeln!(prompt, "- {}({})", method.name, method.parameters.join(", "));
            }
            prompt
        }
        EntityKind::Function { parameters } => format!(
            "Summarize the purpose of the following function:\nFunction: {}({})",
            entity.name,
            parameters.join(", ")
        ),
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

pub struct ChatCompletionSummarizer {
    client: reqwest::Client,
    config: SummarizerConfig,
}

impl ChatCompletionSummarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizeError> {
        if config.api_key.trim().is_empty() {
            return Err(SummarizeError::MissingApiKey);
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Summarizer for ChatCompletionSummarizer {
    async fn summarize(&self, entity: &SemanticEntity) -> Result<String, SummarizeError> {
        let prompt = build_prompt(entity);
        let request = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        debug!(entity = %entity.name, model = %self.config.model, "requesting summary");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizeError::EmptyResponse)
    }
}

#[derive(Debug)]
pub struct EntitySummary {
    pub name: String,
    pub entity_type: &'static str,
    pub outcome: Result<String, SummarizeError>,
}

/// Summarize each entity in model order; one failure does not stop the rest.
pub async fn summarize_model(
    summarizer: &dyn Summarizer,
    model: &SemanticModel,
) -> Vec<EntitySummary> {
    let mut summaries = Vec::with_capacity(model.len());
    for entity in model {
        let outcome = summarizer.summarize(entity).await;
        if let Err(err) = &outcome {
            warn!(entity = %entity.name, "summary failed: {err}");
        }
        summaries.push(EntitySummary {
            name: entity.name.clone(),
            entity_type: entity.entity_type(),
            outcome,
        });
    }
    summaries
}
