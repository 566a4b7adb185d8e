//! Poem Generation
//!
//! Builds generation requests from a topic and persona, sends them to a local
//! Ollama server, and normalizes the outcome. Failures are carried as a typed
//! [`GenerationError`] whose `Display` output is the text shown in place of a
//! poem, so callers can either branch on the error or render it directly.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::style;

/// Default Ollama generation endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistral:latest";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Body of a single non-streaming generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Ways a generation call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The request never produced a usable body: refused, timed out, or undecodable.
    #[error("⚠️ Connection Error: Is Ollama running? (Error: {0})")]
    Transport(String),
    #[error("Error: Ollama returned status {0}")]
    Status(u16),
    #[error("Error: No response text found.")]
    MissingResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A backend that turns a [`GenerationRequest`] into poem text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoemGenerator: Send + Sync {
    /// Makes exactly one attempt; no retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Connection settings for [`OllamaClient`].
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`PoemGenerator`] backed by Ollama's `/api/generate`.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint URL and the timeout applied to every request.
    pub fn new(config: OllamaConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PoemGenerator for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "Sending generation request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Ollama returned a non-success status");
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        body.response.ok_or(GenerationError::MissingResponse)
    }
}

/// Builds the full prompt sent to the model.
pub fn compose_prompt(topic: &str, style_label: &str) -> String {
    format!(
        "System: {}\nUser: Write a poem about {}. Return ONLY the poem text, no intro.",
        style::resolve(style_label),
        topic
    )
}

/// The canned poem returned in mock mode.
pub fn mock_poem(topic: &str, style_label: &str) -> String {
    format!(
        "(Mock {} Poem about {})\nIn the digital void,\nWeaving codes of light and sound,\nThe system awakens.",
        style_label, topic
    )
}

/// Front door for poem generation: owns the backend and the current model.
#[derive(Clone)]
pub struct Muse {
    generator: Arc<dyn PoemGenerator>,
    model: String,
}

impl Muse {
    pub fn new(generator: Arc<dyn PoemGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Switches the model used by subsequent requests.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        info!(model = %self.model, "Switched model");
    }

    pub fn build_request(&self, topic: &str, style_label: &str) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            prompt: compose_prompt(topic, style_label),
            stream: false,
        }
    }

    /// Generates a poem, keeping failures typed.
    ///
    /// With `use_mock` set, returns [`mock_poem`] without touching the backend.
    /// `topic` is expected to be non-empty; it is not checked here.
    pub async fn compose(
        &self,
        topic: &str,
        style_label: &str,
        use_mock: bool,
    ) -> Result<String, GenerationError> {
        let request = self.build_request(topic, style_label);
        if use_mock {
            debug!(topic = %topic, style = %style_label, "Mock mode, skipping backend");
            return Ok(mock_poem(topic, style_label));
        }
        info!(topic = %topic, style = %style_label, model = %self.model, "Composing poem");
        self.generator.generate(&request).await
    }

    /// Generates a poem and flattens any failure into its display text.
    pub async fn generate(&self, topic: &str, style_label: &str, use_mock: bool) -> String {
        match self.compose(topic, style_label, use_mock).await {
            Ok(poem) => poem,
            Err(e) => {
                warn!(error = %e, "Poem generation failed");
                e.to_string()
            }
        }
    }
}
