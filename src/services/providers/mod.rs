/// Text-generation provider abstraction
///
/// The assisted picker only needs one thing from a language model: given a
/// prompt listing candidates, name one of them. Each backend implements that
/// behind `TextGenerator` so the selector stays testable and swappable.
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::{AiProvider, Config};

pub mod huggingface;

pub use huggingface::HuggingFaceProvider;

/// What the model is asked to answer with
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_reason")]
    pub reason: Option<String>,
}

/// Keeps `reason` only when the model sent it as a string
fn deserialize_reason<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(reason) => Some(reason),
        _ => None,
    })
}

/// Every way a generation call can fail; callers treat them all the same
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether a credential is available; without one no request is attempted
    fn has_credential(&self) -> bool;

    /// Sends the prompt and extracts the suggested title from the reply
    async fn suggest(&self, prompt: &str) -> Result<Suggestion, GenerationError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the generator selected in configuration
pub fn build_generator(config: &Config) -> Arc<dyn TextGenerator> {
    match config.ai_provider {
        AiProvider::HuggingFace => Arc::new(HuggingFaceProvider::new(
            config.ai_endpoint.clone(),
            config.ai_model.clone(),
            config.ai_api_key.clone(),
            config.ai_timeout(),
        )),
    }
}

/// Parses the first brace-delimited JSON object in free text as a suggestion
///
/// Parsing starts at the first `{` and stops at the end of that object, so a
/// reply may wrap it in prose or code fences.
pub fn extract_suggestion(text: &str) -> Result<Suggestion, GenerationError> {
    let start = text
        .find('{')
        .ok_or_else(|| GenerationError::Malformed("no JSON object in reply".to_string()))?;

    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Suggestion>()
        .next()
        .ok_or_else(|| GenerationError::Malformed("no JSON object in reply".to_string()))?
        .map_err(|e| GenerationError::Malformed(format!("unparseable JSON object: {}", e)))
}
