/// Hugging Face Inference API provider
///
/// One POST per suggestion to `{api_url}/{model}` with a bearer token and a
/// `{"inputs": prompt}` body. The reply is a JSON array whose first element
/// carries the model output in `generated_text`; the suggestion object is
/// fished out of that text.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;

use super::{extract_suggestion, GenerationError, Suggestion, TextGenerator};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Clone)]
pub struct HuggingFaceProvider {
    http_client: HttpClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HuggingFaceProvider {
    pub fn new(api_url: String, model: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            model,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout,
        }
    }

    fn model_url(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), self.model)
    }

    /// Calls the inference endpoint and returns the raw generated text
    async fn call_api(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let url = self.model_url();

        tracing::debug!(url = %url, prompt_bytes = prompt.len(), "Requesting suggestion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                body = %body,
                model = %self.model,
                "Inference request failed"
            );
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        parse_generated_text(&body)
    }
}

fn map_transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Network(e.to_string())
    }
}

/// Reads `generated_text` from the first element; later elements are ignored
fn parse_generated_text(body: &str) -> Result<String, GenerationError> {
    let generations: Vec<Value> = serde_json::from_str(body).map_err(|e| {
        tracing::debug!(error = %e, body = %body, "Unexpected inference response shape");
        GenerationError::Malformed(format!("unexpected response shape: {}", e))
    })?;

    let first = generations
        .first()
        .ok_or_else(|| GenerationError::Malformed("empty generation list".to_string()))?;

    first
        .get("generated_text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            GenerationError::Malformed("first generation has no generated_text".to_string())
        })
}

#[async_trait::async_trait]
impl TextGenerator for HuggingFaceProvider {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn suggest(&self, prompt: &str) -> Result<Suggestion, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        // Dropping the future on expiry aborts the in-flight request
        let text = tokio::time::timeout(self.timeout, self.call_api(api_key, prompt))
            .await
            .map_err(|_| GenerationError::Timeout)??;

        let suggestion = extract_suggestion(&text)?;

        tracing::info!(
            model = %self.model,
            title = %suggestion.title,
            provider = "huggingface",
            "Suggestion received"
        );

        Ok(suggestion)
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
