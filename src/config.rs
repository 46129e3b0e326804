use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Text-generation backends the assisted picker can talk to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    HuggingFace,
}

/// Application configuration loaded from environment variables
///
/// Every field has a compiled-in default, so an empty environment yields a
/// working (random-only) picker.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the persisted show blob
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_ai_provider")]
    pub ai_provider: AiProvider,

    /// Bearer token for the text-generation endpoint
    #[serde(default)]
    pub ai_api_key: Option<String>,

    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    /// Base URL; the model identifier is appended as the last path segment
    #[serde(default = "default_ai_endpoint")]
    pub ai_endpoint: String,

    /// Candidates listed in the prompt, after filtering
    #[serde(default = "default_ai_max_candidates")]
    pub ai_max_candidates: usize,

    /// Prompts at or above this size are never sent
    #[serde(default = "default_ai_max_prompt_bytes")]
    pub ai_max_prompt_bytes: usize,

    #[serde(default = "default_ai_timeout_ms")]
    pub ai_timeout_ms: u64,

    /// Detail view of the main application; receives `?title=...`
    #[serde(default = "default_detail_url")]
    pub detail_url: String,

    /// Target of the page's back button
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_ai_provider() -> AiProvider {
    AiProvider::HuggingFace
}

fn default_ai_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.2".to_string()
}

fn default_ai_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_ai_max_candidates() -> usize {
    40
}

fn default_ai_max_prompt_bytes() -> usize {
    6000
}

fn default_ai_timeout_ms() -> u64 {
    12_000
}

fn default_detail_url() -> String {
    "/shows/detail".to_string()
}

fn default_app_url() -> String {
    "/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            ai_provider: default_ai_provider(),
            ai_api_key: None,
            ai_model: default_ai_model(),
            ai_endpoint: default_ai_endpoint(),
            ai_max_candidates: default_ai_max_candidates(),
            ai_max_prompt_bytes: default_ai_max_prompt_bytes(),
            ai_timeout_ms: default_ai_timeout_ms(),
            detail_url: default_detail_url(),
            app_url: default_app_url(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_millis(self.ai_timeout_ms)
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
