use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Default base URL for the inference provider
const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Default base URL for the chat-completion gateway
const DEFAULT_CHAT_URL: &str = "https://openrouter.ai/api/v1";

/// Inference provider configuration (per-model POST endpoints)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Bearer token; empty or absent leaves the provider unconfigured
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_inference_url")]
    pub base_url: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_inference_url(),
        }
    }
}

impl InferenceConfig {
    /// Configured credential, treating an empty string as absent
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().is_empty())
    }
}

/// Chat-completion gateway configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Bearer token; empty or absent leaves the gateway unconfigured
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_chat_url")]
    pub base_url: String,
    /// Sent as `HTTP-Referer` when present (gateway attribution)
    #[serde(default)]
    pub referer: Option<String>,
    /// Sent as `X-Title` when present
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_chat_url(),
            referer: None,
            title: None,
        }
    }
}

impl ChatConfig {
    /// Configured credential, treating an empty string as absent
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().is_empty())
    }
}

fn default_inference_url() -> String {
    DEFAULT_INFERENCE_URL.to_string()
}

fn default_chat_url() -> String {
    DEFAULT_CHAT_URL.to_string()
}
