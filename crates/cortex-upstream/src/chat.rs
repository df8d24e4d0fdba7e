use std::time::Duration;

use cortex_core::ProxyError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

/// Default request timeout for chat completions
const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// One message in a chat-completion conversation
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: ChatContent,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: ChatContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }

    /// Multimodal user message: a text part plus an image part
    ///
    /// The image URL may be a data URI, which is how the vision-chat
    /// adapter forwards browser-uploaded images.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: ChatContent::Parts(vec![
                ChatPart::Text { text: text.into() },
                ChatPart::ImageUrl {
                    image_url: ImageUrl { url: image_url.into() },
                },
            ]),
        }
    }
}

/// Plain-text or multimodal message content
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ChatPart>),
}

/// One part of a multimodal message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Wire format for the chat-completion request
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Client for the OpenAI-style chat-completion gateway
///
/// Single attempt per request: the gateway fronts warm models, so the
/// cold-start retry budget does not apply here.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    referer: Option<String>,
    title: Option<String>,
}

impl ChatClient {
    /// Build from gateway configuration
    ///
    /// Returns `ProxyError::Configuration` when no credential is set.
    pub fn from_config(config: &cortex_config::ChatConfig) -> cortex_core::Result<Self> {
        let api_key = config
            .credential()
            .cloned()
            .ok_or_else(|| ProxyError::Configuration("Chat gateway API key not configured".to_owned()))?;

        let client = Client::builder()
            .timeout(CHAT_TIMEOUT)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProxyError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    /// Run one completion and extract `choices[0].message.content`
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
    ) -> cortex_core::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model,
            messages,
            max_tokens,
        };

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request);

        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(%model, %e, "chat gateway request failed to send");
            ProxyError::Connection(format!("Failed to reach chat gateway: {e}"))
        })?;

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(ProxyError::Normalization(format!(
                    "failed to parse chat gateway response: {e}"
                )));
            }
            Err(_) => Value::Null,
        };

        if !status.is_success() {
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("API responded with status {}", status.as_u16()));
            tracing::error!(%model, status = status.as_u16(), %message, "chat gateway error");
            return Err(ProxyError::UpstreamApi {
                status: Some(status.as_u16()),
                message,
            });
        }

        // Some gateways report failures inside an otherwise-200 body
        if body.get("error").is_some() {
            let message = upstream_message(&body).unwrap_or_else(|| "Chat gateway reported an error".to_owned());
            return Err(ProxyError::Normalization(message));
        }

        extract_content(&body)
            .ok_or_else(|| ProxyError::Normalization("Invalid response format from chat gateway".to_owned()))
    }
}

/// Pull `error.message` (or a bare string `error`) out of an error body
fn upstream_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if let Some(message) = error.get("message").and_then(Value::as_str) {
        return Some(message.to_owned());
    }
    error.as_str().map(str::to_owned)
}

/// `choices[0].message.content` as text
fn extract_content(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_owned)
}
