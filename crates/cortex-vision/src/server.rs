use bytes::Bytes;
use cortex_core::{ProxyError, Result};
use cortex_upstream::{ChatClient, ChatMessage, InferenceClient, RetryPolicy};
use serde_json::Value;

use crate::types::{Segmentation, project_segments};

/// Token cap for image chat completions
const IMAGE_CHAT_MAX_TOKENS: u32 = 500;

/// Fallback prompt when the caller sends an image without one
const DEFAULT_IMAGE_PROMPT: &str = "Describe this image in one sentence.";

/// Vision gateway state
pub struct Server {
    inference: Option<InferenceClient>,
    chat: Option<ChatClient>,
    caption_model: String,
    classification_model: String,
    detection_model: String,
    segmentation_model: String,
    chat_model: String,
}

impl Server {
    pub fn from_config(config: &cortex_config::Config) -> Result<Self> {
        let inference = match config.inference.credential() {
            Some(_) => Some(InferenceClient::from_config(&config.inference)?),
            None => None,
        };
        let chat = match config.chat.credential() {
            Some(_) => Some(ChatClient::from_config(&config.chat)?),
            None => None,
        };

        Ok(Self {
            inference,
            chat,
            caption_model: config.models.caption.clone(),
            classification_model: config.models.image_classification.clone(),
            detection_model: config.models.object_detection.clone(),
            segmentation_model: config.models.segmentation.clone(),
            chat_model: config.models.vision_chat.clone(),
        })
    }

    fn inference(&self) -> Result<&InferenceClient> {
        self.inference.as_ref().ok_or_else(|| {
            ProxyError::Configuration("Inference API key not configured".to_owned())
        })
    }

    fn chat(&self) -> Result<&ChatClient> {
        self.chat
            .as_ref()
            .ok_or_else(|| ProxyError::Configuration("Chat gateway API key not configured".to_owned()))
    }

    pub(crate) async fn caption(&self, image: Bytes, content_type: &str) -> Result<Value> {
        self.inference()?
            .post_bytes(&self.caption_model, image, content_type, &RetryPolicy::single())
            .await
    }

    pub(crate) async fn classify(&self, image: Bytes, content_type: &str) -> Result<Value> {
        self.inference()?
            .post_bytes(
                &self.classification_model,
                image,
                content_type,
                &RetryPolicy::single(),
            )
            .await
    }

    /// Detection models cold-start; retry on the fixed-delay budget
    pub(crate) async fn detect_objects(&self, image: Bytes, content_type: &str) -> Result<Value> {
        self.inference()?
            .post_bytes(
                &self.detection_model,
                image,
                content_type,
                &RetryPolicy::cold_start(),
            )
            .await
    }

    /// Segment an image, re-projecting the row-per-segment response into
    /// aligned label/mask/score columns
    pub(crate) async fn segment(&self, image: Bytes, content_type: &str) -> Result<Segmentation> {
        let raw = self
            .inference()?
            .post_bytes(
                &self.segmentation_model,
                image,
                content_type,
                &RetryPolicy::cold_start(),
            )
            .await?;

        project_segments(raw)
            .map_err(|e| ProxyError::Normalization(format!("Unexpected segmentation response: {e}")))
    }

    /// Describe or answer a question about an image via the chat gateway
    pub(crate) async fn describe(&self, image_data_uri: &str, prompt: Option<String>) -> Result<String> {
        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_owned());
        let message = ChatMessage::user_with_image(prompt, image_data_uri);

        self.chat()?
            .complete(&self.chat_model, &[message], Some(IMAGE_CHAT_MAX_TOKENS))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_providers_fail_lazily() {
        let config: cortex_config::Config = toml::from_str("").unwrap();
        let server = Server::from_config(&config).unwrap();

        assert!(matches!(server.inference(), Err(ProxyError::Configuration(_))));
        assert!(matches!(server.chat(), Err(ProxyError::Configuration(_))));
    }
}
