use bytes::Bytes;
use cortex_core::{ProxyError, Result};
use cortex_upstream::{InferenceClient, RetryPolicy};
use serde_json::{Value, json};

use crate::types::Classification;

/// Audio gateway state: the inference client plus the models it targets
pub struct Server {
    inference: Option<InferenceClient>,
    transcription_model: String,
    classification_model: String,
    generation_model: String,
}

impl Server {
    pub fn from_config(config: &cortex_config::Config) -> Result<Self> {
        let inference = match config.inference.credential() {
            Some(_) => Some(InferenceClient::from_config(&config.inference)?),
            None => None,
        };

        Ok(Self {
            inference,
            transcription_model: config.models.transcription.clone(),
            classification_model: config.models.audio_classification.clone(),
            generation_model: config.models.audio_generation.clone(),
        })
    }

    fn inference(&self) -> Result<&InferenceClient> {
        self.inference.as_ref().ok_or_else(|| {
            ProxyError::Configuration("Inference API key not configured".to_owned())
        })
    }

    /// Transcribe speech audio; the model response is passed through as-is
    ///
    /// Whisper-class models can spend minutes on long clips, so this uses
    /// the long-running policy with linear backoff.
    pub(crate) async fn transcribe(&self, audio: Bytes, content_type: &str) -> Result<Value> {
        self.inference()?
            .post_bytes(
                &self.transcription_model,
                audio,
                content_type,
                &RetryPolicy::long_running(),
            )
            .await
    }

    /// Classify an audio clip, returning labels sorted by score descending
    pub(crate) async fn classify(
        &self,
        audio: Bytes,
        content_type: &str,
    ) -> Result<Vec<Classification>> {
        let value = self
            .inference()?
            .post_bytes(
                &self.classification_model,
                audio,
                content_type,
                &RetryPolicy::classification(),
            )
            .await?;

        let mut results: Vec<Classification> = serde_json::from_value(value).map_err(|e| {
            ProxyError::Normalization(format!("Unexpected classification response: {e}"))
        })?;
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(results)
    }

    /// Generate music from a text prompt, returning raw audio bytes
    pub(crate) async fn generate(&self, prompt: &str) -> Result<Bytes> {
        self.inference()?
            .post_json_for_bytes(
                &self.generation_model,
                &json!({ "inputs": prompt }),
                &RetryPolicy::single(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> cortex_config::Config {
        toml::from_str(
            r#"
            [inference]
            api_key = "hf-test"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn builds_with_credential() {
        let server = Server::from_config(&config_with_key()).unwrap();
        assert!(server.inference().is_ok());
    }

    #[test]
    fn missing_credential_is_configuration_error() {
        let config: cortex_config::Config = toml::from_str("").unwrap();
        let server = Server::from_config(&config).unwrap();

        assert!(matches!(
            server.inference(),
            Err(ProxyError::Configuration(_))
        ));
    }

    #[test]
    fn classification_results_sort_descending() {
        let mut results = vec![
            Classification { label: "Speech".to_owned(), score: 0.12 },
            Classification { label: "Music".to_owned(), score: 0.81 },
            Classification { label: "Silence".to_owned(), score: 0.07 },
        ];
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        let labels: Vec<&str> = results.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Music", "Speech", "Silence"]);
    }
}
