use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cortex_core::{ProxyError, Result};
use cortex_upstream::{InferenceClient, RetryPolicy};
use serde_json::json;

/// Image generation gateway state
pub struct Server {
    inference: Option<InferenceClient>,
    stable_diffusion_model: String,
    flux_model: String,
}

/// Which diffusion model backs the request
#[derive(Clone, Copy)]
pub enum Backend {
    StableDiffusion,
    Flux,
}

impl Server {
    pub fn from_config(config: &cortex_config::Config) -> Result<Self> {
        let inference = match config.inference.credential() {
            Some(_) => Some(InferenceClient::from_config(&config.inference)?),
            None => None,
        };

        Ok(Self {
            inference,
            stable_diffusion_model: config.models.stable_diffusion.clone(),
            flux_model: config.models.flux.clone(),
        })
    }

    fn inference(&self) -> Result<&InferenceClient> {
        self.inference.as_ref().ok_or_else(|| {
            ProxyError::Configuration("Inference API key not configured".to_owned())
        })
    }

    /// Generate an image and return it as a base64 data URI
    ///
    /// The media type is always `image/jpeg`, regardless of the actual
    /// bytes; the browser client keys off the data-URI prefix alone.
    pub(crate) async fn generate(&self, backend: Backend, prompt: &str) -> Result<String> {
        let model = match backend {
            Backend::StableDiffusion => &self.stable_diffusion_model,
            Backend::Flux => &self.flux_model,
        };

        tracing::debug!(%model, prompt_len = prompt.len(), "image generation request");

        let image = self
            .inference()?
            .post_json_for_bytes(model, &json!({ "inputs": prompt }), &RetryPolicy::single())
            .await?;

        Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_is_configuration_error() {
        let config: cortex_config::Config = toml::from_str("").unwrap();
        let server = Server::from_config(&config).unwrap();

        assert!(matches!(server.inference(), Err(ProxyError::Configuration(_))));
    }
}
