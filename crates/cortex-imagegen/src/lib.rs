#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Text-to-image adapters returning data-URI encoded results

mod server;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use cortex_core::{JsonBody, ProxyError};
use serde::Deserialize;
use serde_json::{Value, json};

pub use server::{Backend, Server};

/// Request body for image generation
///
/// The browser client sends `{prompt}`; older callers send the provider
/// wire shape `{inputs}` directly. Both are accepted, `prompt` winning.
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: Option<String>,
    pub inputs: Option<String>,
}

impl ImageRequest {
    fn into_prompt(self) -> Option<String> {
        self.prompt
            .or(self.inputs)
            .filter(|p| !p.trim().is_empty())
    }
}

/// Build the image generation server from configuration
///
/// # Errors
///
/// Returns an error if the upstream client fails to initialize
pub fn build_server(config: &cortex_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Server::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize image generation server: {e}"))?;
    Ok(Arc::new(server))
}

/// Create the endpoint router for image generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/images/stable-diffusion", post(stable_diffusion))
        .route("/api/images/flux", post(flux))
}

async fn stable_diffusion(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<ImageRequest>,
) -> cortex_core::Result<Json<Value>> {
    generate(&server, Backend::StableDiffusion, request).await
}

async fn flux(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<ImageRequest>,
) -> cortex_core::Result<Json<Value>> {
    generate(&server, Backend::Flux, request).await
}

async fn generate(server: &Server, backend: Backend, request: ImageRequest) -> cortex_core::Result<Json<Value>> {
    let prompt = request
        .into_prompt()
        .ok_or_else(|| ProxyError::Validation("Prompt is required".to_owned()))?;

    let image = server.generate(backend, &prompt).await?;

    Ok(Json(json!({ "image": image })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_field_wins_over_inputs() {
        let request: ImageRequest =
            serde_json::from_str(r#"{"prompt": "a cat", "inputs": "a dog"}"#).unwrap();
        assert_eq!(request.into_prompt().as_deref(), Some("a cat"));
    }

    #[test]
    fn inputs_field_accepted_alone() {
        let request: ImageRequest = serde_json::from_str(r#"{"inputs": "a dog"}"#).unwrap();
        assert_eq!(request.into_prompt().as_deref(), Some("a dog"));
    }

    #[test]
    fn blank_prompt_rejected() {
        let request: ImageRequest = serde_json::from_str(r#"{"prompt": "   "}"#).unwrap();
        assert!(request.into_prompt().is_none());
    }
}
