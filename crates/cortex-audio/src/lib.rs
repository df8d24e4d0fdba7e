#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Audio adapters: transcription, classification, and music generation

mod server;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    routing::post,
};
use cortex_core::{JsonBody, ProxyError, read_upload};

pub use server::Server;
pub use types::{Classification, GenerationRequest};

/// Build the audio server from configuration
///
/// # Errors
///
/// Returns an error if the upstream client fails to initialize
pub fn build_server(config: &cortex_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Server::from_config(config).map_err(|e| anyhow::anyhow!("Failed to initialize audio server: {e}"))?;
    Ok(Arc::new(server))
}

/// Create the endpoint router for audio tasks
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/audio/transcription", post(transcribe))
        .route("/api/audio/classification", post(classify))
        .route("/api/audio/generation", post(generate))
}

/// Handle speech-to-text requests (multipart `audio` file)
async fn transcribe(
    State(server): State<Arc<Server>>,
    multipart: Multipart,
) -> cortex_core::Result<Json<serde_json::Value>> {
    let form = read_upload(multipart, "audio").await?;
    let audio = form
        .file
        .ok_or_else(|| ProxyError::Validation("No audio file provided".to_owned()))?;

    tracing::debug!(bytes = audio.bytes.len(), "transcription request");

    let result = server.transcribe(audio.bytes, &audio.content_type).await?;

    Ok(Json(result))
}

/// Handle audio classification requests (multipart `audio` file)
///
/// Results are sorted by score descending.
async fn classify(
    State(server): State<Arc<Server>>,
    multipart: Multipart,
) -> cortex_core::Result<Json<Vec<Classification>>> {
    let form = read_upload(multipart, "audio").await?;
    let audio = form
        .file
        .ok_or_else(|| ProxyError::Validation("No audio file provided".to_owned()))?;

    let results = server.classify(audio.bytes, &audio.content_type).await?;

    Ok(Json(results))
}

/// Handle music generation requests; responds with raw `audio/wav`
async fn generate(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<GenerationRequest>,
) -> cortex_core::Result<Response> {
    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ProxyError::Validation("No prompt provided".to_owned()))?;

    let audio = server.generate(&prompt).await?;

    Ok(([(http::header::CONTENT_TYPE, "audio/wav")], audio).into_response())
}
