#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Vision adapters: captioning, classification, detection, segmentation,
//! and multimodal image chat

mod server;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::HeaderMap,
    routing::post,
};
use bytes::Bytes;
use cortex_core::{JsonBody, ProxyError, read_upload};
use serde_json::{Value, json};

pub use server::Server;
pub use types::{ImageChatRequest, Segment, Segmentation};

/// Build the vision server from configuration
///
/// # Errors
///
/// Returns an error if an upstream client fails to initialize
pub fn build_server(config: &cortex_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Server::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize vision server: {e}"))?;
    Ok(Arc::new(server))
}

/// Create the endpoint router for vision tasks
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/vision/caption", post(caption))
        .route("/api/vision/classification", post(classify))
        .route("/api/vision/object-detection", post(detect_objects))
        .route("/api/vision/segmentation", post(segment))
        .route("/api/vision/chat", post(describe))
}

async fn caption(
    State(server): State<Arc<Server>>,
    multipart: Multipart,
) -> cortex_core::Result<Json<Value>> {
    let form = read_upload(multipart, "image").await?;
    let image = form
        .file
        .ok_or_else(|| ProxyError::Validation("No image provided".to_owned()))?;

    Ok(Json(server.caption(image.bytes, &image.content_type).await?))
}

/// Classification takes the image as the raw request body rather than a
/// multipart form
async fn classify(
    State(server): State<Arc<Server>>,
    headers: HeaderMap,
    body: Bytes,
) -> cortex_core::Result<Json<Value>> {
    if body.is_empty() {
        return Err(ProxyError::Validation("Image data required".to_owned()));
    }

    let content_type = headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_owned();

    tracing::debug!(bytes = body.len(), %content_type, "image classification request");

    Ok(Json(server.classify(body, &content_type).await?))
}

async fn detect_objects(
    State(server): State<Arc<Server>>,
    multipart: Multipart,
) -> cortex_core::Result<Json<Value>> {
    let form = read_upload(multipart, "image").await?;
    let image = form
        .file
        .ok_or_else(|| ProxyError::Validation("Image file is required".to_owned()))?;

    Ok(Json(server.detect_objects(image.bytes, &image.content_type).await?))
}

async fn segment(
    State(server): State<Arc<Server>>,
    multipart: Multipart,
) -> cortex_core::Result<Json<Segmentation>> {
    let form = read_upload(multipart, "image").await?;
    let image = form
        .file
        .ok_or_else(|| ProxyError::Validation("Image file is required".to_owned()))?;

    Ok(Json(server.segment(image.bytes, &image.content_type).await?))
}

async fn describe(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<ImageChatRequest>,
) -> cortex_core::Result<Json<Value>> {
    let image = request
        .image_base64
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| ProxyError::Validation("Image is required".to_owned()))?;

    let text = server.describe(&image, request.prompt).await?;

    Ok(Json(json!({ "text": text })))
}
