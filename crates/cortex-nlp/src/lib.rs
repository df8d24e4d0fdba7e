#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Text adapters: thirteen NLP tasks split between the per-model inference
//! provider and the chat-completion gateway

mod server;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use cortex_core::{JsonBody, ProxyError, read_upload};
use serde_json::{Value, json};

pub use server::Server;
pub use types::{
    GenerateRequest, HistoryMessage, QaRequest, Sentences, SimilarityRequest, TableQaRequest,
    TextRequest, TranslationRequest, ZeroShotRequest,
};

/// Build the NLP server from configuration
///
/// # Errors
///
/// Returns an error if an upstream client fails to initialize
pub fn build_server(config: &cortex_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Server::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize NLP server: {e}"))?;
    Ok(Arc::new(server))
}

/// Create the endpoint router for NLP tasks
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/nlp/feature-extraction", post(extract_features))
        .route("/api/nlp/fill-mask", post(fill_mask))
        .route("/api/nlp/question-answering", post(answer_question))
        .route("/api/nlp/table-qa", post(answer_table_question))
        .route("/api/nlp/pdf-qa", post(answer_pdf_question))
        .route("/api/nlp/sentence-similarity", post(score_similarity))
        .route("/api/nlp/sentiment-analysis", post(analyze_sentiment))
        .route("/api/nlp/summarization", post(summarize))
        .route("/api/nlp/translation", post(translate))
        .route("/api/nlp/text-generation", post(generate_text))
        .route("/api/nlp/text-to-text", post(text_to_text))
        .route("/api/nlp/token-classification", post(classify_tokens))
        .route("/api/nlp/zero-shot", post(classify_zero_shot))
}

fn require(value: Option<String>, message: &str) -> cortex_core::Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ProxyError::Validation(message.to_owned()))
}

async fn extract_features(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TextRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "Text input is required")?;
    Ok(Json(server.extract_features(&text).await?))
}

async fn fill_mask(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TextRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "No text provided")?;
    Ok(Json(server.fill_mask(&text).await?))
}

async fn answer_question(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<QaRequest>,
) -> cortex_core::Result<Json<Value>> {
    let question = require(request.question, "Both question and context are required")?;
    let context = require(request.context, "Both question and context are required")?;
    Ok(Json(server.answer_question(&question, &context).await?))
}

/// Table QA: the table arrives as an object or as a JSON-encoded string
async fn answer_table_question(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TableQaRequest>,
) -> cortex_core::Result<Json<Value>> {
    let question = require(request.question, "Table data and question are required")?;
    let table = request
        .table
        .filter(|t| !t.is_null())
        .ok_or_else(|| ProxyError::Validation("Table data and question are required".to_owned()))?;

    let table = match table {
        Value::String(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| ProxyError::Validation(format!("Table is not valid JSON: {e}")))?,
        other => other,
    };

    Ok(Json(server.answer_table_question(&table, &question).await?))
}

/// PDF QA: multipart `pdf` file plus a `question` text field
async fn answer_pdf_question(
    State(server): State<Arc<Server>>,
    multipart: Multipart,
) -> cortex_core::Result<Json<Value>> {
    let form = read_upload(multipart, "pdf").await?;
    let pdf = form
        .file
        .ok_or_else(|| ProxyError::Validation("PDF file and question are required".to_owned()))?;
    let question = require(
        form.fields.get("question").cloned(),
        "PDF file and question are required",
    )?;

    tracing::debug!(bytes = pdf.bytes.len(), "pdf question");

    let answer = server.answer_pdf_question(&pdf.bytes, &question).await?;

    Ok(Json(json!({ "answer": answer })))
}

async fn score_similarity(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<SimilarityRequest>,
) -> cortex_core::Result<Json<Value>> {
    let source = require(
        request.source_sentence,
        "Source sentence and comparison sentences are required",
    )?;
    let sentences = request
        .comparison_sentences
        .map(Sentences::into_vec)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ProxyError::Validation("Source sentence and comparison sentences are required".to_owned())
        })?;

    Ok(Json(server.similarity(&source, &sentences).await?))
}

async fn analyze_sentiment(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TextRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "No text provided")?;
    Ok(Json(server.analyze_sentiment(&text).await?))
}

async fn summarize(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TextRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "Text is required")?;
    Ok(Json(server.summarize(&text).await?))
}

async fn translate(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TranslationRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "Text and target language are required")?;
    let target_lang = require(request.target_lang, "Text and target language are required")?;

    let translated = server.translate(&text, &target_lang).await?;

    Ok(Json(json!({ "translatedText": translated })))
}

async fn generate_text(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<GenerateRequest>,
) -> cortex_core::Result<Json<Value>> {
    let prompt = require(request.prompt, "Prompt is required")?;

    let generated = server.generate(&prompt, &request.context).await?;

    Ok(Json(json!({ "generatedText": generated })))
}

async fn text_to_text(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TextRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "No text provided")?;
    Ok(Json(server.text_to_text(&text).await?))
}

async fn classify_tokens(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<TextRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "Text is required")?;
    Ok(Json(server.classify_tokens(&text).await?))
}

async fn classify_zero_shot(
    State(server): State<Arc<Server>>,
    JsonBody(request): JsonBody<ZeroShotRequest>,
) -> cortex_core::Result<Json<Value>> {
    let text = require(request.text, "Text and labels are required")?;
    let labels = request
        .labels
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ProxyError::Validation("Text and labels are required".to_owned()))?;

    Ok(Json(server.classify_zero_shot(&text, &labels).await?))
}
