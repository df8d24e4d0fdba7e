use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use cortex_core::{ProxyError, Result};
use cortex_upstream::{ChatClient, ChatMessage, InferenceClient, RetryPolicy};
use serde_json::{Value, json};

use crate::types::HistoryMessage;

/// NLP gateway state
///
/// Holds both upstream clients since the adapters split between the
/// per-model inference provider and the chat-completion gateway. Either
/// client may be absent when its credential is unset; affected endpoints
/// fail with a configuration error at call time.
pub struct Server {
    inference: Option<InferenceClient>,
    chat: Option<ChatClient>,
    models: Models,
}

struct Models {
    feature_extraction: String,
    fill_mask: String,
    question_answering: String,
    table_qa: String,
    sentence_similarity: String,
    sentiment: String,
    summarization: String,
    text_to_text: String,
    token_classification: String,
    zero_shot: String,
    chat: String,
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
            models: Models {
                feature_extraction: config.models.feature_extraction.clone(),
                fill_mask: config.models.fill_mask.clone(),
                question_answering: config.models.question_answering.clone(),
                table_qa: config.models.table_qa.clone(),
                sentence_similarity: config.models.sentence_similarity.clone(),
                sentiment: config.models.sentiment.clone(),
                summarization: config.models.summarization.clone(),
                text_to_text: config.models.text_to_text.clone(),
                token_classification: config.models.token_classification.clone(),
                zero_shot: config.models.zero_shot.clone(),
                chat: config.models.chat.clone(),
            },
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

    /// Embed text; embedding models cold-start often enough to warrant
    /// the fixed-delay budget
    pub(crate) async fn extract_features(&self, text: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.feature_extraction,
                &json!({ "inputs": text }),
                &RetryPolicy::cold_start(),
            )
            .await
    }

    pub(crate) async fn fill_mask(&self, text: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.fill_mask,
                &json!({ "inputs": text }),
                &RetryPolicy::cold_start(),
            )
            .await
    }

    pub(crate) async fn answer_question(&self, question: &str, context: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.question_answering,
                &json!({ "inputs": { "question": question, "context": context } }),
                &RetryPolicy::cold_start(),
            )
            .await
    }

    /// Table QA returns only the extracted answer field
    pub(crate) async fn answer_table_question(&self, table: &Value, question: &str) -> Result<Value> {
        let result = self
            .inference()?
            .post_json(
                &self.models.table_qa,
                &json!({ "inputs": { "query": question, "table": table } }),
                &RetryPolicy::single(),
            )
            .await?;

        let answer = result
            .get("answer")
            .and_then(Value::as_str)
            .ok_or_else(|| ProxyError::Normalization("Table model returned no answer".to_owned()))?;

        Ok(json!({ "answer": answer }))
    }

    /// Answer a question about a PDF by embedding it base64-encoded in the
    /// prompt; the chat model handles the document itself
    pub(crate) async fn answer_pdf_question(&self, pdf: &Bytes, question: &str) -> Result<String> {
        let encoded = BASE64.encode(pdf);
        let prompt = format!(
            "Here's a PDF document in base64 format: {encoded}\n\nPlease answer this question about the document: {question}"
        );

        self.chat()?
            .complete(&self.models.chat, &[ChatMessage::user(prompt)], None)
            .await
    }

    /// Score sentences against a source; the provider preserves input order
    pub(crate) async fn similarity(&self, source: &str, sentences: &[String]) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.sentence_similarity,
                &json!({ "inputs": { "source_sentence": source, "sentences": sentences } }),
                &RetryPolicy::cold_start(),
            )
            .await
    }

    pub(crate) async fn analyze_sentiment(&self, text: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.sentiment,
                &json!({ "inputs": text }),
                &RetryPolicy::single(),
            )
            .await
    }

    pub(crate) async fn summarize(&self, text: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.summarization,
                &json!({ "inputs": text }),
                &RetryPolicy::single(),
            )
            .await
    }

    pub(crate) async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let prompt = format!("Translate the following text to {target_lang}: \"{text}\"");

        self.chat()?
            .complete(&self.models.chat, &[ChatMessage::user(prompt)], None)
            .await
    }

    /// Conversational generation: history turns are forwarded ahead of the
    /// current prompt
    pub(crate) async fn generate(&self, prompt: &str, history: &[HistoryMessage]) -> Result<String> {
        let mut messages: Vec<ChatMessage> = history
            .iter()
            .map(|turn| ChatMessage::new(turn.role.clone(), turn.content.clone()))
            .collect();
        messages.push(ChatMessage::user(prompt));

        self.chat()?.complete(&self.models.chat, &messages, None).await
    }

    pub(crate) async fn text_to_text(&self, text: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.text_to_text,
                &json!({ "inputs": text }),
                &RetryPolicy::single(),
            )
            .await
    }

    pub(crate) async fn classify_tokens(&self, text: &str) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.token_classification,
                &json!({ "inputs": text }),
                &RetryPolicy::single(),
            )
            .await
    }

    pub(crate) async fn classify_zero_shot(&self, text: &str, labels: &[String]) -> Result<Value> {
        self.inference()?
            .post_json(
                &self.models.zero_shot,
                &json!({ "inputs": text, "parameters": { "candidate_labels": labels } }),
                &RetryPolicy::single(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_clients_optional() {
        let config: cortex_config::Config = toml::from_str("").unwrap();
        let server = Server::from_config(&config).unwrap();

        assert!(matches!(server.inference(), Err(ProxyError::Configuration(_))));
        assert!(matches!(server.chat(), Err(ProxyError::Configuration(_))));
    }

    #[test]
    fn inference_only_configuration() {
        let config: cortex_config::Config = toml::from_str(
            r#"
            [inference]
            api_key = "hf-test"
            "#,
        )
        .unwrap();
        let server = Server::from_config(&config).unwrap();

        assert!(server.inference().is_ok());
        assert!(server.chat().is_err());
    }
}
