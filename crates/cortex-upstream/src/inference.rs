use bytes::Bytes;
use cortex_core::ProxyError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::retry::{RetryPolicy, is_transient};

/// Client for the per-model inference provider
///
/// One instance per gateway process; reqwest pools connections across the
/// adapters that share it.
pub struct InferenceClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

/// Successfully decoded upstream body
enum Body {
    Json(Value),
    Binary(Bytes),
}

/// What a call expects back on success
#[derive(Clone, Copy)]
enum Expect {
    Json,
    Binary,
}

/// Outbound payload, rebuilt on every attempt
enum Payload<'a> {
    Json(&'a Value),
    Bytes(&'a Bytes, &'a str),
}

struct ErrorSignal {
    message: String,
    status: Option<u16>,
}

impl InferenceClient {
    /// Build from provider configuration
    ///
    /// Returns `ProxyError::Configuration` when no credential is set, so
    /// adapters can defer the failure to first use.
    pub fn from_config(config: &cortex_config::InferenceConfig) -> cortex_core::Result<Self> {
        let api_key = config
            .credential()
            .cloned()
            .ok_or_else(|| ProxyError::Configuration("Inference API key not configured".to_owned()))?;

        let client = Client::builder()
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProxyError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// POST a JSON body to a model endpoint, expecting JSON back
    pub async fn post_json(&self, model: &str, body: &Value, policy: &RetryPolicy) -> cortex_core::Result<Value> {
        match self.execute(model, &Payload::Json(body), Expect::Json, policy).await? {
            Body::Json(value) => Ok(value),
            Body::Binary(_) => Err(ProxyError::Normalization(
                "unexpected binary response from upstream".to_owned(),
            )),
        }
    }

    /// POST raw bytes (audio, image) to a model endpoint, expecting JSON back
    pub async fn post_bytes(
        &self,
        model: &str,
        payload: Bytes,
        content_type: &str,
        policy: &RetryPolicy,
    ) -> cortex_core::Result<Value> {
        match self
            .execute(model, &Payload::Bytes(&payload, content_type), Expect::Json, policy)
            .await?
        {
            Body::Json(value) => Ok(value),
            Body::Binary(_) => Err(ProxyError::Normalization(
                "unexpected binary response from upstream".to_owned(),
            )),
        }
    }

    /// POST a JSON body to a model endpoint, expecting binary back
    /// (generated images, synthesized audio)
    pub async fn post_json_for_bytes(
        &self,
        model: &str,
        body: &Value,
        policy: &RetryPolicy,
    ) -> cortex_core::Result<Bytes> {
        match self.execute(model, &Payload::Json(body), Expect::Binary, policy).await? {
            Body::Binary(bytes) => Ok(bytes),
            // a JSON body on a success status without an error field is
            // still not the binary we asked for
            Body::Json(_) => Err(ProxyError::Normalization(
                "expected binary response from upstream".to_owned(),
            )),
        }
    }

    /// The bounded retry loop
    ///
    /// Exactly one request is in flight at a time; the task suspends for the
    /// policy delay between attempts. Terminates within
    /// `max_attempts × timeout` plus the accumulated delays.
    async fn execute(
        &self,
        model: &str,
        payload: &Payload<'_>,
        expect: Expect,
        policy: &RetryPolicy,
    ) -> cortex_core::Result<Body> {
        let url = format!("{}/models/{model}", self.base_url);

        for attempt in 1..=policy.max_attempts {
            let mut request = self
                .client
                .post(&url)
                .bearer_auth(self.api_key.expose_secret())
                .timeout(policy.timeout);

            request = match payload {
                Payload::Json(body) => request.json(body),
                Payload::Bytes(bytes, content_type) => request
                    .header(http::header::CONTENT_TYPE, *content_type)
                    .body((*bytes).clone()),
            };

            let response = request.send().await.map_err(|e| {
                tracing::error!(%model, %e, "inference request failed to send");
                ProxyError::Connection(format!("Failed to reach inference provider: {e}"))
            })?;

            let status = response.status();
            let is_json = response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ct| ct.contains("json"));

            let body = response.bytes().await.map_err(|e| {
                tracing::error!(%model, %e, "failed to read inference response body");
                ProxyError::Connection(format!("Failed to read upstream response: {e}"))
            })?;

            let signal = match decode(status, is_json, body, expect) {
                Ok(success) => return Ok(success),
                Err(signal) => signal,
            };

            let transient = is_transient(&signal.message, signal.status);

            if transient && attempt < policy.max_attempts {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    %model,
                    attempt,
                    max_attempts = policy.max_attempts,
                    message = %signal.message,
                    delay_ms = delay.as_millis(),
                    "transient upstream failure, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(if transient {
                ProxyError::Exhausted {
                    attempts: attempt,
                    message: signal.message,
                }
            } else {
                tracing::error!(%model, status = ?signal.status, message = %signal.message, "terminal upstream error");
                ProxyError::UpstreamApi {
                    status: signal.status,
                    message: signal.message,
                }
            });
        }

        // max_attempts >= 1; the loop always returns
        unreachable!("retry loop exited without a result")
    }
}

/// Map one attempt's (status, body) onto success or an error signal
///
/// The provider embeds errors in 200 bodies during cold starts, so the body
/// is inspected before the status. A non-JSON body on an error status (or
/// where JSON was expected) becomes an opaque error using the raw text, or
/// the HTTP status when the body is empty.
fn decode(status: http::StatusCode, is_json: bool, body: Bytes, expect: Expect) -> Result<Body, ErrorSignal> {
    let try_json = is_json || !status.is_success() || matches!(expect, Expect::Json);

    if try_json && let Ok(value) = serde_json::from_slice::<Value>(&body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(ErrorSignal {
                message: message.to_owned(),
                status: Some(status.as_u16()),
            });
        }

        if status.is_success() {
            return Ok(Body::Json(value));
        }

        return Err(opaque(status, &body));
    }

    if !status.is_success() {
        return Err(opaque(status, &body));
    }

    match expect {
        Expect::Binary => Ok(Body::Binary(body)),
        // success status, JSON expected, body not parseable: opaque error
        Expect::Json => Err(opaque(status, &body)),
    }
}

fn opaque(status: http::StatusCode, body: &Bytes) -> ErrorSignal {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    let message = if trimmed.is_empty() {
        format!("HTTP error {}", status.as_u16())
    } else {
        trimmed.to_owned()
    };
    ErrorSignal {
        message,
        status: Some(status.as_u16()),
    }
}
