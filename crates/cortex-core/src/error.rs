use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

/// Gateway errors with their client-facing HTTP status codes
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Missing or malformed input; rejected before any upstream call
    #[error("{0}")]
    Validation(String),

    /// Required provider credential is not configured
    #[error("{0}")]
    Configuration(String),

    /// The upstream request could not be sent (connect/timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Terminal upstream error, surfaced immediately
    #[error("{message}")]
    UpstreamApi {
        /// HTTP status the upstream returned, when one was received
        status: Option<u16>,
        message: String,
    },

    /// Transient upstream errors exhausted the retry budget
    #[error("{message}")]
    Exhausted { attempts: u32, message: String },

    /// Upstream returned 2xx but the body did not match the contract
    #[error("{0}")]
    Normalization(String),
}

impl ProxyError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            // 401 from the upstream passes through so the client can
            // distinguish credential problems from transient failures
            Self::UpstreamApi { status: Some(401), .. } => StatusCode::UNAUTHORIZED,
            Self::Configuration(_)
            | Self::Connection(_)
            | Self::UpstreamApi { .. }
            | Self::Exhausted { .. }
            | Self::Normalization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to expose to API consumers
    ///
    /// Upstream error text is forwarded as-is; anything else stays in the
    /// server-side logs.
    pub fn client_message(&self) -> String {
        self.to_string()
    }

    /// Whether the error was produced before any upstream call was made
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Configuration(_))
    }
}

/// Error body: a single human-readable `error` field
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ProxyError::Validation(msg) => tracing::debug!(%msg, "rejected invalid request"),
            ProxyError::Exhausted { attempts, message } => {
                tracing::error!(attempts, %message, "retry budget exhausted");
            }
            other => tracing::error!(error = %other, "request failed"),
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
