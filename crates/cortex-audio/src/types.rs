use serde::{Deserialize, Serialize};

/// A single label/score pair from an audio classification model
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

/// Request body for music generation
#[derive(Debug, Deserialize)]
pub struct GenerationRequest {
    pub prompt: Option<String>,
}
