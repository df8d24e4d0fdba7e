#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
mod loader;
pub mod models;
pub mod providers;
pub mod server;

use serde::Deserialize;

pub use cors::{AnyOrArray, CorsConfig};
pub use models::ModelsConfig;
pub use providers::{ChatConfig, InferenceConfig};
pub use server::{HealthConfig, ServerConfig};

/// Top-level Cortex configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Inference provider (HuggingFace-style per-model endpoints)
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Chat-completion gateway (OpenAI-style)
    #[serde(default)]
    pub chat: ChatConfig,
    /// Per-task model identifier overrides
    #[serde(default)]
    pub models: ModelsConfig,
}
