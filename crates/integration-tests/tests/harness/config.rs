//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use cortex_config::{ChatConfig, Config, HealthConfig, InferenceConfig, ServerConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// Neither provider is configured; point them at mocks with
    /// [`with_inference`](Self::with_inference) and
    /// [`with_chat`](Self::with_chat).
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    cors: None,
                },
                inference: InferenceConfig {
                    api_key: None,
                    ..InferenceConfig::default()
                },
                chat: ChatConfig {
                    api_key: None,
                    ..ChatConfig::default()
                },
                models: cortex_config::ModelsConfig::default(),
            },
        }
    }

    /// Point the inference provider at a mock backend
    pub fn with_inference(mut self, base_url: &str) -> Self {
        self.config.inference = InferenceConfig {
            api_key: Some(SecretString::from("test-key")),
            base_url: base_url.to_owned(),
        };
        self
    }

    /// Point the chat gateway at a mock backend
    pub fn with_chat(mut self, base_url: &str) -> Self {
        self.config.chat = ChatConfig {
            api_key: Some(SecretString::from("test-key")),
            base_url: base_url.to_owned(),
            referer: Some("http://localhost:3000".to_owned()),
            title: Some("Cortex".to_owned()),
        };
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Mutate the model table
    pub fn with_models(mut self, f: impl FnOnce(&mut cortex_config::ModelsConfig)) -> Self {
        f(&mut self.config.models);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
