use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration can serve at least one endpoint
    ///
    /// Endpoints whose provider credential is missing fail per-request with
    /// a configuration error; a gateway with neither credential would serve
    /// nothing, so that fails at load time instead.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider credential is configured
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.inference.credential().is_none() && self.chat.credential().is_none() {
            anyhow::bail!(
                "at least one provider credential must be configured (inference.api_key or chat.api_key)"
            );
        }

        if self.inference.credential().is_none() {
            tracing::warn!("inference provider unconfigured; its endpoints will return configuration errors");
        }
        if self.chat.credential().is_none() {
            tracing::warn!("chat gateway unconfigured; its endpoints will return configuration errors");
        }

        Ok(())
    }
}
