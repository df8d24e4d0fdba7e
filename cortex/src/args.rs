use std::path::PathBuf;

use clap::Parser;

/// Cortex inference gateway
#[derive(Debug, Parser)]
#[command(name = "cortex", about = "Inference proxy gateway for browser ML demos")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "cortex.toml", env = "CORTEX_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "CORTEX_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Emit logs as JSON
    #[arg(long, env = "CORTEX_LOG_JSON")]
    pub log_json: bool,
}
