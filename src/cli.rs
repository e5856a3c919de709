use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Build a linear grammar and check words against a grammar service")]
pub struct Cli {
    /// Saved grammar to start from
    pub grammar: Option<PathBuf>,

    /// Base URL of the grammar service
    #[arg(long, env = "GRAMTREE_SERVER_URL", default_value = "http://localhost:8080")]
    pub server_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "GRAMTREE_TIMEOUT", value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Read commands from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
