//! Command line flags, with environment variable fallbacks.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_TARGET_URL: &str = "http://pi-digits.aws-k8s.catalysts.cc/?digits=15000";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Dynamic HTTP load generator", long_about = None)]
pub struct Cli {
    /// URL every worker issues its GET against
    #[arg(long = "targetUrl", env = "LOADGEN_TARGET_URL", default_value = DEFAULT_TARGET_URL)]
    pub target_url: String,

    /// Initial number of concurrent workers
    #[arg(long, env = "LOADGEN_CLIENTS", default_value_t = 1)]
    pub clients: u32,

    /// Initial aggregate requests per second
    #[arg(long, env = "LOADGEN_RPS", default_value_t = 1)]
    pub rps: u32,

    /// Address of the control surface
    #[arg(long, env = "LOADGEN_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Directory of static files served under `/`
    #[arg(long, env = "LOADGEN_ASSETS", default_value = "html")]
    pub assets: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Idle pooled connections kept per target host
    #[arg(long, default_value_t = 10)]
    pub max_idle_per_host: usize,
}
