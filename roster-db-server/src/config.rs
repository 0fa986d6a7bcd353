//! Server configuration

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "roster-server")]
#[command(about = "Roster DB HTTP query server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "ROSTER_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Directory holding the initial account data (*.json documents)
    #[arg(long, env = "ROSTER_DATA_PATH")]
    pub data_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROSTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
