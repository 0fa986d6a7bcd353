//! Roster DB Server CLI
//!
//! Run with: `cargo run -p roster-db-server -- --help`

use clap::Parser;
use roster_db_server::{init_logging, RosterServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    init_logging(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr,
        data = %config.data_path.display(),
        "Starting roster server"
    );

    let server = RosterServer::new(config)?;
    server.run().await.map_err(Into::into)
}
