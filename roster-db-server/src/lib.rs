//! # Roster DB Server
//!
//! HTTP front end for the account query engine.
//!
//! Startup loads the whole dataset through the ingest collaborator, builds
//! the catalog and every index exactly once, and only then binds the
//! listener; a load failure is fatal and the process never serves.
//! Handlers afterwards share the immutable catalog with no locking.
//!
//! # Example
//!
//! ```ignore
//! use roster_db_server::{RosterServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::parse();
//!     let server = RosterServer::new(config).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;
pub use telemetry::init_logging;

use axum::Router;
use roster_db_core::Catalog;
use roster_db_ingest::{DataSource, DirSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Roster HTTP server
pub struct RosterServer {
    state: Arc<AppState>,
    router: Router,
    listen_addr: SocketAddr,
}

impl RosterServer {
    /// Load the dataset and build the router.
    ///
    /// This is the one-time load phase: any ingest or parse failure here
    /// aborts startup before the engine accepts traffic.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let documents = DirSource::new(&config.data_path).read()?;
        let catalog = Catalog::from_documents(documents)?;

        let state = Arc::new(AppState::new(catalog));
        let router = routes::build_router(state.clone());

        Ok(Self {
            state,
            router,
            listen_addr: config.listen_addr,
        })
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Get the router for testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until the process exits
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        info!(
            addr = %self.listen_addr,
            accounts = self.state.catalog.len(),
            "serving"
        );
        axum::serve(listener, self.router).await
    }
}
