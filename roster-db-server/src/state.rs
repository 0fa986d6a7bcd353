//! Shared application state
//!
//! # Thread Safety Note
//!
//! The catalog is built once before the listener binds and never mutated
//! after, so handlers share it with no locking: every query reads the same
//! immutable indexes and assembles its own private working set.

use roster_db_core::Catalog;

/// State shared by all handlers
pub struct AppState {
    /// The immutable indexed account collection
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}
