//! Error types for query construction
//!
//! Construction is the only fallible step: once a filter or group query is
//! built, evaluation over well-formed accounts is total.

use thiserror::Error;

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Query construction errors
///
/// All-or-nothing: any of these rejects the whole query before a single
/// account is touched.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Argument that should be an integer timestamp or year failed to parse
    #[error("Invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    /// Sex value outside the two-value domain
    #[error("Invalid sex value: {0}")]
    InvalidSex(String),
}
