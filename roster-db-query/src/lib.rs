//! # Roster DB Query
//!
//! Filter engine and group aggregator over the immutable account catalog.
//!
//! This crate provides:
//! - The predicate library (`StringPredicate`, `TimePredicate`)
//! - `AccountFilter` with seed/refine evaluation and the
//!   `filter_accounts` conjunction fold
//! - `group_accounts`: composite-signature bucketing, counting, ranking,
//!   and post-sort truncation
//!
//! Construction is the only fallible step; evaluation reads shared
//! immutable indexes, builds a private working set, performs no I/O, and
//! has no suspension or cancellation points.

pub mod error;
pub mod filter;
pub mod group;
pub mod predicate;

// Re-export main types
pub use error::{QueryError, Result};
pub use filter::{filter_accounts, AccountFilter, WorkingSet};
pub use group::{group_accounts, GroupKey, GroupRow, SortOrder};
pub use predicate::{StringPredicate, TimePredicate};
