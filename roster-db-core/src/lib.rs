//! # Roster DB Core
//!
//! Entity model and the immutable indexed catalog for the account query
//! engine.
//!
//! This crate provides:
//! - The `Account` model with its serde wire mapping and derived
//!   presence-sets for O(1) interest / liked-id membership
//! - `Catalog`: primary map, unique-value maps, bucketed secondary
//!   indexes, premium time buckets and partitions, built in one pass at
//!   startup and never mutated after
//!
//! ## Design Principles
//!
//! 1. **Write-once**: everything is built during load; queries only read
//! 2. **No validation beyond shape**: duplicate unique values are not an
//!    error; the last-loaded account wins
//! 3. **Runtime-agnostic**: no async, no I/O; callers hand in raw bytes

pub mod account;
pub mod catalog;
pub mod error;

// Re-export main types
pub use account::{parse_accounts, Account, Like, Premium, Sex};
pub use catalog::{AccountRef, Catalog};
pub use error::{Error, Result};
