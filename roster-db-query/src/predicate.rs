//! Predicate library
//!
//! Pure functions of a single field value, parameterized at construction.
//! String predicates never fail to construct; timestamp predicates parse
//! their argument from the wire string and can reject it.
//!
//! `Lt`/`Gt` are byte-wise lexicographic over the raw string, never
//! numeric. `Null` follows the wire convention: flag "1" means the field
//! must be unset (empty), any other flag means it must be set.

use crate::error::Result;
use chrono::{DateTime, Datelike};
use std::collections::HashSet;

/// Predicate over a string-valued field
#[derive(Debug, Clone)]
pub enum StringPredicate {
    /// Exact equality
    Equal(String),
    /// Exact inequality
    NotEqual(String),
    /// Byte-wise lexicographic less-than
    Lt(String),
    /// Byte-wise lexicographic greater-than
    Gt(String),
    /// Prefix match
    Starts(String),
    /// true: field must be empty; false: field must be non-empty
    Null(bool),
    /// Value is one of the listed alternatives
    Any(HashSet<String>),
    /// Exact match of the substring after the email's single '@'
    Domain(String),
    /// Phone contains '(' and the text right after it starts with the code
    Code(String),
}

impl StringPredicate {
    /// Null predicate from its wire flag
    pub fn null(flag: &str) -> Self {
        StringPredicate::Null(flag == "1")
    }

    /// Any predicate from a comma-separated list
    pub fn any(csv: &str) -> Self {
        StringPredicate::Any(csv.split(',').map(str::to_string).collect())
    }

    /// Evaluate against one field value
    pub fn matches(&self, value: &str) -> bool {
        match self {
            StringPredicate::Equal(v) => value == v,
            StringPredicate::NotEqual(v) => value != v,
            StringPredicate::Lt(v) => value < v.as_str(),
            StringPredicate::Gt(v) => value > v.as_str(),
            StringPredicate::Starts(prefix) => value.starts_with(prefix),
            StringPredicate::Null(true) => value.is_empty(),
            StringPredicate::Null(false) => !value.is_empty(),
            StringPredicate::Any(set) => set.contains(value),
            StringPredicate::Domain(domain) => {
                let parts: Vec<&str> = value.split('@').collect();
                parts.len() == 2 && parts[1] == domain
            }
            StringPredicate::Code(code) => match value.find('(') {
                Some(idx) => value[idx + 1..].starts_with(code.as_str()),
                None => false,
            },
        }
    }
}

/// Predicate over a Unix-second timestamp field
#[derive(Debug, Clone, Copy)]
pub enum TimePredicate {
    /// Strictly before the instant
    Before(i64),
    /// Strictly after the instant
    After(i64),
    /// Calendar-year (UTC) equality
    Year(i32),
}

impl TimePredicate {
    /// Before predicate from a wire timestamp string
    pub fn before(ts: &str) -> Result<Self> {
        Ok(TimePredicate::Before(ts.parse()?))
    }

    /// After predicate from a wire timestamp string
    pub fn after(ts: &str) -> Result<Self> {
        Ok(TimePredicate::After(ts.parse()?))
    }

    /// Year predicate from a wire year string
    pub fn year(year: &str) -> Result<Self> {
        Ok(TimePredicate::Year(year.parse()?))
    }

    /// Evaluate against one timestamp
    pub fn matches(&self, ts: i64) -> bool {
        match self {
            TimePredicate::Before(bound) => ts < *bound,
            TimePredicate::After(bound) => ts > *bound,
            TimePredicate::Year(year) => timestamp_year(ts) == *year,
        }
    }
}

/// UTC calendar year of a Unix-second timestamp
fn timestamp_year(ts: i64) -> i32 {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.year())
        .unwrap_or(0)
}
