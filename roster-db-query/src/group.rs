//! Group-by-count aggregation over a filtered working set
//!
//! Buckets the accounts matching a filter chain by composite group
//! signatures, counts each signature, ranks by count with a tie-break on
//! the signature's last value, and truncates only after the full sort.
//!
//! This is a blocking computation: the whole (unbounded) working set is
//! consumed before any ranking happens.

use crate::filter::{filter_accounts, AccountFilter};
use roster_db_core::{Account, Catalog};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ranking direction for grouped results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Keys accounts can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Sex,
    Status,
    Interests,
    Country,
    City,
}

impl GroupKey {
    /// Parse a wire key name; unknown names are not an error, callers skip
    /// them
    pub fn parse(name: &str) -> Option<GroupKey> {
        match name {
            "sex" => Some(GroupKey::Sex),
            "status" => Some(GroupKey::Status),
            "interests" => Some(GroupKey::Interests),
            "country" => Some(GroupKey::Country),
            "city" => Some(GroupKey::City),
            _ => None,
        }
    }

    /// Wire name of the key
    pub fn name(&self) -> &'static str {
        match self {
            GroupKey::Sex => "sex",
            GroupKey::Status => "status",
            GroupKey::Interests => "interests",
            GroupKey::Country => "country",
            GroupKey::City => "city",
        }
    }

    /// Values this key yields for one account.
    ///
    /// Single-valued keys yield nothing when the field is unset; interests
    /// yield one value per interest held (fan-out).
    fn values<'a>(&self, account: &'a Account) -> Vec<&'a str> {
        fn single(value: &str) -> Vec<&str> {
            if value.is_empty() {
                Vec::new()
            } else {
                vec![value]
            }
        }

        match self {
            GroupKey::Sex => vec![account.sex.as_str()],
            GroupKey::Status => single(&account.status),
            GroupKey::Country => single(&account.country),
            GroupKey::City => single(&account.city),
            GroupKey::Interests => account.interests.iter().map(String::as_str).collect(),
        }
    }
}

/// One ranked output group: the `(name, value)` pairs identifying it, in
/// request key order, plus the number of accounts that fell into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub fields: Vec<(String, String)>,
    pub count: u64,
}

impl GroupRow {
    /// Tie-break value: the last value appended to the signature
    fn tie_value(&self) -> &str {
        self.fields.last().map(|(_, v)| v.as_str()).unwrap_or("")
    }
}

/// Group, count, rank, and truncate the accounts matching a filter chain.
///
/// Each account's group signatures are the Cartesian product of the
/// requested keys' value lists: one signature per combination, one
/// `name=value` token per key in request order. An account whose value
/// list is empty for any requested key contributes nothing at all.
///
/// Ranking sorts by count, ties broken by the signature's last value in
/// the same direction; truncation to `limit` happens only after the full
/// sort.
///
/// Evaluation is total: malformed arguments are rejected while the filter
/// chain is constructed, before this is ever called.
pub fn group_accounts(
    catalog: &Catalog,
    keys: &[GroupKey],
    order: SortOrder,
    limit: usize,
    filters: &[AccountFilter],
) -> Vec<GroupRow> {
    let working = filter_accounts(catalog, filters);

    // signature -> (fields of first occurrence, running count)
    let mut groups: HashMap<String, (Vec<(String, String)>, u64)> = HashMap::new();

    'accounts: for account in working.values() {
        let mut per_key: Vec<Vec<&str>> = Vec::with_capacity(keys.len());
        for key in keys {
            let values = key.values(account);
            if values.is_empty() {
                // one empty key drops the account for the whole key-list
                continue 'accounts;
            }
            per_key.push(values);
        }
        if per_key.is_empty() {
            continue;
        }

        for combination in cartesian(&per_key) {
            let fields: Vec<(String, String)> = keys
                .iter()
                .zip(&combination)
                .map(|(key, value)| (key.name().to_string(), value.to_string()))
                .collect();
            let signature = fields
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(",");

            let entry = groups.entry(signature).or_insert_with(|| (fields, 0));
            entry.1 += 1;
        }
    }

    let mut rows: Vec<GroupRow> = groups
        .into_values()
        .map(|(fields, count)| GroupRow { fields, count })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match a.count.cmp(&b.count) {
            Ordering::Equal => a.tie_value().cmp(b.tie_value()),
            unequal => unequal,
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    rows.truncate(limit);

    tracing::debug!(
        accounts = working.len(),
        groups = rows.len(),
        "grouped and ranked"
    );
    rows
}

/// All combinations picking one value per key, in key order
fn cartesian<'a>(per_key: &[Vec<&'a str>]) -> Vec<Vec<&'a str>> {
    let mut combinations: Vec<Vec<&str>> = vec![Vec::new()];
    for values in per_key {
        combinations = combinations
            .iter()
            .flat_map(|prefix| {
                values.iter().map(move |&value| {
                    let mut next = prefix.clone();
                    next.push(value);
                    next
                })
            })
            .collect();
    }
    combinations
}
