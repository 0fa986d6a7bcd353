//! Composable account filters with seed/refine evaluation
//!
//! A filter transforms a working set so that applying a chain left to
//! right computes the conjunction of every filter's predicate. The mode is
//! chosen from the incoming working set alone:
//!
//! - **Seed** (set empty): scan the relevant catalog index and materialize
//!   every matching account.
//! - **Refine** (set non-empty): re-evaluate the identical predicate
//!   directly against each account already present and drop failures.
//!
//! Only the first filter ever pays for an index scan, so chain order is a
//! performance knob and never a correctness one.

use crate::error::{QueryError, Result};
use crate::predicate::{StringPredicate, TimePredicate};
use roster_db_core::{Account, AccountRef, Catalog, Sex};
use std::collections::HashMap;

/// Working set assembled while evaluating a filter chain.
///
/// Empty means "not yet seeded".
pub type WorkingSet = HashMap<i64, AccountRef>;

/// One filter of a conjunctive chain, a predicate bound to the account
/// field it applies to.
#[derive(Debug, Clone)]
pub enum AccountFilter {
    Email(StringPredicate),
    Fname(StringPredicate),
    Sname(StringPredicate),
    Phone(StringPredicate),
    Country(StringPredicate),
    City(StringPredicate),
    Status(StringPredicate),
    Sex(Sex),
    Birth(TimePredicate),
    /// true: premium must be absent; false: premium must be present
    PremiumNull { missing: bool },
    /// Premium covers the instant, both bounds inclusive
    PremiumNow(i64),
    /// At least one listed interest present
    InterestsAny(Vec<String>),
    /// Every listed interest present
    InterestsContains(Vec<String>),
    /// Every listed liked-id present
    LikesContains(Vec<String>),
}

fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',').map(str::to_string).collect()
}

impl AccountFilter {
    /// Sex filter from its wire value; the domain is closed
    pub fn sex(value: &str) -> Result<Self> {
        Sex::parse(value)
            .map(AccountFilter::Sex)
            .ok_or_else(|| QueryError::InvalidSex(value.to_string()))
    }

    /// Premium presence filter from its wire flag
    pub fn premium_null(flag: &str) -> Self {
        AccountFilter::PremiumNull { missing: flag == "1" }
    }

    /// Active-premium filter from a wire timestamp string
    pub fn premium_now(ts: &str) -> Result<Self> {
        Ok(AccountFilter::PremiumNow(ts.parse()?))
    }

    /// Any-of-interests filter from a comma-separated list
    pub fn interests_any(csv: &str) -> Self {
        AccountFilter::InterestsAny(split_csv(csv))
    }

    /// All-of-interests filter from a comma-separated list
    pub fn interests_contains(csv: &str) -> Self {
        AccountFilter::InterestsContains(split_csv(csv))
    }

    /// All-of-likes filter from a comma-separated list of ids
    pub fn likes_contains(csv: &str) -> Self {
        AccountFilter::LikesContains(split_csv(csv))
    }

    /// Apply this filter: seed when the working set is empty, refine
    /// otherwise.
    pub fn apply(&self, catalog: &Catalog, working: WorkingSet) -> WorkingSet {
        if working.is_empty() {
            self.seed(catalog)
        } else {
            self.refine(working)
        }
    }

    /// Materialize every matching account from the catalog indexes.
    fn seed(&self, catalog: &Catalog) -> WorkingSet {
        let mut out = WorkingSet::new();
        match self {
            AccountFilter::Email(p) => {
                for (email, a) in catalog.emails() {
                    if p.matches(email) {
                        out.insert(a.id, a.clone());
                    }
                }
            }
            AccountFilter::Phone(p) => seed_buckets(&mut out, catalog.phones(), p),
            AccountFilter::Fname(p) => seed_buckets(&mut out, catalog.fnames(), p),
            AccountFilter::Sname(p) => seed_buckets(&mut out, catalog.snames(), p),
            AccountFilter::Country(p) => seed_buckets(&mut out, catalog.countries(), p),
            AccountFilter::City(p) => seed_buckets(&mut out, catalog.cities(), p),
            AccountFilter::Status(p) => seed_buckets(&mut out, catalog.statuses(), p),
            AccountFilter::Sex(sex) => {
                extend(&mut out, catalog.sex_bucket(*sex));
            }
            AccountFilter::Birth(p) => {
                for (birth, bucket) in catalog.births() {
                    if p.matches(birth) {
                        extend(&mut out, bucket);
                    }
                }
            }
            AccountFilter::PremiumNull { missing } => {
                extend(&mut out, catalog.premium_partition(!missing));
            }
            AccountFilter::PremiumNow(ts) => {
                // Start index narrows to starts <= ts; the finish bound is
                // checked per candidate.
                for (start, bucket) in catalog.premium_starts() {
                    if start > *ts {
                        continue;
                    }
                    for a in bucket {
                        let covers = a.premium.as_ref().is_some_and(|p| p.finish >= *ts);
                        if covers {
                            out.insert(a.id, a.clone());
                        }
                    }
                }
            }
            AccountFilter::InterestsAny(list) => {
                for interest in list {
                    extend(&mut out, catalog.interest_bucket(interest));
                }
            }
            AccountFilter::InterestsContains(list) => {
                // A bucket member holds that one interest; full containment
                // still has to be verified per candidate.
                for interest in list {
                    for a in catalog.interest_bucket(interest) {
                        if list.iter().all(|i| a.has_interest(i)) {
                            out.insert(a.id, a.clone());
                        }
                    }
                }
            }
            AccountFilter::LikesContains(list) => {
                for id in list {
                    for a in catalog.liked_by_bucket(id) {
                        if list.iter().all(|l| a.has_liked(l)) {
                            out.insert(a.id, a.clone());
                        }
                    }
                }
            }
        }
        out
    }

    /// Drop every present account that fails the predicate.
    fn refine(&self, mut working: WorkingSet) -> WorkingSet {
        working.retain(|_, a| self.matches(a));
        working
    }

    /// Direct predicate evaluation against one account, the same
    /// predicate seed mode resolves through the indexes.
    pub fn matches(&self, account: &Account) -> bool {
        match self {
            AccountFilter::Email(p) => p.matches(&account.email),
            AccountFilter::Fname(p) => p.matches(&account.fname),
            AccountFilter::Sname(p) => p.matches(&account.sname),
            AccountFilter::Phone(p) => p.matches(&account.phone),
            AccountFilter::Country(p) => p.matches(&account.country),
            AccountFilter::City(p) => p.matches(&account.city),
            AccountFilter::Status(p) => p.matches(&account.status),
            AccountFilter::Sex(sex) => account.sex == *sex,
            AccountFilter::Birth(p) => p.matches(account.birth),
            AccountFilter::PremiumNull { missing } => account.premium.is_none() == *missing,
            AccountFilter::PremiumNow(ts) => account.premium_active_at(*ts),
            AccountFilter::InterestsAny(list) => list.iter().any(|i| account.has_interest(i)),
            AccountFilter::InterestsContains(list) => {
                list.iter().all(|i| account.has_interest(i))
            }
            AccountFilter::LikesContains(list) => list.iter().all(|l| account.has_liked(l)),
        }
    }
}

fn extend(out: &mut WorkingSet, bucket: &[AccountRef]) {
    for a in bucket {
        out.insert(a.id, a.clone());
    }
}

fn seed_buckets<'a, I>(out: &mut WorkingSet, buckets: I, predicate: &StringPredicate)
where
    I: Iterator<Item = (&'a str, &'a [AccountRef])>,
{
    for (key, bucket) in buckets {
        if predicate.matches(key) {
            extend(out, bucket);
        }
    }
}

/// Evaluate a conjunctive filter chain left to right from an empty working
/// set.
///
/// An empty chain yields an empty result: "all accounts" is never the
/// implicit default. Once the working set drains, the conjunction is
/// settled and remaining filters are skipped (a later filter must not
/// misread "empty" as "not yet seeded").
pub fn filter_accounts(catalog: &Catalog, filters: &[AccountFilter]) -> WorkingSet {
    let mut working = WorkingSet::new();
    for filter in filters {
        working = filter.apply(catalog, working);
        if working.is_empty() {
            break;
        }
    }
    tracing::debug!(
        filters = filters.len(),
        matched = working.len(),
        "filter chain evaluated"
    );
    working
}
