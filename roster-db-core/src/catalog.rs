//! Catalog: the account collection plus all secondary indexes
//!
//! Built in a single pass over the bulk-loaded batches, then immutable for
//! the rest of the process. Queries share it behind an `Arc` with no
//! locking; nothing here is ever mutated after `from_accounts` returns.
//!
//! Bucket insertion order follows load order. Consumers must treat buckets
//! as unordered; any externally visible ordering is applied downstream.

use crate::account::{parse_accounts, Account, Sex};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Shared handle to one loaded account
pub type AccountRef = Arc<Account>;

/// The indexed account collection.
///
/// Unique-value maps (id, email) overwrite on collision: the last-loaded
/// account silently wins. Bucket indexes are not corrected when that
/// happens.
#[derive(Default)]
pub struct Catalog {
    by_id: HashMap<i64, AccountRef>,
    by_email: HashMap<String, AccountRef>,
    by_phone: HashMap<String, Vec<AccountRef>>,
    by_sex: HashMap<Sex, Vec<AccountRef>>,
    by_status: HashMap<String, Vec<AccountRef>>,
    by_fname: HashMap<String, Vec<AccountRef>>,
    by_sname: HashMap<String, Vec<AccountRef>>,
    by_country: HashMap<String, Vec<AccountRef>>,
    by_city: HashMap<String, Vec<AccountRef>>,
    by_birth: HashMap<i64, Vec<AccountRef>>,
    by_interest: HashMap<String, Vec<AccountRef>>,
    liked_by: HashMap<String, Vec<AccountRef>>,
    premium_start: HashMap<i64, Vec<AccountRef>>,
    premium_finish: HashMap<i64, Vec<AccountRef>>,
    premium: Vec<AccountRef>,
    no_premium: Vec<AccountRef>,
}

impl Catalog {
    /// Build the catalog from raw batch documents.
    ///
    /// Any parse failure aborts the whole load; nothing is served on top
    /// of a partial dataset.
    pub fn from_documents<I>(documents: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut accounts = Vec::new();
        for document in documents {
            accounts.extend(parse_accounts(document.as_ref())?);
        }
        info!(accounts = accounts.len(), "loaded account batches");
        Ok(Self::from_accounts(accounts))
    }

    /// Build the catalog from already-parsed accounts.
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        let mut catalog = Catalog::default();
        for mut account in accounts {
            account.build_presence_sets();
            catalog.insert(Arc::new(account));
        }
        catalog.log_cardinalities();
        catalog
    }

    fn insert(&mut self, a: AccountRef) {
        self.by_id.insert(a.id, a.clone());
        self.by_email.insert(a.email.clone(), a.clone());
        // bucketed, not unique: the "" bucket collects every account with
        // no phone so presence filters can seed from it; non-empty buckets
        // hold one account each by the uniqueness invariant
        self.by_phone
            .entry(a.phone.clone())
            .or_default()
            .push(a.clone());

        self.by_sex.entry(a.sex).or_default().push(a.clone());
        self.by_status
            .entry(a.status.clone())
            .or_default()
            .push(a.clone());
        self.by_fname
            .entry(a.fname.clone())
            .or_default()
            .push(a.clone());
        self.by_sname
            .entry(a.sname.clone())
            .or_default()
            .push(a.clone());
        self.by_country
            .entry(a.country.clone())
            .or_default()
            .push(a.clone());
        self.by_city
            .entry(a.city.clone())
            .or_default()
            .push(a.clone());
        self.by_birth.entry(a.birth).or_default().push(a.clone());

        for interest in &a.interests {
            self.by_interest
                .entry(interest.clone())
                .or_default()
                .push(a.clone());
        }
        for like in &a.likes {
            self.liked_by
                .entry(like.id.to_string())
                .or_default()
                .push(a.clone());
        }

        match &a.premium {
            Some(p) => {
                self.premium_start.entry(p.start).or_default().push(a.clone());
                self.premium_finish
                    .entry(p.finish)
                    .or_default()
                    .push(a.clone());
                self.premium.push(a);
            }
            None => self.no_premium.push(a),
        }
    }

    /// Per-index cardinalities, observability only
    fn log_cardinalities(&self) {
        info!(
            by_id = self.by_id.len(),
            by_email = self.by_email.len(),
            by_phone = self.by_phone.len(),
            by_sex = self.by_sex.len(),
            by_status = self.by_status.len(),
            by_fname = self.by_fname.len(),
            by_sname = self.by_sname.len(),
            by_country = self.by_country.len(),
            by_city = self.by_city.len(),
            by_birth = self.by_birth.len(),
            by_interest = self.by_interest.len(),
            liked_by = self.liked_by.len(),
            premium_start = self.premium_start.len(),
            premium_finish = self.premium_finish.len(),
            premium = self.premium.len(),
            no_premium = self.no_premium.len(),
            "catalog indexes built"
        );
    }

    /// Number of distinct account ids
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Lookup by primary key
    pub fn account(&self, id: i64) -> Option<&AccountRef> {
        self.by_id.get(&id)
    }

    /// All (email, account) pairs
    pub fn emails(&self) -> impl Iterator<Item = (&str, &AccountRef)> {
        self.by_email.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// (phone, bucket) pairs; the "" bucket holds the phoneless accounts
    pub fn phones(&self) -> impl Iterator<Item = (&str, &[AccountRef])> {
        self.by_phone.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Accounts of one sex
    pub fn sex_bucket(&self, sex: Sex) -> &[AccountRef] {
        self.by_sex.get(&sex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// (status, bucket) pairs
    pub fn statuses(&self) -> impl Iterator<Item = (&str, &[AccountRef])> {
        self.by_status.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// (fname, bucket) pairs
    pub fn fnames(&self) -> impl Iterator<Item = (&str, &[AccountRef])> {
        self.by_fname.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// (sname, bucket) pairs
    pub fn snames(&self) -> impl Iterator<Item = (&str, &[AccountRef])> {
        self.by_sname.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// (country, bucket) pairs
    pub fn countries(&self) -> impl Iterator<Item = (&str, &[AccountRef])> {
        self.by_country
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// (city, bucket) pairs
    pub fn cities(&self) -> impl Iterator<Item = (&str, &[AccountRef])> {
        self.by_city.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// (birth timestamp, bucket) pairs
    pub fn births(&self) -> impl Iterator<Item = (i64, &[AccountRef])> {
        self.by_birth.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Accounts holding one interest
    pub fn interest_bucket(&self, interest: &str) -> &[AccountRef] {
        self.by_interest
            .get(interest)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Accounts that liked one target id (string form)
    pub fn liked_by_bucket(&self, id: &str) -> &[AccountRef] {
        self.liked_by.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// (premium start, bucket) pairs
    pub fn premium_starts(&self) -> impl Iterator<Item = (i64, &[AccountRef])> {
        self.premium_start
            .iter()
            .map(|(k, v)| (*k, v.as_slice()))
    }

    /// Flat partition: accounts with (or without) a premium record
    pub fn premium_partition(&self, has_premium: bool) -> &[AccountRef] {
        if has_premium {
            &self.premium
        } else {
            &self.no_premium
        }
    }
}
