//! Account entity model and wire-format parsing
//!
//! One `Account` per person, parsed from the bulk-load documents. Two
//! derived presence-sets (interests, liked ids) are attached during catalog
//! construction so multi-valued membership tests are O(1) at query time;
//! they are built exactly once and never recomputed.

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashSet;

/// Account sex, a closed two-value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Sex {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Sex {
    /// Wire form of the value ("m" / "f")
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "m",
            Sex::Female => "f",
        }
    }

    /// Parse a wire value; anything other than "m" / "f" is rejected
    pub fn parse(value: &str) -> Option<Sex> {
        match value {
            "m" => Some(Sex::Male),
            "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// One like: the liked account id and when the like happened
#[derive(Debug, Clone, Deserialize)]
pub struct Like {
    pub id: i64,
    #[serde(rename = "dt")]
    pub ts: i64,
}

/// Premium subscription period, both bounds in Unix seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Premium {
    pub start: i64,
    pub finish: i64,
}

/// An account record.
///
/// String fields use the empty string for "unset". `interest_set` and
/// `like_set` are derived at load time, not part of the wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub sname: String,
    #[serde(default)]
    pub phone: String,
    pub sex: Sex,
    pub birth: i64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    pub joined: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub premium: Option<Premium>,

    /// Presence-set over `interests`
    #[serde(skip)]
    pub interest_set: HashSet<String>,
    /// Presence-set over liked account ids, in string form
    #[serde(skip)]
    pub like_set: HashSet<String>,
}

impl Account {
    /// O(1) membership test against the interests presence-set
    pub fn has_interest(&self, value: &str) -> bool {
        self.interest_set.contains(value)
    }

    /// O(1) membership test against the liked-id presence-set
    pub fn has_liked(&self, id: &str) -> bool {
        self.like_set.contains(id)
    }

    /// Whether a premium subscription covers `ts`, both bounds inclusive
    pub fn premium_active_at(&self, ts: i64) -> bool {
        self.premium
            .as_ref()
            .is_some_and(|p| p.start <= ts && p.finish >= ts)
    }

    /// Build both presence-sets. Called once per account during load.
    pub(crate) fn build_presence_sets(&mut self) {
        self.interest_set = self.interests.iter().cloned().collect();
        self.like_set = self.likes.iter().map(|l| l.id.to_string()).collect();
    }
}

/// Wire shape of one raw document: a batch of accounts
#[derive(Deserialize)]
struct AccountsDocument {
    accounts: Vec<Account>,
}

/// Parse one raw document into its account batch.
///
/// Any malformed input aborts the whole load; there is no partial batch.
pub fn parse_accounts(bytes: &[u8]) -> Result<Vec<Account>> {
    let doc: AccountsDocument = serde_json::from_slice(bytes)?;
    Ok(doc.accounts)
}
