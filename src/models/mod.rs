use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::VoteError;

// Content items are owned by the surrounding CMS, we only know their ID
pub type ItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Positive,
    Negative,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Positive => "positive",
            VoteValue::Negative => "negative",
        }
    }
}

impl FromStr for VoteValue {
    type Err = VoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "positive" => Ok(VoteValue::Positive),
            "negative" => Ok(VoteValue::Negative),
            other => Err(VoteError::InvalidVote(other.to_string())),
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anonymous visitor identity derived from request metadata.
///
/// `Unknown` means the request was missing its address or user agent. Such a
/// visitor is never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisitorFingerprint {
    Known(String),
    Unknown,
}

impl VisitorFingerprint {
    // Key used in the vote record. Unknown visitors get a fresh key per vote
    pub fn record_key(&self) -> String {
        match self {
            VisitorFingerprint::Known(hash) => hash.clone(),
            VisitorFingerprint::Unknown => format!("anonymous-{}", Uuid::new_v4().simple()),
        }
    }

    // Short form for log lines
    pub fn short(&self) -> &str {
        match self {
            VisitorFingerprint::Known(hash) => &hash[..hash.len().min(8)],
            VisitorFingerprint::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteRecord {
    votes: BTreeMap<String, VoteValue>,
}

impl VoteRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_votes(votes: BTreeMap<String, VoteValue>) -> Self {
        Self { votes }
    }

    pub fn votes(&self) -> &BTreeMap<String, VoteValue> {
        &self.votes
    }

    pub fn vote_of(&self, fingerprint: &VisitorFingerprint) -> Option<VoteValue> {
        match fingerprint {
            VisitorFingerprint::Known(hash) => self.votes.get(hash).copied(),
            VisitorFingerprint::Unknown => None,
        }
    }

    pub fn has_voted(&self, fingerprint: &VisitorFingerprint) -> bool {
        self.vote_of(fingerprint).is_some()
    }

    // Returns false without touching the record if the key is already present
    pub fn insert(&mut self, key: String, vote: VoteValue) -> bool {
        if self.votes.contains_key(&key) {
            return false;
        }
        self.votes.insert(key, vote);
        true
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_the_two_vote_values() {
        assert_eq!("positive".parse::<VoteValue>().unwrap(), VoteValue::Positive);
        assert_eq!(" negative ".parse::<VoteValue>().unwrap(), VoteValue::Negative);
        assert!(matches!("maybe".parse::<VoteValue>(), Err(VoteError::InvalidVote(v)) if v == "maybe"));
        assert!("Positive".parse::<VoteValue>().is_err());
        assert!("".parse::<VoteValue>().is_err());
    }

    #[test]
    fn unknown_visitor_never_counts_as_voted() {
        let mut record = VoteRecord::new();
        let key = VisitorFingerprint::Unknown.record_key();
        assert!(record.insert(key, VoteValue::Positive));
        assert!(!record.has_voted(&VisitorFingerprint::Unknown));
        assert_ne!(
            VisitorFingerprint::Unknown.record_key(),
            VisitorFingerprint::Unknown.record_key()
        );
    }

    #[test]
    fn insert_keeps_the_first_vote() {
        let mut record = VoteRecord::new();
        assert!(record.insert("abc".into(), VoteValue::Positive));
        assert!(!record.insert("abc".into(), VoteValue::Negative));
        assert_eq!(
            record.vote_of(&VisitorFingerprint::Known("abc".into())),
            Some(VoteValue::Positive)
        );
        assert_eq!(record.len(), 1);
    }
}
