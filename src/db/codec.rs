use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::models::{VoteRecord, VoteValue};

// Bump when the stored document changes shape, and teach `decode` the old one
pub const RECORD_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    version: u32,
    votes: BTreeMap<String, VoteValue>,
}

pub fn encode(record: &VoteRecord) -> Result<String, StoreError> {
    let stored = StoredRecord {
        version: RECORD_FORMAT_VERSION,
        votes: record.votes().clone(),
    };
    Ok(serde_json::to_string(&stored)?)
}

pub fn decode(raw: &str) -> Result<VoteRecord, StoreError> {
    let stored: StoredRecord = serde_json::from_str(raw)?;
    if stored.version != RECORD_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion(stored.version));
    }
    Ok(VoteRecord::from_votes(stored.votes))
}
