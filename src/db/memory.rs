use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{VoteStore, codec};
use crate::error::StoreError;
use crate::models::{ItemId, VoteRecord};

/// In-process vote store. Keeps the same serialized documents the SQLite
/// backend writes, so format problems show up here too.
#[derive(Default)]
pub struct MemoryVoteStore {
    records: RwLock<HashMap<ItemId, String>>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    async fn load(&self, item_id: ItemId) -> Result<VoteRecord, StoreError> {
        let records = self.records.read().await;
        match records.get(&item_id) {
            Some(raw) => codec::decode(raw),
            None => Ok(VoteRecord::new()),
        }
    }

    async fn save(&self, item_id: ItemId, record: &VoteRecord) -> Result<(), StoreError> {
        // Encode before taking the lock so a failed encode leaves the old record
        let raw = codec::encode(record)?;
        self.records.write().await.insert(item_id, raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteValue;

    #[tokio::test]
    async fn missing_item_loads_empty() {
        let store = MemoryVoteStore::new();
        assert!(store.load(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_replaces_the_whole_record() {
        let store = MemoryVoteStore::new();

        let mut first = VoteRecord::new();
        first.insert("a".into(), VoteValue::Positive);
        first.insert("b".into(), VoteValue::Negative);
        store.save(1, &first).await.unwrap();

        let mut second = VoteRecord::new();
        second.insert("c".into(), VoteValue::Positive);
        store.save(1, &second).await.unwrap();

        assert_eq!(store.load(1).await.unwrap(), second);
        assert!(store.load(2).await.unwrap().is_empty());
    }
}
