use dashmap::DashMap;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::VoteStore;
use crate::error::VoteError;
use crate::models::{ItemId, VisitorFingerprint, VoteValue};
use crate::voting::tally::calculate_tally;
use crate::voting::{AggregateTally, CastOutcome};

/// Applies votes and answers tally queries on top of a `VoteStore`.
///
/// The load/check/save cycle of `cast_vote` runs under a per-item async
/// mutex, so concurrent first votes on one item are never lost and the same
/// visitor can't get two votes in. Different items don't contend.
pub struct VotingEngine {
    store: Arc<dyn VoteStore>,
    item_locks: DashMap<ItemId, Arc<Mutex<()>>>,
}

impl VotingEngine {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self {
            store,
            item_locks: DashMap::new(),
        }
    }

    fn item_lock(&self, item_id: ItemId) -> Arc<Mutex<()>> {
        // Clone out of the map so the shard guard is released before we await
        self.item_locks.entry(item_id).or_default().clone()
    }

    pub async fn cast_vote(
        &self,
        item_id: ItemId,
        fingerprint: &VisitorFingerprint,
        vote: &str,
    ) -> Result<CastOutcome, VoteError> {
        let vote = vote.parse::<VoteValue>().map_err(|e| {
            warn!("Rejected malformed vote {:?} for item {}", vote, item_id);
            e
        })?;

        let lock = self.item_lock(item_id);
        let result = {
            let _guard = lock.lock().await;
            self.record_vote(item_id, fingerprint, vote).await
        };
        drop(lock);

        // Whoever still holds a clone keeps the entry alive for the next voter
        self.item_locks.remove_if(&item_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    // Load, check and save. Callers hold the item lock
    async fn record_vote(
        &self,
        item_id: ItemId,
        fingerprint: &VisitorFingerprint,
        vote: VoteValue,
    ) -> Result<CastOutcome, VoteError> {
        let mut record = self.store.load(item_id).await?;

        if record.has_voted(fingerprint) {
            info!("Visitor {} already voted on item {}", fingerprint.short(), item_id);
            return Err(VoteError::AlreadyVoted);
        }

        record.insert(fingerprint.record_key(), vote);
        self.store.save(item_id, &record).await?;

        let tally = calculate_tally(&record);
        info!(
            "Recorded {} vote on item {} from visitor {} ({} total)",
            vote,
            item_id,
            fingerprint.short(),
            tally.total_votes()
        );

        Ok(CastOutcome { vote, tally })
    }

    pub async fn get_tally(&self, item_id: ItemId) -> Result<AggregateTally, VoteError> {
        let record = self.store.load(item_id).await?;
        Ok(calculate_tally(&record))
    }

    /// The visitor's prior vote on the item (always `None` for unknown
    /// visitors) together with the tally, from a single load.
    pub async fn visitor_state(
        &self,
        item_id: ItemId,
        fingerprint: &VisitorFingerprint,
    ) -> Result<(Option<VoteValue>, AggregateTally), VoteError> {
        let record = self.store.load(item_id).await?;
        debug!("Loaded {} vote(s) for item {}", record.len(), item_id);
        Ok((record.vote_of(fingerprint), calculate_tally(&record)))
    }
}
