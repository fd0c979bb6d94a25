//! Storage of unconfirmed heterogeneous-chain transactions.

use std::sync::Arc;

use xbridge_store::{IndexState, IndexedRecordStore, KeySpace, KeyValueEngine, StoreError};
use xbridge_types::ChainId;

use crate::UnconfirmedTx;

/// Prefix of per-transaction keys; the transaction hash follows it.
pub const KEY_PREFIX: &str = "UNCONFIRMED_TX-";
/// Key of the list of all stored transaction hashes.
pub const ALL_KEY: &str = "UNCONFIRMED_TX_ALL";

/// Unconfirmed transactions of one watched chain, kept in the chain's storage area.
pub struct UnconfirmedTxStorage<E> {
    chain: ChainId,
    store: IndexedRecordStore<E, UnconfirmedTx>,
}

impl<E: KeyValueEngine> UnconfirmedTxStorage<E> {
    pub fn new(engine: Arc<E>, chain: ChainId) -> Result<Self, StoreError> {
        let keys = KeySpace::new(KEY_PREFIX, ALL_KEY)?;
        Ok(Self {
            chain,
            store: IndexedRecordStore::new(engine, chain.storage_area(), keys),
        })
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Returns 1 when saved, 0 when the tx has no hash or the engine declined the write.
    pub fn save(&self, tx: &UnconfirmedTx) -> Result<usize, StoreError> {
        tracing::debug!(chain = %self.chain, tx_hash = %tx.tx_hash, details = ?tx, "saving unconfirmed tx");
        self.store.save(tx)
    }

    pub fn find_by_tx_hash(&self, tx_hash: &str) -> Result<Option<UnconfirmedTx>, StoreError> {
        self.store.find_by_id(tx_hash)
    }

    pub fn delete_by_tx_hash(&self, tx_hash: &str) -> Result<(), StoreError> {
        tracing::debug!(chain = %self.chain, tx_hash, "deleting unconfirmed tx");
        self.store.delete_by_id(tx_hash)
    }

    /// All stored transactions in the order they were first saved.
    ///
    /// `None` if nothing was ever saved for this chain.
    pub fn find_all(&self) -> Result<Option<Vec<UnconfirmedTx>>, StoreError> {
        self.store.find_all()
    }

    /// Stored transaction hashes in the order they were first saved.
    pub fn tx_hashes(&self) -> Result<IndexState, StoreError> {
        self.store.index()
    }

    pub fn contains(&self, tx_hash: &str) -> Result<bool, StoreError> {
        self.store.contains(tx_hash)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbridge_nullables::NullEngine;
    use xbridge_types::BridgeTxType;

    fn storage() -> (Arc<NullEngine>, UnconfirmedTxStorage<NullEngine>) {
        let engine = Arc::new(NullEngine::new());
        let storage = UnconfirmedTxStorage::new(engine.clone(), ChainId::Ethereum).unwrap();
        (engine, storage)
    }

    fn tx(hash: &str, height: u64) -> UnconfirmedTx {
        UnconfirmedTx::new(hash, BridgeTxType::Deposit, height)
    }

    #[test]
    fn save_find_delete_scenario() {
        let (_engine, storage) = storage();
        let p1 = tx("tx1", 100);
        let p2 = tx("tx2", 101);

        assert_eq!(storage.save(&p1).unwrap(), 1);
        assert_eq!(storage.find_by_tx_hash("tx1").unwrap(), Some(p1.clone()));

        assert_eq!(storage.save(&p2).unwrap(), 1);
        assert_eq!(storage.find_all().unwrap(), Some(vec![p1, p2.clone()]));

        storage.delete_by_tx_hash("tx1").unwrap();
        assert_eq!(storage.find_all().unwrap(), Some(vec![p2]));
        assert_eq!(storage.find_by_tx_hash("tx1").unwrap(), None);
    }

    #[test]
    fn keys_follow_the_chain_area_layout() {
        let (engine, storage) = storage();
        storage.save(&tx("0xdead", 1)).unwrap();
        assert!(engine.get_raw("cv_eth", b"UNCONFIRMED_TX-0xdead").is_some());
        assert!(engine.get_raw("cv_eth", b"UNCONFIRMED_TX_ALL").is_some());
        assert_eq!(engine.area_len("cv_eth"), 2);
    }

    #[test]
    fn updated_tx_keeps_its_position() {
        let (_engine, storage) = storage();
        storage.save(&tx("a", 1)).unwrap();
        storage.save(&tx("b", 2)).unwrap();
        let mut a = tx("a", 1);
        a.confirm();
        storage.save(&a).unwrap();

        let hashes: Vec<_> = storage
            .find_all()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|t| (t.tx_hash, t.confirmations))
            .collect();
        assert_eq!(hashes, vec![("a".to_string(), 1), ("b".to_string(), 0)]);
    }

    #[test]
    fn declined_write_returns_zero() {
        let (engine, storage) = storage();
        engine.reject_writes(true);
        assert_eq!(storage.save(&tx("tx1", 1)).unwrap(), 0);
        engine.reject_writes(false);
        assert!(engine.is_empty());
        assert_eq!(storage.tx_hashes().unwrap(), IndexState::Uninitialized);
    }

    #[test]
    fn engine_failure_propagates() {
        let (engine, storage) = storage();
        storage.save(&tx("tx1", 1)).unwrap();
        engine.fail_io(true);
        assert!(matches!(
            storage.save(&tx("tx2", 2)),
            Err(StoreError::Backend(_))
        ));
        assert!(storage.delete_by_tx_hash("tx1").is_err());
        assert!(storage.find_all().is_err());
        engine.fail_io(false);
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn stale_hash_is_skipped_by_find_all() {
        let (engine, storage) = storage();
        storage.save(&tx("tx1", 1)).unwrap();
        storage.save(&tx("tx2", 2)).unwrap();
        engine.remove_raw("cv_eth", b"UNCONFIRMED_TX-tx2");

        assert_eq!(storage.find_all().unwrap(), Some(vec![tx("tx1", 1)]));
        assert!(storage.contains("tx2").unwrap());
    }

    #[test]
    fn chains_sharing_an_engine_do_not_see_each_other() {
        let engine = Arc::new(NullEngine::new());
        let eth = UnconfirmedTxStorage::new(engine.clone(), ChainId::Ethereum).unwrap();
        let bsc = UnconfirmedTxStorage::new(engine, ChainId::Bsc).unwrap();

        eth.save(&tx("0x1", 1)).unwrap();
        assert_eq!(bsc.find_by_tx_hash("0x1").unwrap(), None);
        assert_eq!(bsc.find_all().unwrap(), None);
        assert_eq!(eth.chain(), ChainId::Ethereum);
    }

    #[test]
    fn concurrent_saves_lose_no_index_entries() {
        let (_engine, storage) = storage();
        std::thread::scope(|s| {
            for worker in 0..8 {
                let storage = &storage;
                s.spawn(move || {
                    for n in 0..25 {
                        let hash = format!("0x{worker:02x}{n:04x}");
                        assert_eq!(storage.save(&tx(&hash, n)).unwrap(), 1);
                    }
                });
            }
        });
        assert_eq!(storage.len().unwrap(), 200);
        assert_eq!(storage.find_all().unwrap().unwrap().len(), 200);
    }
}
