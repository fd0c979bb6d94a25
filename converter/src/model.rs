//! Persisted converter models.

use serde::{Deserialize, Serialize};

use xbridge_store::Record;
use xbridge_types::{BridgeTxType, Timestamp, TxStatus};

/// A heterogeneous-chain transaction awaiting confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnconfirmedTx {
    /// Hash on the watched chain, `0x`-prefixed hex. Identifies the record.
    pub tx_hash: String,
    pub tx_type: BridgeTxType,
    /// Hash of the matching bridge-side transaction, once one exists.
    pub bridge_tx_hash: Option<String>,
    pub from: String,
    pub to: String,
    /// Amount in the asset's smallest unit.
    pub value: u128,
    pub decimals: u8,
    pub asset_id: u32,
    pub block_height: u64,
    pub tx_time: Timestamp,
    pub status: TxStatus,
    pub confirmations: u32,
    /// How many times the bridge-side action was re-broadcast.
    pub resend_count: u32,
}

impl UnconfirmedTx {
    pub fn new(tx_hash: impl Into<String>, tx_type: BridgeTxType, block_height: u64) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            tx_type,
            bridge_tx_hash: None,
            from: String::new(),
            to: String::new(),
            value: 0,
            decimals: 18,
            asset_id: 0,
            block_height,
            tx_time: Timestamp::EPOCH,
            status: TxStatus::Unconfirmed,
            confirmations: 0,
            resend_count: 0,
        }
    }

    /// Record one more confirmation; returns the new total.
    pub fn confirm(&mut self) -> u32 {
        self.confirmations = self.confirmations.saturating_add(1);
        self.confirmations
    }

    /// Whether `required` confirmations have been reached.
    pub fn is_confirmed(&self, required: u32) -> bool {
        self.confirmations >= required
    }
}

impl Record for UnconfirmedTx {
    fn record_id(&self) -> &str {
        &self.tx_hash
    }
}
