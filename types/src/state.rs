//! Bridge transaction kinds and confirmation states.

use serde::{Deserialize, Serialize};

/// What a watched heterogeneous-chain transaction does for the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BridgeTxType {
    /// Assets locked on the heterogeneous chain, to be minted on the bridge side.
    Deposit,
    /// Assets released on the heterogeneous chain after a bridge-side burn.
    Withdraw,
    /// Change of the multi-signature manager set.
    Change,
    /// Upgrade of the bridge contract.
    Upgrade,
}

impl BridgeTxType {
    /// Whether the transaction moves user assets.
    pub fn moves_assets(&self) -> bool {
        matches!(self, Self::Deposit | Self::Withdraw)
    }
}

/// Confirmation progress of a watched transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxStatus {
    /// Seen on chain but not yet deep enough to act on.
    #[default]
    Unconfirmed,
    /// Enough confirmations collected; the bridge-side action is in flight.
    Confirming,
    /// Bridge-side action completed.
    Completed,
    /// The transaction reverted or the bridge-side action was abandoned.
    Failed,
}

impl TxStatus {
    /// Whether no further processing will happen for this transaction.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
