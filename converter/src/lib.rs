//! Heterogeneous-chain converter bookkeeping.
//!
//! Tracks transactions seen on a watched chain that are not yet confirmed
//! deeply enough for the bridge to act on, one storage area per chain.

pub mod model;
pub mod storage;

pub use model::UnconfirmedTx;
pub use storage::{UnconfirmedTxStorage, ALL_KEY, KEY_PREFIX};
