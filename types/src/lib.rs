//! Fundamental types for the xbridge heterogeneous-chain converter.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! chain identifiers, bridge transaction kinds and states, and timestamps.

pub mod chain;
pub mod error;
pub mod state;
pub mod time;

pub use chain::ChainId;
pub use error::TypesError;
pub use state::{BridgeTxType, TxStatus};
pub use time::Timestamp;
