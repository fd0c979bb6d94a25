//! Key-value engine abstraction and indexed record storage.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`KeyValueEngine`]. [`IndexedRecordStore`] builds the "primary record +
//! all-keys index" pattern on top of any engine, so the rest of the codebase
//! depends only on the trait.

pub mod codec;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexed;
pub mod key_space;
pub mod record;

pub use engine::{BatchOp, KeyValueEngine};
pub use error::StoreError;
pub use index::{IndexState, StringList};
pub use indexed::IndexedRecordStore;
pub use key_space::KeySpace;
pub use record::Record;
