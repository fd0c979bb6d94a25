//! LMDB storage backend for xbridge.
//!
//! Implements [`xbridge_store::KeyValueEngine`] using the `heed` LMDB bindings.
//! Each storage area maps to one named LMDB database within a single environment.

pub mod config;
pub mod environment;
pub mod error;
pub mod integrity;

pub use config::LmdbConfig;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
