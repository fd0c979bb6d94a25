//! Shared utilities for the xbridge converter.

pub mod logging;

pub use logging::{build_subscriber, init_logging, init_test_tracing, LogFormat};
