//! Mock servers for integration testing
//!
//! Simulate the Event Hive backend so the REST client can be exercised
//! without a real deployment.

pub mod backend;

pub use backend::MockBackend;
