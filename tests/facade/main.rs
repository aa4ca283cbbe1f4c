//! Facade Integration Tests
//!
//! End-to-end scenarios through `CompatClient` against an in-memory cluster.

#[path = "../common/mod.rs"]
mod common;

mod addressing;
mod batch;
mod connection;
mod counters;
mod duplicates;
mod generation;
mod logging_config;
mod scan;
