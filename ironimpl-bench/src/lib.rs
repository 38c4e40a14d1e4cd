//! # IronImpl Bench
//!
//! Benchmarking utilities for IronImpl performance testing.

pub mod fixtures;
