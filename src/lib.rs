//! Catalog pricing and read-side aggregation for a service marketplace.
//!
//! Every aggregator works on collections that were already fetched; none
//! of them performs I/O. [`services::SnapshotLoader`] is the only reader.

pub mod services;
pub mod types;
