//! Input helpers.
//!
//! - CSV ingest + schema validation (`ingest`)

pub mod ingest;

pub use ingest::*;
