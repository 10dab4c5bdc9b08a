//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input schema (`REQUIRED_COLUMNS`, `Factor`, `Outcome`)
//! - run configuration (`RunConfig`, `FitOptions`)
//! - fit outputs (`OrderedFit`, `FactorSummary`)

pub mod types;

pub use types::*;
