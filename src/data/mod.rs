//! Data sources other than the research CSV.
//!
//! - seeded synthetic responses for exercising the pipeline (`synth`)

pub mod synth;

pub use synth::*;
