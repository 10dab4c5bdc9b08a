//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - drive the BFGS optimizer over the ordered logit likelihood
//! - derive standard errors, Wald tests and fit diagnostics

pub mod fitter;

pub use fitter::*;
