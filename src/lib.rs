//! `ordinal-ratings` library crate.
//!
//! The binary (`ordfit`) is a thin wrapper around this library so that:
//!
//! - the preparation and fitting steps are testable without spawning processes
//! - the pipeline can be driven on in-memory tables as well as files

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod prep;
pub mod report;
