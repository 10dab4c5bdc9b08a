//! Data preparation between ingest and modeling.
//!
//! - categorical recoding of the design factors (`recode`)
//! - composite coder-rating measures (`ratings`)

pub mod ratings;
pub mod recode;

pub use ratings::*;
pub use recode::*;
