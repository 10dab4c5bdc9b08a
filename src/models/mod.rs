//! Ordinal regression model implementation.
//!
//! The frame (design matrix + outcome codes) and the likelihood are kept as
//! small, pure pieces so the fitting code only has to drive an optimizer.

pub mod frame;
pub mod ordinal;

pub use frame::*;
pub use ordinal::*;
