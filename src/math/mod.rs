//! Mathematical utilities: distribution functions and the numerical Hessian.

pub mod hessian;
pub mod logistic;
pub mod normal;

pub use hessian::*;
