//! Standard logistic distribution.
//!
//! Numerical notes:
//! - `cdf` branches on the sign of `x` so `exp` never overflows.
//! - `cdf(±∞)` is exactly `1` / `0`, which the ordinal likelihood relies on for
//!   the open-ended outer categories.

/// `F(x) = 1 / (1 + e^{-x})`.
pub fn cdf(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `f(x) = F(x) (1 - F(x))`.
pub fn pdf(x: f64) -> f64 {
    let p = cdf(x);
    p * (1.0 - p)
}

/// Quantile function (`logit`), defined for `0 < p < 1`.
pub fn ppf(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
