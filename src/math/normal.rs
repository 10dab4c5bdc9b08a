//! Standard normal tail probabilities for Wald tests.

use statrs::function::erf::erfc;

/// `P(Z > x)` for `Z ~ N(0, 1)`.
pub fn sf(x: f64) -> f64 {
    0.5 * erfc(x / std::f64::consts::SQRT_2)
}

/// Two-sided p-value of a z statistic. NaN in, NaN out.
pub fn two_sided_pvalue(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    (2.0 * sf(z.abs())).min(1.0)
}
