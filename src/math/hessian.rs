//! Numerical Hessian and parameter covariance.
//!
//! The ordinal likelihood has a cheap analytic gradient, so the Hessian is
//! built from central differences of the gradient (one column per parameter)
//! and symmetrized. The asymptotic covariance of the MLE is the inverse of the
//! negated Hessian of the log-likelihood.

use nalgebra::{DMatrix, DVector};

/// Relative finite-difference step.
const REL_STEP: f64 = 1e-5;

/// Central-difference Hessian of a function given its gradient.
pub fn numerical_hessian<G>(grad: G, x: &[f64]) -> DMatrix<f64>
where
    G: Fn(&[f64]) -> Vec<f64>,
{
    let k = x.len();
    let mut h = DMatrix::<f64>::zeros(k, k);
    let mut work = x.to_vec();

    for j in 0..k {
        let step = REL_STEP * x[j].abs().max(1.0);

        work[j] = x[j] + step;
        let g_plus = grad(&work);
        work[j] = x[j] - step;
        let g_minus = grad(&work);
        work[j] = x[j];

        for i in 0..k {
            h[(i, j)] = (g_plus[i] - g_minus[i]) / (2.0 * step);
        }
    }

    (&h + h.transpose()) * 0.5
}

/// Covariance `(-H)^{-1}` for a log-likelihood Hessian `H`.
///
/// Returns `None` when `-H` is not positive definite (non-identified or not at
/// a maximum).
pub fn covariance_from_hessian(hessian: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let info = -hessian;
    let chol = info.cholesky()?;
    let cov = chol.inverse();
    if cov.iter().all(|v| v.is_finite()) {
        Some(cov)
    } else {
        None
    }
}

/// Square roots of the covariance diagonal.
pub fn standard_errors(cov: &DMatrix<f64>) -> DVector<f64> {
    cov.diagonal().map(|v| if v >= 0.0 { v.sqrt() } else { f64::NAN })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hessian_of_quadratic_is_exact() {
        // f(x, y) = -(2x^2 + xy + 3y^2)
        let grad = |p: &[f64]| vec![-(4.0 * p[0] + p[1]), -(p[0] + 6.0 * p[1])];
        let h = numerical_hessian(grad, &[0.3, -1.2]);
        assert!((h[(0, 0)] + 4.0).abs() < 1e-6);
        assert!((h[(0, 1)] + 1.0).abs() < 1e-6);
        assert!((h[(1, 0)] + 1.0).abs() < 1e-6);
        assert!((h[(1, 1)] + 6.0).abs() < 1e-6);
    }

    #[test]
    fn covariance_inverts_information() {
        let h = DMatrix::from_row_slice(2, 2, &[-4.0, 0.0, 0.0, -0.25]);
        let cov = covariance_from_hessian(&h).unwrap();
        let se = standard_errors(&cov);
        assert!((se[0] - 0.5).abs() < 1e-12);
        assert!((se[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn indefinite_information_has_no_covariance() {
        let h = DMatrix::from_row_slice(2, 2, &[-1.0, -2.0, -2.0, -1.0]);
        assert!(covariance_from_hessian(&h).is_none());
    }
}
