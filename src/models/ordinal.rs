//! Ordered logit likelihood.
//!
//! For an outcome with ordered levels `0..K` and linear predictor `η = xβ`:
//!
//! ```text
//! P(y = k | x) = F(θ_k - η) - F(θ_{k-1} - η),   θ_{-1} = -∞, θ_{K-1} = +∞
//! ```
//!
//! with `F` the logistic CDF. The cut-points are kept increasing by fitting
//! unconstrained raw parameters `a`:
//!
//! ```text
//! θ_0 = a_0,   θ_j = θ_{j-1} + exp(a_j)
//! ```
//!
//! The parameter vector is `[β_1..β_p, a_0..a_{K-2}]`.

use nalgebra::DVector;

use crate::math::logistic;
use crate::models::ModelFrame;

/// Floor for per-observation probabilities before taking logs.
const MIN_PROB: f64 = f64::MIN_POSITIVE;

#[derive(Debug, Clone, Copy)]
pub struct OrderedLogit<'a> {
    frame: &'a ModelFrame,
}

impl<'a> OrderedLogit<'a> {
    pub fn new(frame: &'a ModelFrame) -> Self {
        Self { frame }
    }

    pub fn k_exog(&self) -> usize {
        self.frame.k_exog()
    }

    pub fn k_params(&self) -> usize {
        self.frame.k_exog() + self.frame.k_levels() - 1
    }

    /// Exog names followed by `lower/upper` labels for each cut-point.
    pub fn param_names(&self) -> Vec<String> {
        let mut names = self.frame.exog_names.clone();
        for pair in self.frame.levels.windows(2) {
            names.push(format!("{}/{}", pair[0], pair[1]));
        }
        names
    }

    /// Cut-points `θ` from the raw threshold parameters.
    pub fn thresholds(&self, raw: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(raw.len());
        for (j, &a) in raw.iter().enumerate() {
            if j == 0 {
                out.push(a);
            } else {
                out.push(out[j - 1] + a.exp());
            }
        }
        out
    }

    /// Zero slopes and the cut-points matching the marginal outcome frequencies.
    ///
    /// These are exactly the maximum-likelihood estimates of the
    /// thresholds-only (null) model.
    pub fn start_params(&self) -> Vec<f64> {
        let n = self.frame.n_obs() as f64;
        let counts = self.frame.level_counts();

        let mut cum = 0.0;
        let mut cuts = Vec::with_capacity(counts.len() - 1);
        for &c in &counts[..counts.len() - 1] {
            cum += c as f64;
            cuts.push(logistic::ppf(cum / n));
        }

        let mut params = vec![0.0; self.k_exog()];
        for (j, &cut) in cuts.iter().enumerate() {
            if j == 0 {
                params.push(cut);
            } else {
                params.push((cut - cuts[j - 1]).ln());
            }
        }
        params
    }

    /// Log-likelihood of the sample.
    pub fn loglike(&self, params: &[f64]) -> f64 {
        let (eta, cuts) = self.unpack(params);
        let last = self.frame.k_levels() - 1;

        self.frame
            .endog
            .iter()
            .zip(eta.iter())
            .map(|(&k, &e)| {
                let (upper, lower) = bounds(&cuts, k, last);
                let prob = logistic::cdf(upper - e) - logistic::cdf(lower - e);
                prob.max(MIN_PROB).ln()
            })
            .sum()
    }

    /// Analytic gradient of `loglike` with respect to `params`.
    pub fn score(&self, params: &[f64]) -> Vec<f64> {
        let (eta, cuts) = self.unpack(params);
        let last = self.frame.k_levels() - 1;
        let p = self.k_exog();

        let mut w = DVector::<f64>::zeros(self.frame.n_obs());
        let mut g_cut = vec![0.0; cuts.len()];

        for (i, (&k, &e)) in self.frame.endog.iter().zip(eta.iter()).enumerate() {
            let (upper, lower) = bounds(&cuts, k, last);
            let prob = (logistic::cdf(upper - e) - logistic::cdf(lower - e)).max(MIN_PROB);
            let f_upper = logistic::pdf(upper - e);
            let f_lower = logistic::pdf(lower - e);

            w[i] = -(f_upper - f_lower) / prob;
            if k < last {
                g_cut[k] += f_upper / prob;
            }
            if k > 0 {
                g_cut[k - 1] -= f_lower / prob;
            }
        }

        let mut grad: Vec<f64> = (self.frame.exog.transpose() * w).iter().copied().collect();

        // Chain rule through θ_j = a_0 + Σ_{m=1..j} exp(a_m): raw a_m affects
        // every cut-point from j = m on.
        let raw = &params[p..];
        let mut tail = 0.0;
        let mut g_raw = vec![0.0; raw.len()];
        for m in (0..raw.len()).rev() {
            tail += g_cut[m];
            g_raw[m] = if m == 0 { tail } else { tail * raw[m].exp() };
        }
        grad.extend(g_raw);
        grad
    }

    fn unpack(&self, params: &[f64]) -> (DVector<f64>, Vec<f64>) {
        let p = self.k_exog();
        let beta = DVector::from_column_slice(&params[..p]);
        let eta = &self.frame.exog * beta;
        (eta, self.thresholds(&params[p..]))
    }
}

/// Upper and lower cut-point of level `k` (open-ended at both extremes).
fn bounds(cuts: &[f64], k: usize, last: usize) -> (f64, f64) {
    let upper = if k < last { cuts[k] } else { f64::INFINITY };
    let lower = if k > 0 { cuts[k - 1] } else { f64::NEG_INFINITY };
    (upper, lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn toy_frame() -> ModelFrame {
        // Two binary regressors, three outcome levels.
        let x = [
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ];
        let endog = vec![0, 1, 0, 2, 1, 2, 1, 2, 1, 0];
        ModelFrame {
            target: "toy".into(),
            exog: DMatrix::from_fn(x.len(), 2, |r, c| x[r][c]),
            exog_names: vec!["a".into(), "b".into()],
            endog,
            levels: vec![1.0, 2.0, 3.0],
            n_dropped: 0,
        }
    }

    #[test]
    fn thresholds_are_increasing() {
        let frame = toy_frame();
        let model = OrderedLogit::new(&frame);
        let cuts = model.thresholds(&[-1.0, 0.5, -3.0]);
        assert_eq!(cuts[0], -1.0);
        assert!((cuts[1] - (-1.0 + 0.5f64.exp())).abs() < 1e-15);
        assert!(cuts[2] > cuts[1]);
    }

    #[test]
    fn param_names_label_cutpoints() {
        let frame = toy_frame();
        let model = OrderedLogit::new(&frame);
        assert_eq!(model.param_names(), vec!["a", "b", "1/2", "2/3"]);
        assert_eq!(model.k_params(), 4);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let frame = toy_frame();
        let model = OrderedLogit::new(&frame);
        let cuts = model.thresholds(&[-0.4, 0.2]);
        let eta = 0.8;
        let total: f64 = (0..3)
            .map(|k| {
                let (u, l) = bounds(&cuts, k, 2);
                logistic::cdf(u - eta) - logistic::cdf(l - eta)
            })
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn score_matches_finite_differences() {
        let frame = toy_frame();
        let model = OrderedLogit::new(&frame);
        let params = [0.7, -0.3, -0.2, 0.1];
        let grad = model.score(&params);

        for j in 0..params.len() {
            let h = 1e-6;
            let mut up = params;
            let mut dn = params;
            up[j] += h;
            dn[j] -= h;
            let fd = (model.loglike(&up) - model.loglike(&dn)) / (2.0 * h);
            assert!((fd - grad[j]).abs() < 1e-6, "param {j}: fd={fd} analytic={}", grad[j]);
        }
    }

    #[test]
    fn start_params_solve_the_null_model() {
        let frame = toy_frame();
        let model = OrderedLogit::new(&frame);
        let start = model.start_params();
        assert_eq!(&start[..2], &[0.0, 0.0]);

        // Marginal frequencies 3/10, 4/10, 3/10.
        let cuts = model.thresholds(&start[2..]);
        assert!((logistic::cdf(cuts[0]) - 0.3).abs() < 1e-12);
        assert!((logistic::cdf(cuts[1]) - 0.7).abs() < 1e-12);

        let grad = model.score(&start);
        assert!(grad[2].abs() < 1e-10 && grad[3].abs() < 1e-10);
    }

    #[test]
    fn loglike_is_finite_for_extreme_predictors() {
        let frame = toy_frame();
        let model = OrderedLogit::new(&frame);
        let ll = model.loglike(&[900.0, -900.0, 0.0, 0.0]);
        assert!(ll.is_finite());
    }
}
