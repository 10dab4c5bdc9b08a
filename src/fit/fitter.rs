//! Maximum-likelihood fitting of the ordered logit model.
//!
//! The optimizer is argmin's BFGS with a More–Thuente line search, run on the
//! mean negative log-likelihood (so the gradient tolerance does not scale with
//! the sample size). After the optimizer stops we compute:
//! - the covariance from a numerical Hessian of the log-likelihood
//! - Wald z statistics and two-sided p-values
//! - likelihood-ratio and information-criterion diagnostics

use argmin::core::{
    CostFunction, Error as ArgminError, Executor, Gradient, State, TerminationReason, TerminationStatus,
};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::BFGS;
use tracing::{debug, info, warn};

use crate::domain::{FitOptions, OrderedFit};
use crate::error::AppError;
use crate::math::{covariance_from_hessian, normal, numerical_hessian, standard_errors};
use crate::models::{ModelFrame, OrderedLogit};

/// Objective handed to the optimizer: `-loglike / n`.
struct MeanNegLoglike<'a> {
    model: OrderedLogit<'a>,
    n: f64,
}

impl CostFunction for MeanNegLoglike<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(-self.model.loglike(params) / self.n)
    }
}

impl Gradient for MeanNegLoglike<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, params: &Self::Param) -> Result<Self::Gradient, ArgminError> {
        Ok(self.model.score(params).into_iter().map(|g| -g / self.n).collect())
    }
}

/// Fit an ordered logit model to a prepared frame.
pub fn fit_ordered_logit(frame: &ModelFrame, opts: &FitOptions) -> Result<OrderedFit, AppError> {
    let target = frame.target.clone();
    let model = OrderedLogit::new(frame);
    let n = frame.n_obs();
    let k = model.k_params();

    let start = model.start_params();
    let llnull = model.loglike(&start);
    debug!(outcome = %target, n, k, llnull, "starting BFGS");

    let fit_err = |e: ArgminError| AppError::Fit {
        target: target.clone(),
        message: e.to_string(),
    };

    let linesearch: MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64> = MoreThuenteLineSearch::new();
    let solver = BFGS::new(linesearch)
        .with_tolerance_grad(opts.grad_tolerance)
        .map_err(fit_err)?;
    let problem = MeanNegLoglike { model, n: n as f64 };

    let res = Executor::new(problem, solver)
        .configure(|state| {
            state
                .param(start.clone())
                .inv_hessian(identity(k))
                .max_iters(opts.max_iters)
        })
        .run()
        .map_err(fit_err)?;

    let state = res.state();
    let params: Vec<f64> = state.get_best_param().cloned().unwrap_or_else(|| start.clone());
    let iterations = state.get_iter();
    let status = state.get_termination_status();
    let converged = matches!(
        status,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    let termination = describe_status(status);

    if !converged {
        warn!("{target}: maximum likelihood optimization did not converge ({termination}) after {iterations} iterations");
    }

    let llf = model.loglike(&params);
    if !llf.is_finite() {
        return Err(AppError::Fit {
            target,
            message: "non-finite log-likelihood at the optimum".to_string(),
        });
    }

    let hessian = numerical_hessian(|p| model.score(p), &params);
    let bse: Vec<f64> = match covariance_from_hessian(&hessian) {
        Some(cov) => standard_errors(&cov).iter().copied().collect(),
        None => {
            warn!("{target}: Hessian is not negative definite; standard errors are unavailable");
            vec![f64::NAN; k]
        }
    };
    let zvalues: Vec<f64> = params.iter().zip(&bse).map(|(b, se)| b / se).collect();
    let pvalues: Vec<f64> = zvalues.iter().map(|z| normal::two_sided_pvalue(*z)).collect();

    let n_f = n as f64;
    let k_f = k as f64;
    let cutpoints = model.thresholds(&params[model.k_exog()..]);

    info!("Model fitting complete for target: {target}");

    Ok(OrderedFit {
        target: target.clone(),
        n_obs: n,
        n_dropped: frame.n_dropped,
        outcome_levels: frame.levels.clone(),
        k_exog: model.k_exog(),
        param_names: model.param_names(),
        params,
        bse,
        zvalues,
        pvalues,
        cutpoints,
        llf,
        llnull,
        llr: 2.0 * (llf - llnull),
        prsquared: 1.0 - llf / llnull,
        aic: -2.0 * llf + 2.0 * k_f,
        bic: -2.0 * llf + k_f * n_f.ln(),
        df_model: model.k_exog(),
        df_resid: n_f - k_f,
        iterations,
        converged,
        termination,
    })
}

fn identity(k: usize) -> Vec<Vec<f64>> {
    (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

fn describe_status(status: &TerminationStatus) -> String {
    match status {
        TerminationStatus::NotTerminated => "not terminated".to_string(),
        TerminationStatus::Terminated(reason) => format!("{reason:?}"),
    }
}
