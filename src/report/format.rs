//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the preparation/fitting code stays clean and testable
//! - output changes are localized

use chrono::{DateTime, Local};

use crate::domain::{FactorSummary, OrderedFit};

const RULE_WIDTH: usize = 78;

/// Dataset header: source, row count and the levels of each design factor.
pub fn format_dataset_summary(source: &str, n_rows: usize, factors: &[FactorSummary]) -> String {
    let mut out = String::new();

    out.push_str("=== ordfit - Ordinal Logit Models ===\n");
    out.push_str(&format!("Input: {source}\n"));
    out.push_str(&format!("Rows: {n_rows}\n"));
    out.push_str("\nDesign factors:\n");
    for f in factors {
        let levels: Vec<String> = f.levels.iter().map(|l| format!("{}={}", l.level, l.count)).collect();
        out.push_str(&format!("  {:<12} {}", f.column, levels.join(" ")));
        if f.missing > 0 {
            out.push_str(&format!(" (missing={})", f.missing));
        }
        out.push('\n');
    }
    out.push('\n');

    out
}

/// Results summary for one fitted model.
pub fn format_fit_summary(fit: &OrderedFit, now: DateTime<Local>) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    out.push_str(&format!("{:^width$}\n", "OrderedModel Results", width = RULE_WIDTH));
    out.push_str(&heavy);
    out.push('\n');

    let left = [
        ("Dep. Variable:", fit.target.clone()),
        ("Model:", "OrderedModel (logit)".to_string()),
        ("Method:", "Maximum Likelihood".to_string()),
        ("Date:", now.format("%a, %d %b %Y").to_string()),
        ("Time:", now.format("%H:%M:%S").to_string()),
        ("No. Observations:", fit.n_obs.to_string()),
        ("Dropped rows:", fit.n_dropped.to_string()),
    ];
    let right = [
        ("Log-Likelihood:", format!("{:.3}", fit.llf)),
        ("LL-Null:", format!("{:.3}", fit.llnull)),
        ("LLR:", format!("{:.3}", fit.llr)),
        ("Pseudo R-squ.:", format!("{:.4}", fit.prsquared)),
        ("AIC:", format!("{:.2}", fit.aic)),
        ("BIC:", format!("{:.2}", fit.bic)),
        ("Df Model / Resid:", format!("{} / {:.0}", fit.df_model, fit.df_resid)),
    ];
    for ((lk, lv), (rk, rv)) in left.iter().zip(right.iter()) {
        out.push_str(&format!("{lk:<18}{lv:>20}   {rk:<18}{rv:>19}\n"));
    }
    out.push_str(&format!(
        "{:<18}{:>20}\n",
        "Converged:",
        if fit.converged {
            format!("yes ({} iter)", fit.iterations)
        } else {
            format!("no ({} iter)", fit.iterations)
        }
    ));

    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!(
        "{:<30} {:>10} {:>10} {:>8} {:>8}\n",
        "", "coef", "std err", "z", "P>|z|"
    ));
    out.push_str(&light);
    out.push('\n');

    for i in 0..fit.params.len() {
        out.push_str(&format!(
            "{:<30} {:>10.4} {:>10} {:>8} {:>8}\n",
            truncate(&fit.param_names[i], 30),
            fit.params[i],
            fmt_opt(fit.bse[i], 3),
            fmt_opt(fit.zvalues[i], 3),
            fmt_opt(fit.pvalues[i], 3),
        ));
        if i + 1 == fit.k_exog && fit.k_exog > 0 {
            out.push_str(&light);
            out.push('\n');
        }
    }
    out.push_str(&heavy);
    out.push('\n');

    out.push_str(&format!("Outcome levels: {}\n", fmt_vec(&fit.outcome_levels, 0)));
    out.push_str(&format!("Cut-points    : {}\n", fmt_vec(&fit.cutpoints, 4)));
    if !fit.converged {
        out.push_str(&format!("Warning: optimizer stopped without converging ({}).\n", fit.termination));
    }
    out.push('\n');

    out
}

fn fmt_opt(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else {
        "nan".to_string()
    }
}

fn fmt_vec(v: &[f64], decimals: usize) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.decimals$}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
