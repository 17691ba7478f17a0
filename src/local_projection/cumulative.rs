//! local_projection::cumulative — cumulative effects over a horizon set.
//!
//! Purpose
//! -------
//! Sum per-horizon responses into a cumulative effect and map it to the
//! reporting scale of the projected outcome.
//!
//! Key behaviors
//! -------------
//! - `β_cum` is the plain sum of the listed horizons' point estimates.
//! - `var_cum_approx` is the sum of per-horizon HAC variances. It ignores
//!   every cross-horizon covariance; the resulting interval can be too
//!   narrow or too wide, and is reported under that name for this reason.
//! - The conservative interval sums per-horizon bounds: bootstrap bounds
//!   when every included horizon has one, HAC bounds otherwise.
//! - Horizons without a fitted result are skipped and listed.
use crate::{
    inference::delta::{SemiElasticity, TREATMENT_STEP, Z_95, semi_elasticity},
    local_projection::{options::OutcomeScale, results::HorizonResult},
    outcome::Outcome,
};
use serde::Serialize;

/// Which per-horizon bounds the conservative interval was summed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntervalSource {
    Bootstrap,
    Hac,
}

/// Sum of per-horizon bounds on the `β` scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConservativeInterval {
    pub beta_low: f64,
    pub beta_high: f64,
    pub source: IntervalSource,
}

/// Cumulative effect on the outcome's reporting scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ScaledEffect {
    /// Log outcome: percent change for a 10pp treatment step.
    SemiElasticity { delta: SemiElasticity, conservative_low: f64, conservative_high: f64 },
    /// Level outcome: `0.10·β_cum` with a delta interval.
    LevelChange { change: f64, ci_low: f64, ci_high: f64 },
}

/// CumulativeEffect — aggregate of the responses at `horizons`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeEffect {
    /// Horizons that entered the sum.
    pub horizons: Vec<usize>,
    /// Requested horizons without a fitted result.
    pub skipped: Vec<usize>,
    pub beta_cum: f64,
    /// `Σ se_h²`; cross-horizon covariance is ignored.
    pub var_cum_approx: f64,
    pub se_cum: f64,
    pub conservative: ConservativeInterval,
    pub effect: ScaledEffect,
}

/// Aggregate exactly the listed `horizons` of a sweep.
pub fn aggregate(
    results: &[HorizonResult], horizons: &[usize], scale: OutcomeScale,
) -> Outcome<CumulativeEffect> {
    let mut included = Vec::new();
    let mut skipped = Vec::new();
    for &h in horizons {
        match results.iter().find(|r| r.h == h).and_then(|r| r.fit.fitted()) {
            Some(fit) => included.push(fit),
            None => skipped.push(h),
        }
    }
    if included.is_empty() {
        return Outcome::not_computed(format!("no fitted horizon among {horizons:?}"));
    }

    let beta_cum: f64 = included.iter().map(|f| f.beta.estimate).sum();
    let var_cum_approx: f64 = included.iter().map(|f| f.beta.std_error.powi(2)).sum();
    let se_cum = var_cum_approx.sqrt();

    let bootstrap: Option<Vec<(f64, f64)>> = included
        .iter()
        .map(|f| f.bootstrap.as_ref().and_then(Outcome::fitted).map(|b| (b.low, b.high)))
        .collect();
    let conservative = match bootstrap {
        Some(bounds) => ConservativeInterval {
            beta_low: bounds.iter().map(|b| b.0).sum(),
            beta_high: bounds.iter().map(|b| b.1).sum(),
            source: IntervalSource::Bootstrap,
        },
        None => ConservativeInterval {
            beta_low: included.iter().map(|f| f.beta.ci_low).sum(),
            beta_high: included.iter().map(|f| f.beta.ci_high).sum(),
            source: IntervalSource::Hac,
        },
    };

    let effect = match scale {
        OutcomeScale::Log => ScaledEffect::SemiElasticity {
            delta: SemiElasticity::from_linear(beta_cum, se_cum),
            conservative_low: semi_elasticity(conservative.beta_low),
            conservative_high: semi_elasticity(conservative.beta_high),
        },
        OutcomeScale::Level => {
            let change = TREATMENT_STEP * beta_cum;
            let half_width = Z_95 * TREATMENT_STEP * se_cum;
            ScaledEffect::LevelChange { change, ci_low: change - half_width, ci_high: change + half_width }
        }
    };

    Outcome::Fitted(CumulativeEffect {
        horizons: included.iter().map(|f| f.h).collect(),
        skipped,
        beta_cum,
        var_cum_approx,
        se_cum,
        conservative,
        effect,
    })
}

/// Aggregate every horizon `0..=through`.
pub fn cumulative_through(
    results: &[HorizonResult], through: usize, scale: OutcomeScale,
) -> Outcome<CumulativeEffect> {
    let horizons: Vec<usize> = (0..=through).collect();
    aggregate(results, &horizons, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        local_projection::{bootstrap::BootstrapInterval, results::HorizonFit},
        panel::series::DatedSeries,
        regression::fitted::{Coefficient, CovarianceKind, FittedSpec},
        statistical_tests::diagnostics::ResidualDiagnostics,
    };
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Arithmetic of the aggregation on hand-built horizon results: sums,
    // skipped horizons, interval sources, and both reporting scales.
    // -------------------------------------------------------------------------

    fn fit(h: usize, beta: f64, se: f64, bootstrap: Option<(f64, f64)>) -> HorizonResult {
        let spec = FittedSpec {
            name: format!("lp_h{h}"),
            response: "d_outcome".to_string(),
            regressors: vec!["d_treatment".to_string()],
            coefficients: Array1::from(vec![beta]),
            covariance: Array2::from_elem((1, 1), se * se),
            covariance_kind: CovarianceKind::Hac { bandwidth: 1 },
            residuals: DatedSeries::new(Vec::new(), Vec::new()),
            fitted_values: Vec::new(),
            n: 100,
            k: 1,
            r_squared: 0.0,
            adj_r_squared: 0.0,
            dropped_regressors: Vec::new(),
            diagnostics: ResidualDiagnostics {
                ljung_box: Outcome::not_computed("hand-built"),
                white: Outcome::not_computed("hand-built"),
                durbin_watson: Outcome::not_computed("hand-built"),
            },
        };
        let bootstrap = bootstrap.map(|(low, high)| {
            Outcome::Fitted(BootstrapInterval { low, high, block_len: 5, replications: 100, succeeded: 100 })
        });
        HorizonResult {
            h,
            fit: Outcome::Fitted(HorizonFit {
                h,
                n: 100,
                bandwidth: 1,
                beta: Coefficient::new("d_treatment", beta, se),
                spec,
                bootstrap,
            }),
        }
    }

    #[test]
    // Purpose
    // -------
    // The cumulative estimate is the exact sum of the listed horizons and the
    // variance is the sum of squared standard errors.
    //
    // Given
    // -----
    // - Horizons 0, 1, 7 with β = 0.3, 0.2, 0.1 and se = 0.1, 0.2, 0.2.
    //
    // Expect
    // ------
    // - aggregate({1, 7}): β = 0.2 + 0.1 bit for bit, var = 0.08.
    // - Log scale maps through the semi-elasticity.
    fn listed_horizons_sum_exactly() {
        // Arrange
        let results = vec![fit(0, 0.3, 0.1, None), fit(1, 0.2, 0.2, None), fit(7, 0.1, 0.2, None)];

        // Act
        let cum = aggregate(&results, &[1, 7], OutcomeScale::Log).into_fitted().expect("fitted");

        // Assert
        assert_eq!(cum.beta_cum, 0.2 + 0.1);
        assert_relative_eq!(cum.var_cum_approx, 0.08, epsilon = 1e-15);
        assert_eq!(cum.horizons, vec![1, 7]);
        assert_eq!(cum.conservative.source, IntervalSource::Hac);
        match cum.effect {
            ScaledEffect::SemiElasticity { delta, conservative_low, .. } => {
                assert_relative_eq!(delta.percent, semi_elasticity(0.3), epsilon = 1e-12);
                assert_relative_eq!(conservative_low, semi_elasticity(cum.conservative.beta_low), epsilon = 1e-12);
            }
            other => panic!("expected semi-elasticity, got {other:?}"),
        }
    }

    #[test]
    fn missing_horizons_are_skipped_and_bootstrap_bounds_preferred() {
        let results = vec![fit(0, 0.3, 0.1, Some((0.1, 0.5))), fit(1, 0.2, 0.2, Some((-0.1, 0.6)))];

        let cum = cumulative_through(&results, 2, OutcomeScale::Log).into_fitted().expect("fitted");

        assert_eq!(cum.skipped, vec![2]);
        assert_eq!(cum.conservative.source, IntervalSource::Bootstrap);
        assert_relative_eq!(cum.conservative.beta_low, 0.0, epsilon = 1e-15);
        assert_relative_eq!(cum.conservative.beta_high, 1.1, epsilon = 1e-15);
        assert!(matches!(aggregate(&results, &[5], OutcomeScale::Log), Outcome::NotComputed { .. }));
    }

    #[test]
    fn level_scale_reports_ten_percent_of_beta() {
        let results = vec![fit(1, 0.4, 0.1, None)];
        let cum = aggregate(&results, &[1], OutcomeScale::Level).into_fitted().expect("fitted");
        match cum.effect {
            ScaledEffect::LevelChange { change, ci_low, ci_high } => {
                assert_relative_eq!(change, 0.04, epsilon = 1e-15);
                assert_relative_eq!(ci_high - change, Z_95 * 0.01, epsilon = 1e-12);
                assert_relative_eq!(change - ci_low, Z_95 * 0.01, epsilon = 1e-12);
            }
            other => panic!("expected level change, got {other:?}"),
        }
    }
}
