//! levels::results — output records of the levels/dynamics engine.
//!
//! Each record wraps the [`FittedSpec`] of its regression together with the
//! quantities each regression is run for (long-run effects,
//! persistence, selected ARMA order, FGLS ρ). Records are created by one
//! estimator call and never mutated afterwards.
use crate::{
    inference::delta::SemiElasticity,
    levels::arma::ArmaFit,
    outcome::{Derived, Outcome, SweepSummary},
    regression::fitted::{Coefficient, FittedSpec, LinearEstimate},
};
use serde::Serialize;

/// Attached to every first-difference fit.
pub const TRANSLATION_NOTE: &str = "First-difference coefficients measure the short-run response of \
the outcome's daily change to a same-day change in treatment. Levels coefficients measure the total \
association between treatment and outcome levels. The two are different estimands and are not \
directly comparable without assumptions about the adjustment dynamics.";

/// Main specification plus the semi-elasticity of its treatment slope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainSpecFit {
    pub spec: FittedSpec,
    pub treatment: Coefficient,
    pub semi_elasticity: SemiElasticity,
}

/// Distributed-lag specification and its summed long-run effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributedLagFit {
    pub spec: FittedSpec,
    pub lags: Vec<usize>,
    /// Contemporaneous plus lag coefficients, SE from `sqrt(aᵀVa)`.
    pub long_run: LinearEstimate,
    pub long_run_semi: SemiElasticity,
}

/// Partial-adjustment (geometric lag) specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KoyckFit {
    pub spec: FittedSpec,
    /// Coefficient on the lagged outcome.
    pub rho: Coefficient,
    pub short_run: Coefficient,
    /// `1 − ρ`.
    pub adjustment_speed: f64,
    /// `short_run / (1 − ρ)`; undefined when `ρ ≥ 1`.
    pub long_run: Derived<LinearEstimate>,
    pub long_run_semi: Derived<SemiElasticity>,
}

/// One `(p, q)` cell of the ARMA error grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmaGridCell {
    pub p: usize,
    pub q: usize,
    pub fit: Outcome<ArmaFit>,
}

impl ArmaGridCell {
    pub fn aic(&self) -> Option<f64> {
        self.fit.fitted().map(|f| f.aic)
    }

    pub fn bic(&self) -> Option<f64> {
        self.fit.fitted().map(|f| f.bic)
    }

    pub fn durbin_watson(&self) -> Option<f64> {
        self.fit.fitted().and_then(ArmaFit::durbin_watson)
    }

    pub fn ljung_box_p(&self) -> Option<f64> {
        self.fit.fitted().and_then(ArmaFit::ljung_box_p)
    }
}

/// Every grid cell, the AIC-selected order, and the sweep bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmaGridResult {
    pub cells: Vec<ArmaGridCell>,
    pub selected: Option<(usize, usize)>,
    pub summary: SweepSummary,
}

impl ArmaGridResult {
    pub fn best(&self) -> Option<&ArmaFit> {
        let (p, q) = self.selected?;
        self.cells.iter().find(|c| c.p == p && c.q == q).and_then(|c| c.fit.fitted())
    }
}

/// Prais–Winsten feasible GLS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FglsFit {
    pub rho: f64,
    /// Fit on the transformed data (classical covariance).
    pub spec: FittedSpec,
    pub ols_durbin_watson: Option<f64>,
    pub transformed_durbin_watson: Option<f64>,
}

/// First-difference robustness fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceFit {
    pub spec: FittedSpec,
    pub translation_note: &'static str,
}
