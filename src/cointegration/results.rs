//! cointegration::results — records produced by [`CointegrationAnalyzer`].
//!
//! [`CointegrationAnalyzer`]: crate::cointegration::CointegrationAnalyzer
use crate::{
    cointegration::battery::UnitRootBattery,
    outcome::{Derived, Outcome},
    regression::fitted::{Coefficient, FittedSpec},
    statistical_tests::{johansen::JohansenResult, unit_root::UnitRootTest},
};
use serde::Serialize;

/// Static long-run regression and the Engle–Granger test on its residuals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRunRelation {
    /// Residuals (`spec.residuals`) are the equilibrium errors, keyed by date.
    pub spec: FittedSpec,
    pub engle_granger: Outcome<UnitRootTest>,
}

impl LongRunRelation {
    pub fn engle_granger_p(&self) -> Option<f64> {
        self.engle_granger.fitted().map(|t| t.p_value)
    }

    /// Residual unit root rejected at `alpha`; `None` when EG was not computed.
    pub fn cointegrated_at(&self, alpha: f64) -> Option<bool> {
        self.engle_granger_p().map(|p| p < alpha)
    }
}

/// Long-run relation fitted on one regime's rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeRelation {
    pub regime: String,
    pub relation: Outcome<LongRunRelation>,
}

/// Error-correction model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcmFit {
    pub spec: FittedSpec,
    /// Adjustment speed (coefficient on the lagged equilibrium error).
    pub phi: Coefficient,
    /// Short-run elasticity (coefficient on the treatment change).
    pub psi: Coefficient,
    /// Days for half of a deviation to decay.
    pub half_life: Derived<f64>,
    pub bandwidth: usize,
    pub residual_adf: Outcome<UnitRootTest>,
}

/// Outcome of the Engle–Granger gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EcmDecision {
    Estimated(EcmFit),
    /// No cointegration at the configured level: the first-difference
    /// specification stays the reference.
    RetainedDifferenceSpec { eg_p_value: f64, difference_spec: FittedSpec },
}

impl EcmDecision {
    pub fn ecm(&self) -> Option<&EcmFit> {
        match self {
            EcmDecision::Estimated(fit) => Some(fit),
            EcmDecision::RetainedDifferenceSpec { .. } => None,
        }
    }
}

/// Steps 2 and 4 for one control set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CointegrationVariant {
    pub with_events: bool,
    pub long_run: LongRunRelation,
    pub ecm: Outcome<EcmDecision>,
}

/// Full cointegration analysis of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CointegrationReport {
    pub unit_roots: Vec<UnitRootBattery>,
    pub johansen: Outcome<JohansenResult>,
    pub regimes: Vec<RegimeRelation>,
    pub baseline: CointegrationVariant,
    /// Present only when an event collaborator was supplied.
    pub with_events: Option<CointegrationVariant>,
}
