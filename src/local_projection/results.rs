//! local_projection::results — horizon fits, sweeps and the rebound test.
use crate::{
    local_projection::{
        bootstrap::BootstrapInterval,
        cumulative::{CumulativeEffect, aggregate, cumulative_through},
        options::OutcomeSpec,
    },
    outcome::{Outcome, SweepSummary},
    regression::{
        fitted::{Coefficient, FittedSpec},
        wald::WaldTest,
    },
};
use serde::Serialize;

/// Projection of the outcome change `h` days ahead on today's treatment
/// change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonFit {
    pub h: usize,
    pub n: usize,
    /// HAC lag actually used: `min(base + max(h, 1), n − 1)`.
    pub bandwidth: usize,
    /// Coefficient on the treatment change, HAC inference.
    pub beta: Coefficient,
    pub spec: FittedSpec,
    /// `None` when the bootstrap was not requested.
    pub bootstrap: Option<Outcome<BootstrapInterval>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonResult {
    pub h: usize,
    pub fit: Outcome<HorizonFit>,
}

/// HorizonSweep — one result per horizon `0..=H`, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonSweep {
    pub outcome: OutcomeSpec,
    /// `⌊4(n₀/100)^{2/9}⌋` from the `h = 0` sample, shared by every horizon.
    pub base_bandwidth: usize,
    pub horizons: Vec<HorizonResult>,
    pub summary: SweepSummary,
}

impl HorizonSweep {
    pub fn fit(&self, h: usize) -> Option<&HorizonFit> {
        self.horizons.iter().find(|r| r.h == h).and_then(|r| r.fit.fitted())
    }

    /// `(h, β_h)` for every fitted horizon.
    pub fn response_path(&self) -> Vec<(usize, f64)> {
        self.horizons.iter().filter_map(|r| r.fit.fitted().map(|f| (r.h, f.beta.estimate))).collect()
    }

    /// Cumulative effect over exactly `horizons`.
    pub fn aggregate(&self, horizons: &[usize]) -> Outcome<CumulativeEffect> {
        aggregate(&self.horizons, horizons, self.outcome.scale)
    }

    /// Cumulative effect over `0..=through`.
    pub fn cumulative_through(&self, through: usize) -> Outcome<CumulativeEffect> {
        cumulative_through(&self.horizons, through, self.outcome.scale)
    }

    /// `cumulative_through(H)` for each `H` in `set`.
    pub fn cumulative_table(&self, set: &[usize]) -> Vec<(usize, Outcome<CumulativeEffect>)> {
        set.iter().map(|&h| (h, self.cumulative_through(h))).collect()
    }
}

/// Treatment response at one horizon with and without event indicators,
/// plus a joint HAC Wald test of the indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRebound {
    pub h: usize,
    pub n: usize,
    pub bandwidth: usize,
    pub without_events: Coefficient,
    pub with_events: Coefficient,
    pub event_controls: Vec<String>,
    pub wald: Outcome<WaldTest>,
}
