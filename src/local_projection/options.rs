//! local_projection::options — horizon sweep, bootstrap and outcome choice.
//!
//! Defaults: `H = 56`, cumulative set `{1, 7, 14, 28, 56}`, moving-block
//! bootstrap with `B = 300`, automatic block length and seed 42, event
//! rebound test at `h = 7`, upgrade windows of ±7 days.
use crate::{
    errors::{EngineError, EngineResult},
    panel::data::SeriesKey,
    statistical_tests::diagnostics::LJUNG_BOX_LAGS,
};
use serde::{Deserialize, Serialize};

/// How the projected outcome maps to a reported effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeScale {
    /// Log outcome: cumulative β maps to a percentage semi-elasticity.
    Log,
    /// Level outcome (e.g. utilization): cumulative β maps to `0.10·β`.
    Level,
}

/// Which panel series is projected, and on which scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSpec {
    pub key: SeriesKey,
    pub scale: OutcomeScale,
}

impl OutcomeSpec {
    pub fn log(key: SeriesKey) -> Self {
        Self { key, scale: OutcomeScale::Log }
    }

    pub fn level(key: SeriesKey) -> Self {
        Self { key, scale: OutcomeScale::Level }
    }
}

impl Default for OutcomeSpec {
    fn default() -> Self {
        Self::log(SeriesKey::Outcome)
    }
}

/// BootstrapOptions — moving-block bootstrap of a horizon coefficient.
///
/// Fields
/// ------
/// - `replications`: number of resamples `B`.
/// - `block_len`: block length; `None` uses `max(5, round(n^{1/3}))`.
/// - `seed`: base seed; replication `b` draws from its own stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapOptions {
    pub replications: usize,
    pub block_len: Option<usize>,
    pub seed: u64,
}

impl BootstrapOptions {
    /// Errors
    /// ------
    /// - `EngineError::InvalidOption` for zero replications or a zero block.
    pub fn new(replications: usize, block_len: Option<usize>, seed: u64) -> EngineResult<Self> {
        if replications == 0 {
            return Err(EngineError::InvalidOption {
                name: "replications",
                reason: "must be at least 1".to_string(),
            });
        }
        if block_len == Some(0) {
            return Err(EngineError::InvalidOption {
                name: "block_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self { replications, block_len, seed })
    }

    /// Replications that must succeed for an interval: `max(30, ⌊B/2⌋)`.
    pub fn min_successes(&self) -> usize {
        (self.replications / 2).max(30)
    }
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self { replications: 300, block_len: None, seed: 42 }
    }
}

/// LocalProjectionOptions — configuration for [`LocalProjector`](super::LocalProjector).
///
/// Fields
/// ------
/// - `max_horizon`: `H`; horizons `0..=H` are fitted.
/// - `cumulative_horizons`: `H` values reported by the cumulative table.
/// - `bootstrap`: per-horizon MBB interval; `None` skips the bootstrap.
/// - `event_test_horizon`: horizon of the event-controls rebound test.
/// - `exclusion_half_width`: days dropped on each side of a regime change
///   by the upgrade-window robustness sweep.
/// - `lb_lags`: Ljung–Box lag attached to every horizon fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalProjectionOptions {
    pub max_horizon: usize,
    pub cumulative_horizons: Vec<usize>,
    pub bootstrap: Option<BootstrapOptions>,
    pub event_test_horizon: usize,
    pub exclusion_half_width: i64,
    pub lb_lags: usize,
}

impl LocalProjectionOptions {
    /// Errors
    /// ------
    /// - `EngineError::InvalidOption` when a cumulative horizon or the event
    ///   test horizon exceeds `max_horizon`, or the exclusion half-width is
    ///   negative.
    pub fn new(
        max_horizon: usize, cumulative_horizons: Vec<usize>, bootstrap: Option<BootstrapOptions>,
        event_test_horizon: usize, exclusion_half_width: i64, lb_lags: usize,
    ) -> EngineResult<Self> {
        if let Some(&h) = cumulative_horizons.iter().find(|&&h| h > max_horizon) {
            return Err(EngineError::InvalidOption {
                name: "cumulative_horizons",
                reason: format!("horizon {h} exceeds max_horizon {max_horizon}"),
            });
        }
        if event_test_horizon > max_horizon {
            return Err(EngineError::InvalidOption {
                name: "event_test_horizon",
                reason: format!("{event_test_horizon} exceeds max_horizon {max_horizon}"),
            });
        }
        if exclusion_half_width < 0 {
            return Err(EngineError::InvalidOption {
                name: "exclusion_half_width",
                reason: format!("must be non-negative, got {exclusion_half_width}"),
            });
        }
        Ok(Self {
            max_horizon,
            cumulative_horizons,
            bootstrap,
            event_test_horizon,
            exclusion_half_width,
            lb_lags,
        })
    }
}

impl Default for LocalProjectionOptions {
    fn default() -> Self {
        Self {
            max_horizon: 56,
            cumulative_horizons: vec![1, 7, 14, 28, 56],
            bootstrap: Some(BootstrapOptions::default()),
            event_test_horizon: 7,
            exclusion_half_width: 7,
            lb_lags: LJUNG_BOX_LAGS,
        }
    }
}
