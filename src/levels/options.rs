//! levels::options — configuration for the levels/dynamics engine.
//!
//! Purpose
//! -------
//! Collect the knobs of [`LevelsEstimator`](super::LevelsEstimator) in one
//! serializable place: which panel columns play outcome and treatment, the
//! HAC lag override with its kernel and plug-in choice, the optional time
//! trend, the distributed-lag set, the
//! residual-whiteness lag and the ARMA grid bounds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Constructors validate and return `EngineResult`; `Default` carries the
//!   documented defaults (`hac_lags = None`, lags `[1, 7]`, `lb_lags = 10`,
//!   `max_p = 3`, `max_q = 2`).
//! - A distributed-lag set is non-empty, strictly positive and free of
//!   duplicates (duplicates would make the design singular).
use crate::{
    errors::{EngineError, EngineResult},
    inference::{hac::HACOptions, kernel::KernelType},
    optimization::loglik_optimizer::MLEOptions,
    panel::data::SeriesKey,
    statistical_tests::diagnostics::LJUNG_BOX_LAGS,
};
use serde::{Deserialize, Serialize};

/// Which panel columns play outcome and treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSelection {
    pub outcome: SeriesKey,
    pub treatment: SeriesKey,
}

impl Default for VariableSelection {
    fn default() -> Self {
        Self { outcome: SeriesKey::Outcome, treatment: SeriesKey::Treatment }
    }
}

/// LevelsOptions — estimation-time configuration for [`LevelsEstimator`](super::LevelsEstimator).
///
/// Fields
/// ------
/// - `hac_lags`: forced HAC lag count; `None` uses `⌊4(n/100)^{2/9}⌋`.
/// - `hac_kernel`: HAC taper, Bartlett by default.
/// - `hac_plug_in`: with no forced lag count, use the Andrews AR(1) plug-in
///   bandwidth for `hac_kernel` instead of the Newey–West rule.
/// - `time_trend`: append a linear trend `0..n−1` to the main design.
/// - `distributed_lags`: treatment lags used by `estimate_distributed_lags`.
/// - `lb_lags`: Ljung–Box lag attached to every fit's diagnostics.
/// - `mle`: optimizer settings for the ARMA-error likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsOptions {
    pub hac_lags: Option<usize>,
    pub hac_kernel: KernelType,
    pub hac_plug_in: bool,
    pub time_trend: bool,
    pub distributed_lags: Vec<usize>,
    pub lb_lags: usize,
    pub mle: MLEOptions,
}

impl LevelsOptions {
    /// Errors
    /// ------
    /// - `EngineError::InvalidOption` for an empty, zero-containing or
    ///   duplicated lag set, or `lb_lags == 0`.
    pub fn new(
        hac_lags: Option<usize>, time_trend: bool, distributed_lags: Vec<usize>, lb_lags: usize,
        mle: MLEOptions,
    ) -> EngineResult<Self> {
        validate_lag_set(&distributed_lags)?;
        if lb_lags == 0 {
            return Err(EngineError::InvalidOption {
                name: "lb_lags",
                reason: "Ljung-Box lag must be positive".to_string(),
            });
        }
        Ok(Self {
            hac_lags,
            hac_kernel: KernelType::Bartlett,
            hac_plug_in: false,
            time_trend,
            distributed_lags,
            lb_lags,
            mle,
        })
    }

    /// Same options with another HAC kernel and bandwidth rule.
    pub fn with_hac_kernel(self, hac_kernel: KernelType, hac_plug_in: bool) -> Self {
        Self { hac_kernel, hac_plug_in, ..self }
    }

    /// HAC options for every levels fit.
    pub fn hac(&self) -> HACOptions {
        HACOptions::from_policy(self.hac_lags, self.hac_kernel, self.hac_plug_in)
    }
}

impl Default for LevelsOptions {
    fn default() -> Self {
        Self {
            hac_lags: None,
            hac_kernel: KernelType::Bartlett,
            hac_plug_in: false,
            time_trend: false,
            distributed_lags: vec![1, 7],
            lb_lags: LJUNG_BOX_LAGS,
            mle: MLEOptions::default(),
        }
    }
}

/// Bounds of the ARMA(p, q) error grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmaGridOptions {
    pub max_p: usize,
    pub max_q: usize,
    pub lb_lags: usize,
}

impl ArmaGridOptions {
    pub fn new(max_p: usize, max_q: usize, lb_lags: usize) -> EngineResult<Self> {
        if lb_lags == 0 {
            return Err(EngineError::InvalidOption {
                name: "lb_lags",
                reason: "Ljung-Box lag must be positive".to_string(),
            });
        }
        Ok(Self { max_p, max_q, lb_lags })
    }

    /// Every `(p, q)` cell in row-major order, `(0, 0)` included.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..=self.max_p).flat_map(move |p| (0..=self.max_q).map(move |q| (p, q)))
    }
}

impl Default for ArmaGridOptions {
    fn default() -> Self {
        Self { max_p: 3, max_q: 2, lb_lags: LJUNG_BOX_LAGS }
    }
}

pub(crate) fn validate_lag_set(lags: &[usize]) -> EngineResult<()> {
    let invalid = |reason: &str| EngineError::InvalidOption {
        name: "distributed_lags",
        reason: reason.to_string(),
    };
    if lags.is_empty() {
        return Err(invalid("lag set must not be empty"));
    }
    if lags.contains(&0) {
        return Err(invalid("lags must be positive; lag 0 is the contemporaneous term"));
    }
    let mut sorted = lags.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != lags.len() {
        return Err(invalid("lags must be distinct"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::hac::Bandwidth;

    #[test]
    fn defaults_match_documented_values() {
        let opts = LevelsOptions::default();
        assert_eq!(opts.distributed_lags, vec![1, 7]);
        assert_eq!(opts.lb_lags, 10);
        assert_eq!(opts.hac().bandwidth, Bandwidth::NeweyWest);
        assert_eq!(opts.hac().kernel, KernelType::Bartlett);
        assert_eq!(LevelsOptions { hac_lags: Some(3), ..opts.clone() }.hac().bandwidth, Bandwidth::Fixed(3));
        let plug_in = opts.with_hac_kernel(KernelType::QuadraticSpectral, true).hac();
        assert_eq!(plug_in.bandwidth, Bandwidth::PlugIn);
        assert_eq!(plug_in.kernel, KernelType::QuadraticSpectral);
        let grid = ArmaGridOptions::default();
        assert_eq!(grid.cells().count(), 12);
        assert_eq!(grid.cells().next(), Some((0, 0)));
    }

    #[test]
    fn lag_sets_are_validated() {
        let mle = MLEOptions::default();
        assert!(LevelsOptions::new(None, false, vec![], 10, mle.clone()).is_err());
        assert!(LevelsOptions::new(None, false, vec![0, 1], 10, mle.clone()).is_err());
        assert!(LevelsOptions::new(None, false, vec![7, 7], 10, mle.clone()).is_err());
        assert!(LevelsOptions::new(None, true, vec![1, 7, 14], 10, mle).is_ok());
    }
}
