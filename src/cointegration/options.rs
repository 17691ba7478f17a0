//! cointegration::options — configuration for the cointegration analysis.
use crate::{
    errors::{EngineError, EngineResult},
    inference::{hac::HACOptions, kernel::KernelType},
    statistical_tests::{
        diagnostics::{LJUNG_BOX_LAGS, SIGNIFICANCE},
        unit_root::Deterministic,
    },
};
use serde::{Deserialize, Serialize};

/// CointegrationOptions — knobs for the unit-root battery, Johansen and
/// the error-correction model.
///
/// Fields
/// ------
/// - `det_order`: Johansen deterministic order in `{−1, 0, 1}`.
/// - `k_ar_diff`: lagged differences in the Johansen VECM.
/// - `unit_root_deterministic`: deterministic terms of the panel battery.
/// - `significance`: gate level for Engle–Granger and every verdict.
/// - `ecm_bandwidth_cap`: upper bound on the ECM HAC lag.
/// - `ecm_min_obs`: smallest ECM sample that is estimated.
/// - `lb_lags`: Ljung–Box lag of the residual diagnostics.
/// - `hac_lags`: forced HAC lag count for the long-run relation (pooled and
///   per regime); `None` uses `⌊4(n/100)^{2/9}⌋`. The ECM keeps its capped
///   rule.
/// - `hac_kernel`, `hac_plug_in`: kernel and Andrews plug-in choice for the
///   long-run relation, as in the levels options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CointegrationOptions {
    pub det_order: i32,
    pub k_ar_diff: usize,
    pub unit_root_deterministic: Deterministic,
    pub significance: f64,
    pub ecm_bandwidth_cap: usize,
    pub ecm_min_obs: usize,
    pub lb_lags: usize,
    pub hac_lags: Option<usize>,
    pub hac_kernel: KernelType,
    pub hac_plug_in: bool,
}

impl CointegrationOptions {
    /// Errors
    /// ------
    /// - `EngineError::InvalidOption` for `det_order ∉ {−1, 0, 1}`, a
    ///   significance outside `(0, 1)`, or a zero bandwidth cap.
    pub fn new(
        det_order: i32, k_ar_diff: usize, unit_root_deterministic: Deterministic, significance: f64,
        ecm_bandwidth_cap: usize, ecm_min_obs: usize, lb_lags: usize, hac_lags: Option<usize>,
    ) -> EngineResult<Self> {
        if !(-1..=1).contains(&det_order) {
            return Err(EngineError::InvalidOption {
                name: "det_order",
                reason: format!("must be -1, 0 or 1, got {det_order}"),
            });
        }
        if !(significance > 0.0 && significance < 1.0) {
            return Err(EngineError::InvalidOption {
                name: "significance",
                reason: format!("must lie in (0, 1), got {significance}"),
            });
        }
        if ecm_bandwidth_cap == 0 {
            return Err(EngineError::InvalidOption {
                name: "ecm_bandwidth_cap",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            det_order,
            k_ar_diff,
            unit_root_deterministic,
            significance,
            ecm_bandwidth_cap,
            ecm_min_obs,
            lb_lags,
            hac_lags,
            hac_kernel: KernelType::Bartlett,
            hac_plug_in: false,
        })
    }

    /// Same options with another HAC kernel and bandwidth rule for the
    /// long-run relation.
    pub fn with_hac_kernel(self, hac_kernel: KernelType, hac_plug_in: bool) -> Self {
        Self { hac_kernel, hac_plug_in, ..self }
    }

    /// HAC options for the pooled and per-regime long-run fits.
    pub fn long_run_hac(&self) -> HACOptions {
        HACOptions::from_policy(self.hac_lags, self.hac_kernel, self.hac_plug_in)
    }
}

impl Default for CointegrationOptions {
    fn default() -> Self {
        Self {
            det_order: 1,
            k_ar_diff: 1,
            unit_root_deterministic: Deterministic::ConstantTrend,
            significance: SIGNIFICANCE,
            ecm_bandwidth_cap: 7,
            ecm_min_obs: 30,
            lb_lags: LJUNG_BOX_LAGS,
            hac_lags: None,
            hac_kernel: KernelType::Bartlett,
            hac_plug_in: false,
        }
    }
}
