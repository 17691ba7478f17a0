//! config — one serializable record holding every component's options.
//!
//! Purpose
//! -------
//! Let an external loader read a single JSON document and hand each engine
//! its options. Missing sections and fields take their documented defaults,
//! and [`EstimationConfig::from_json`] re-runs every constructor's
//! validation so a deserialized configuration is as trustworthy as one built
//! in code.
//!
//! Conventions
//! -----------
//! - Winsorization is applied by the caller through
//!   [`EstimationConfig::prepare_panel`]; the engines always assume the panel
//!   they receive is already at the requested level.
use crate::{
    cointegration::CointegrationOptions,
    errors::{EngineError, EngineResult},
    levels::{ArmaGridOptions, LevelsOptions},
    local_projection::{BootstrapOptions, LocalProjectionOptions},
    optimization::loglik_optimizer::{MLEOptions, Tolerances},
    panel::Panel,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default tail share clipped by [`EstimationConfig::prepare_panel`].
pub const WINSOR_PCT: f64 = 0.005;

/// EstimationConfig — options for every engine in one place.
///
/// `winsorize` clips outcome, treatment and demand factor at their
/// `winsor_pct` and `1 − winsor_pct` quantiles before estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    pub winsorize: bool,
    pub winsor_pct: f64,
    pub levels: LevelsOptions,
    pub arma_grid: ArmaGridOptions,
    pub cointegration: CointegrationOptions,
    pub local_projection: LocalProjectionOptions,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            winsorize: false,
            winsor_pct: WINSOR_PCT,
            levels: LevelsOptions::default(),
            arma_grid: ArmaGridOptions::default(),
            cointegration: CointegrationOptions::default(),
            local_projection: LocalProjectionOptions::default(),
        }
    }
}

impl EstimationConfig {
    /// Parse and validate a JSON document.
    ///
    /// Errors
    /// ------
    /// - `EngineError::InvalidOption { name: "config", .. }` on malformed JSON.
    /// - Whatever the component constructors reject.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EstimationConfig = serde_json::from_str(json)
            .map_err(|err| EngineError::InvalidOption { name: "config", reason: err.to_string() })?;
        config.validate()?;
        debug!(?config, "estimation configuration loaded");
        Ok(config)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| EngineError::InvalidOption { name: "config", reason: err.to_string() })
    }

    /// Run every component constructor over the current values.
    pub fn validate(&self) -> EngineResult<()> {
        if self.winsorize && !(self.winsor_pct > 0.0 && self.winsor_pct < 0.5) {
            return Err(EngineError::InvalidOption {
                name: "winsor_pct",
                reason: format!("must lie in (0, 0.5), got {}", self.winsor_pct),
            });
        }
        let l = &self.levels;
        let tols = &l.mle.tols;
        let tols = Tolerances::new(tols.tol_grad, tols.tol_cost, tols.max_iter)?;
        MLEOptions::new(tols, l.mle.line_searcher, l.mle.verbose, l.mle.lbfgs_mem)?;
        LevelsOptions::new(l.hac_lags, l.time_trend, l.distributed_lags.clone(), l.lb_lags, l.mle.clone())?;
        let g = &self.arma_grid;
        ArmaGridOptions::new(g.max_p, g.max_q, g.lb_lags)?;
        let c = &self.cointegration;
        CointegrationOptions::new(
            c.det_order,
            c.k_ar_diff,
            c.unit_root_deterministic,
            c.significance,
            c.ecm_bandwidth_cap,
            c.ecm_min_obs,
            c.lb_lags,
            c.hac_lags,
        )?;
        let lp = &self.local_projection;
        if let Some(b) = &lp.bootstrap {
            BootstrapOptions::new(b.replications, b.block_len, b.seed)?;
        }
        LocalProjectionOptions::new(
            lp.max_horizon,
            lp.cumulative_horizons.clone(),
            lp.bootstrap,
            lp.event_test_horizon,
            lp.exclusion_half_width,
            lp.lb_lags,
        )?;
        Ok(())
    }

    /// The panel every engine should see: winsorized when enabled.
    pub fn prepare_panel(&self, panel: &Panel) -> EngineResult<Panel> {
        if self.winsorize {
            Ok(panel.winsorized(self.winsor_pct)?)
        } else {
            Ok(panel.clone())
        }
    }
}
