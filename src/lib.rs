//! treatment_dynamics — causal-style time-series estimation of a daily
//! treatment's effect on a daily outcome.
//!
//! Purpose
//! -------
//! Serve as the crate root. A caller assembles a validated [`panel::Panel`]
//! (dated outcome, treatment and demand-factor series with a regime
//! schedule), picks options through [`config::EstimationConfig`], and runs
//! the three estimation engines over it.
//!
//! Key behaviors
//! -------------
//! - [`levels`]: levels and dynamics regressions (static, distributed-lag,
//!   Koyck partial adjustment, FGLS AR(1), ARMA error grid) with
//!   HAC inference and residual diagnostics.
//! - [`cointegration`]: unit-root battery, Engle–Granger long-run relation
//!   (pooled and per regime), Johansen trace test and an error-correction
//!   model gated on the long-run relation.
//! - [`local_projection`]: horizon-by-horizon impulse responses with HAC
//!   standard errors, cumulative effects, a moving-block bootstrap and the
//!   event-control robustness checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only the primary regression of an engine returns `Err`; secondary
//!   computations report through [`outcome::Outcome`] so one failed cell
//!   never aborts a sweep.
//! - Every regression aligns observations by calendar date; no engine
//!   assumes positional contiguity of the panel.
//!
//! Conventions
//! -----------
//! - The treatment is a share in `[0, 1]`; reported effects are scaled to a
//!   10 percentage point step.
//! - Logging goes through `tracing`; the crate never installs a subscriber.
//! - The `parallel` feature fans horizon sweeps and bootstrap replications
//!   out over rayon without changing any result.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/` holds end-to-end
//!   scenarios on simulated panels with known coefficients.

pub mod cointegration;
pub mod config;
pub mod errors;
pub mod inference;
pub mod levels;
pub mod local_projection;
pub mod optimization;
pub mod outcome;
pub mod panel;
pub mod regression;
pub mod statistical_tests;

pub mod prelude {
    pub use crate::cointegration::prelude::*;
    pub use crate::config::EstimationConfig;
    pub use crate::errors::{EngineError, EngineResult};
    pub use crate::levels::prelude::*;
    pub use crate::local_projection::prelude::*;
    pub use crate::outcome::{Derived, Outcome, SweepSummary};
    pub use crate::panel::prelude::*;
}
