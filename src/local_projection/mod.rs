//! local_projection — horizon-by-horizon impulse responses.
//!
//! Purpose
//! -------
//! Estimate how a treatment change today moves the outcome's daily change
//! over the following `H` days, aggregate the path into cumulative effects,
//! and run the robustness variants (event-control rebound test, upgrade-
//! window exclusion, Koyck companion, alternative outcomes).
//!
//! Key behaviors
//! -------------
//! - [`LocalProjector::sweep`] fits every horizon independently and records
//!   failures in a [`SweepSummary`](crate::outcome::SweepSummary).
//! - [`bootstrap`] adds moving-block percentile intervals with per-
//!   replication seeding, deterministic with or without `parallel`.
//! - [`cumulative`] sums horizons and documents its variance approximation
//!   as `var_cum_approx`.
//!
//! Testing notes
//! -------------
//! - `projector` tests simulate a known two-day response; `cumulative`
//!   tests use hand-built horizon results so the arithmetic is exact.

pub mod bootstrap;
pub mod cumulative;
pub mod options;
pub mod projector;
pub mod results;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bootstrap::{BootstrapInterval, default_block_len, moving_block_bootstrap};
pub use self::cumulative::{ConservativeInterval, CumulativeEffect, IntervalSource, ScaledEffect};
pub use self::options::{BootstrapOptions, LocalProjectionOptions, OutcomeScale, OutcomeSpec};
pub use self::projector::{LocalProjector, horizon_bandwidth};
pub use self::results::{EventRebound, HorizonFit, HorizonResult, HorizonSweep};

pub mod prelude {
    pub use super::cumulative::{CumulativeEffect, ScaledEffect};
    pub use super::options::{BootstrapOptions, LocalProjectionOptions, OutcomeScale, OutcomeSpec};
    pub use super::projector::LocalProjector;
    pub use super::results::{EventRebound, HorizonFit, HorizonSweep};
}
