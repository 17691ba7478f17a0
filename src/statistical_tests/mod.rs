//! statistical_tests — residual diagnostics, unit-root and cointegration
//! tests.
//!
//! Purpose
//! -------
//! Collect the test statistics the estimation layers attach to their fits:
//! residual whiteness and heteroskedasticity checks, the unit-root battery,
//! and the Johansen system test.
//!
//! Key behaviors
//! -------------
//! - [`LjungBox`], [`durbin_watson`] and [`WhiteTest`] are bundled by
//!   [`ResidualDiagnostics::compute`] for every fitted specification.
//! - [`unit_root`] provides ADF, KPSS and Phillips–Perron sharing one
//!   [`UnitRootTest`] record.
//! - [`johansen`] computes trace and maximum-eigenvalue statistics with
//!   tabulated critical values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every entry point validates its input with [`validate_series`] before
//!   doing arithmetic and reports failures as [`TestError`]; nothing here
//!   panics on user data.
//! - Callers that must not abort turn a [`TestResult`] into an
//!   [`Outcome`](crate::outcome::Outcome) with `.into()`.
//!
//! Testing notes
//! -------------
//! - Each module carries its own unit tests; the statistical properties
//!   (rejection rates on simulated walks, recovery of a known cointegrating
//!   rank) use seeded `rand_xoshiro` streams so they are reproducible.

pub mod diagnostics;
pub mod distributions;
pub mod durbin_watson;
pub mod errors;
pub mod heteroskedasticity;
pub mod johansen;
pub mod portmanteau;
pub mod unit_root;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::diagnostics::ResidualDiagnostics;
pub use self::durbin_watson::durbin_watson;
pub use self::errors::{TestError, TestResult};
pub use self::heteroskedasticity::WhiteTest;
pub use self::johansen::{JohansenRank, JohansenResult, johansen};
pub use self::portmanteau::LjungBox;
pub use self::unit_root::{Deterministic, UnitRootKind, UnitRootTest};
pub use self::validation::validate_series;

pub mod prelude {
    pub use super::diagnostics::ResidualDiagnostics;
    pub use super::errors::{TestError, TestResult};
    pub use super::johansen::{JohansenResult, johansen};
    pub use super::unit_root::adf::LagSelection;
    pub use super::unit_root::prelude::*;
}
