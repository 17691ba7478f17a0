//! cointegration — long-run equilibrium between outcome and treatment.
//!
//! Purpose
//! -------
//! Test the panel's series for unit roots, look for a cointegrating
//! relation (Engle–Granger and Johansen), and estimate an error-correction
//! model when one exists.
//!
//! Key behaviors
//! -------------
//! - [`CointegrationAnalyzer::run`] executes the full sequence and returns a
//!   [`CointegrationReport`]; each step is also callable on its own.
//! - The Engle–Granger gate returns an explicit [`EcmDecision`], never a
//!   silent fallback.
//!
//! Testing notes
//! -------------
//! - `analyzer` tests simulate cointegrated random-walk systems with a known
//!   adjustment speed; `battery` tests use white noise against its running
//!   sum.

pub mod analyzer;
pub mod battery;
pub mod options;
pub mod results;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::analyzer::{CointegrationAnalyzer, half_life};
pub use self::battery::{StationarityVerdict, UnitRootBattery};
pub use self::options::CointegrationOptions;
pub use self::results::{
    CointegrationReport, CointegrationVariant, EcmDecision, EcmFit, LongRunRelation,
    RegimeRelation,
};

pub mod prelude {
    pub use super::analyzer::CointegrationAnalyzer;
    pub use super::battery::{StationarityVerdict, UnitRootBattery};
    pub use super::options::CointegrationOptions;
    pub use super::results::{CointegrationReport, EcmDecision, EcmFit, LongRunRelation};
}
