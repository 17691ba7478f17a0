//! numerical_stability — parameter transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Keep ARMA error polynomials stationary and invertible during
//! unconstrained optimization, and centralize the small tolerances used by
//! the inference layer (`EIGEN_EPS` for pseudo-inverses, `GENERAL_TOL` for
//! plug-in bandwidth denominators).
//!
//! Conventions
//! -----------
//! - Pure functions over `f64` slices; no I/O, no logging.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, STATIONARITY_MARGIN, pacf_to_ar, pacf_to_ma,
};

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, STATIONARITY_MARGIN, pacf_to_ar, pacf_to_ma,
    };
}
