//! outcome — tagged results for sub-computations that may legitimately fail.
//!
//! Purpose
//! -------
//! Give every non-primary estimation step (an ARMA grid cell, a unit-root
//! test, a horizon, a bootstrap interval, a diagnostic) an explicit variant
//! instead of NaN propagation or a swallowed error. Reporting code matches
//! on the variant and renders "N/A" for anything that is not `Fitted`.
//!
//! Conventions
//! -----------
//! - [`Outcome`] covers the *computation* failing (too few rows, optimizer
//!   did not converge, degenerate numerics).
//! - [`Derived`] covers a *transformation* of successful estimates being
//!   undefined (Koyck long run with ρ ≥ 1, half-life with 1 + φ ≤ 0). It is
//!   never a numeric zero or a NaN.
//! - [`SweepSummary`] records how many sub-computations of a sweep were
//!   attempted and which of them failed.
use serde::Serialize;

/// Result of one sub-computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail")]
pub enum Outcome<T> {
    Fitted(T),
    InsufficientData { required: usize, available: usize },
    NonConvergent { attempted: String, reason: String },
    NotComputed { reason: String },
}

impl<T> Outcome<T> {
    pub fn not_computed(reason: impl Into<String>) -> Self {
        Outcome::NotComputed { reason: reason.into() }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, Outcome::Fitted(_))
    }

    pub fn fitted(&self) -> Option<&T> {
        match self {
            Outcome::Fitted(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_fitted(self) -> Option<T> {
        match self {
            Outcome::Fitted(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Fitted(value) => Outcome::Fitted(f(value)),
            Outcome::InsufficientData { required, available } => {
                Outcome::InsufficientData { required, available }
            }
            Outcome::NonConvergent { attempted, reason } => {
                Outcome::NonConvergent { attempted, reason }
            }
            Outcome::NotComputed { reason } => Outcome::NotComputed { reason },
        }
    }

    /// Human-readable reason for a non-`Fitted` variant.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Outcome::Fitted(_) => None,
            Outcome::InsufficientData { required, available } => {
                Some(format!("insufficient data: {available} observations, {required} required"))
            }
            Outcome::NonConvergent { attempted, reason } => {
                Some(format!("{attempted} did not converge: {reason}"))
            }
            Outcome::NotComputed { reason } => Some(format!("not computed: {reason}")),
        }
    }
}

/// A quantity derived from fitted estimates that may be undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail")]
pub enum Derived<T> {
    Value(T),
    Undefined { reason: String },
}

impl<T> Derived<T> {
    pub fn undefined(reason: impl Into<String>) -> Self {
        Derived::Undefined { reason: reason.into() }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Derived::Value(v) => Some(v),
            Derived::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Derived::Value(_))
    }
}

/// Attempted / failed bookkeeping for a sweep of sub-computations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub attempted: usize,
    pub failed: Vec<String>,
}

impl SweepSummary {
    pub fn record<T>(&mut self, label: impl Into<String>, outcome: &Outcome<T>) {
        self.attempted += 1;
        if let Some(reason) = outcome.failure_reason() {
            self.failed.push(format!("{}: {reason}", label.into()));
        }
    }

    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Only non-`Fitted` variants count as failures in a sweep.
    fn sweep_summary_counts_only_failures() {
        // Arrange
        let mut summary = SweepSummary::default();
        let ok: Outcome<f64> = Outcome::Fitted(1.0);
        let short: Outcome<f64> = Outcome::InsufficientData { required: 50, available: 12 };
        let diverged: Outcome<f64> =
            Outcome::NonConvergent { attempted: "ARMA(2,1)".into(), reason: "max iters".into() };

        // Act
        summary.record("a", &ok);
        summary.record("b", &short);
        summary.record("c", &diverged);

        // Assert
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded(), 1);
        assert!(summary.failed[0].starts_with("b: insufficient data"));
        assert!(summary.failed[1].contains("ARMA(2,1)"));
    }

    #[test]
    fn map_preserves_failure_variants() {
        let fitted: Outcome<i32> = Outcome::Fitted(2);
        let failed: Outcome<i32> = Outcome::not_computed("singular");

        assert_eq!(fitted.map(|v| v * 10), Outcome::Fitted(20));
        assert_eq!(failed.map(|v| v * 10), Outcome::NotComputed { reason: "singular".into() });
    }

    #[test]
    fn undefined_is_not_a_value() {
        let d: Derived<f64> = Derived::undefined("rho >= 1");
        assert!(d.value().is_none());
        assert!(!d.is_defined());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let o: Outcome<f64> = Outcome::InsufficientData { required: 50, available: 10 };
        let json = serde_json::to_string(&o).expect("serializable");
        assert_eq!(json, r#"{"status":"InsufficientData","detail":{"required":50,"available":10}}"#);
    }
}
