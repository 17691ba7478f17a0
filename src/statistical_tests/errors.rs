//! statistical_tests::errors — failure modes of test statistics.
//!
//! Purpose
//! -------
//! Describe why a diagnostic or unit-root/cointegration statistic could not
//! be computed. Tests themselves return [`TestResult<T>`]; the estimation
//! layers convert a failure into a non-`Fitted`
//! [`Outcome`](crate::outcome::Outcome) so one failing test never aborts a
//! battery.
//!
//! Conventions
//! -----------
//! - `InsufficientData` maps to `Outcome::InsufficientData`; every other
//!   variant maps to `Outcome::NotComputed` carrying the `Display` text.
use crate::outcome::Outcome;

pub type TestResult<T> = Result<T, TestError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TestError {
    //------ Input validation ------
    InsufficientData { required: usize, available: usize },
    NonFiniteInput { index: usize, value: f64 },
    InvalidLag { lag: usize, n: usize },
    LengthMismatch { expected: usize, found: usize },

    //------ Numerical failures ------
    /// An auxiliary regression had a singular normal matrix.
    SingularRegression { context: &'static str },
    /// A variance or sum of squares that must be positive was not.
    DegenerateStatistic { context: &'static str },

    //------ Johansen configuration ------
    UnsupportedSystem { series: usize },
    InvalidDetOrder { order: i32 },
}

impl std::error::Error for TestError {}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::InsufficientData { required, available } => {
                write!(f, "Need at least {required} observations, found {available}.")
            }
            TestError::NonFiniteInput { index, value } => {
                write!(f, "Invalid data value {value} at index {index}. Must be finite.")
            }
            TestError::InvalidLag { lag, n } => {
                write!(f, "Invalid lag {lag} for a series of length {n}.")
            }
            TestError::LengthMismatch { expected, found } => {
                write!(f, "Series length mismatch: expected {expected}, found {found}.")
            }
            TestError::SingularRegression { context } => {
                write!(f, "Singular auxiliary regression in {context}.")
            }
            TestError::DegenerateStatistic { context } => {
                write!(f, "Degenerate {context}: non-positive variance.")
            }
            TestError::UnsupportedSystem { series } => write!(
                f,
                "Johansen critical values are tabulated for 1 to 3 series, got {series}."
            ),
            TestError::InvalidDetOrder { order } => {
                write!(f, "Deterministic order {order} not in {{-1, 0, 1}}.")
            }
        }
    }
}

impl<T> From<TestResult<T>> for Outcome<T> {
    fn from(result: TestResult<T>) -> Self {
        match result {
            Ok(value) => Outcome::Fitted(value),
            Err(TestError::InsufficientData { required, available }) => {
                Outcome::InsufficientData { required, available }
            }
            Err(err) => Outcome::not_computed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Payload embedding in `Display` and the mapping into `Outcome`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Display messages carry the offending payload.
    //
    // Given
    // -----
    // - `InvalidLag { lag: 12, n: 10 }`.
    //
    // Expect
    // ------
    // - The message mentions both numbers.
    fn invalid_lag_message_includes_payload() {
        // Arrange
        let err = TestError::InvalidLag { lag: 12, n: 10 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("12") && msg.contains("10"), "got: {msg}");
    }

    #[test]
    fn insufficient_data_maps_to_its_outcome_variant() {
        let res: TestResult<f64> = Err(TestError::InsufficientData { required: 50, available: 20 });
        let outcome: Outcome<f64> = res.into();
        assert_eq!(outcome, Outcome::InsufficientData { required: 50, available: 20 });
    }

    #[test]
    fn numerical_failures_map_to_not_computed() {
        let res: TestResult<f64> = Err(TestError::SingularRegression { context: "ADF" });
        let outcome: Outcome<f64> = res.into();
        assert!(matches!(outcome, Outcome::NotComputed { ref reason } if reason.contains("ADF")));
    }
}
