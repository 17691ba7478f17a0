//! Crate-level error type.
//!
//! `EngineError` is what a public estimation operation returns when its
//! primary regression cannot be fit at all. Sub-computations never produce
//! it; they report through [`Outcome`](crate::outcome::Outcome) instead.
//! Lower-layer errors convert in via `From`, so `?` works across layers.
use crate::{
    inference::errors::InferenceError, optimization::errors::OptError, outcome::Outcome,
    panel::errors::PanelError, statistical_tests::errors::TestError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Panel(PanelError),

    /// Required regressors are constant or collinear with earlier columns.
    SingularDesign { spec: String, regressors: Vec<String> },

    /// No usable rows after dropping undefined values.
    EmptySample { spec: String },

    /// A selected series is not held by the panel.
    MissingSeries { key: String },

    InvalidOption { name: &'static str, reason: String },

    Inference(InferenceError),

    Optimization(OptError),

    Test(TestError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl std::error::Error for EngineError {}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Panel(err) => write!(f, "{err}"),
            EngineError::SingularDesign { spec, regressors } => write!(
                f,
                "Engine Error: design for '{spec}' is singular; offending regressor(s): {}",
                regressors.join(", ")
            ),
            EngineError::EmptySample { spec } => {
                write!(f, "Engine Error: no usable observations for '{spec}'")
            }
            EngineError::MissingSeries { key } => {
                write!(f, "Engine Error: series '{key}' is not present in the panel")
            }
            EngineError::InvalidOption { name, reason } => {
                write!(f, "Engine Error: invalid option '{name}': {reason}")
            }
            EngineError::Inference(err) => write!(f, "{err}"),
            EngineError::Optimization(err) => write!(f, "{err}"),
            EngineError::Test(err) => write!(f, "{err}"),
        }
    }
}

impl From<PanelError> for EngineError {
    fn from(err: PanelError) -> Self {
        EngineError::Panel(err)
    }
}

impl From<InferenceError> for EngineError {
    fn from(err: InferenceError) -> Self {
        EngineError::Inference(err)
    }
}

impl From<OptError> for EngineError {
    fn from(err: OptError) -> Self {
        EngineError::Optimization(err)
    }
}

impl From<TestError> for EngineError {
    fn from(err: TestError) -> Self {
        EngineError::Test(err)
    }
}

/// A failed secondary regression becomes a non-`Fitted` variant.
impl<T> From<EngineResult<T>> for Outcome<T> {
    fn from(result: EngineResult<T>) -> Self {
        match result {
            Ok(value) => Outcome::Fitted(value),
            Err(EngineError::Test(TestError::InsufficientData { required, available })) => {
                Outcome::InsufficientData { required, available }
            }
            Err(err) => Outcome::not_computed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_design_names_every_offending_regressor() {
        let err = EngineError::SingularDesign {
            spec: "main".to_string(),
            regressors: vec!["treatment".to_string(), "treatment_copy".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'main'"));
        assert!(msg.contains("treatment, treatment_copy"));
    }

    #[test]
    fn lower_layer_errors_convert() {
        let err: EngineError = InferenceError::SingularMatrix { context: "X'X" }.into();
        assert!(matches!(err, EngineError::Inference(_)));
    }

    #[test]
    fn failed_secondary_regression_maps_to_not_computed() {
        let result: EngineResult<f64> = Err(EngineError::EmptySample { spec: "regime_early".into() });
        let outcome: Outcome<f64> = result.into();
        assert!(matches!(outcome, Outcome::NotComputed { .. }));
    }
}
