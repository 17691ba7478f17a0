//! Error type for covariance, bandwidth and delta-method routines.
//!
//! `InferenceError` groups plug-in bandwidth failures, dimension and
//! singularity problems in sandwich covariances, and a passthrough for
//! `anyhow` errors raised by the `arima` crate during AR(1) pre-fits.
//! `InferenceResult<T>` is the matching alias.

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Bandwidth selection ----
    /// AR(1) pre-fit is too close to a unit root for the plug-in rule.
    StationarityViolated { phi: f64 },

    /// Plug-in denominator is numerically zero.
    DenominatorTooSmall { denominator: f64 },

    /// Plug-in order other than 1 or 2.
    OrderNotSupported { ord: usize },

    // ---- Covariance construction ----
    /// Score or design dimensions disagree.
    DimensionMismatch { context: &'static str, expected: usize, found: usize },

    /// Fewer observations than parameters.
    InsufficientDegreesOfFreedom { n: usize, k: usize },

    /// Bread matrix `X'X` could not be inverted.
    SingularMatrix { context: &'static str },

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bandwidth selection ----
            InferenceError::StationarityViolated { phi } => {
                write!(f, "Inference Error: Stationarity violated (phi = {phi})")
            }
            InferenceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Inference Error: Denominator too small ({denominator}) in bandwidth calculation"
            ),
            InferenceError::OrderNotSupported { ord } => {
                write!(f, "Inference Error: Order {ord} not supported for bandwidth calculation")
            }

            // ---- Covariance construction ----
            InferenceError::DimensionMismatch { context, expected, found } => write!(
                f,
                "Inference Error: {context} dimension mismatch (expected {expected}, found {found})"
            ),
            InferenceError::InsufficientDegreesOfFreedom { n, k } => write!(
                f,
                "Inference Error: {n} observations cannot support {k} parameters"
            ),
            InferenceError::SingularMatrix { context } => {
                write!(f, "Inference Error: {context} is singular")
            }

            // ---- Anyhow catchall ----
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {msg}"),
        }
    }
}
