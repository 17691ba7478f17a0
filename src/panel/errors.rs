//! Errors raised while constructing or reshaping a [`Panel`](super::Panel).
//!
//! A panel is the one input every estimation component shares, so all of
//! its invariants (ordering, finiteness, the unit-interval treatment) are
//! checked once at construction and reported through [`PanelError`].

use chrono::NaiveDate;

pub type PanelResult<T> = Result<T, PanelError>;

/// PanelError — validation failures for daily panels and regime schedules.
///
/// Variants
/// --------
/// - `EmptyPanel`
///   No observations remain (either supplied empty or filtered away).
/// - `LengthMismatch { series, expected, found }`
///   A column does not have one value per date.
/// - `NonIncreasingDates { index, previous, current }`
///   Dates are not strictly increasing at `index`.
/// - `NonFiniteValue { series, index, value }`
///   A required column holds NaN or ±∞.
/// - `TreatmentOutOfRange { index, value }`
///   Treatment share outside `[0, 1]`.
/// - `DuplicateSeries { name }`
///   An auxiliary series name is already taken.
/// - `InvalidWinsorPct { pct }`
///   Winsorization tail probability outside `(0, 0.5)`.
/// - `InvalidSchedule { reason }`
///   Regime boundaries are empty, unordered, or reuse a name.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    EmptyPanel,
    LengthMismatch { series: String, expected: usize, found: usize },
    NonIncreasingDates { index: usize, previous: NaiveDate, current: NaiveDate },
    NonFiniteValue { series: String, index: usize, value: f64 },
    TreatmentOutOfRange { index: usize, value: f64 },
    DuplicateSeries { name: String },
    InvalidWinsorPct { pct: f64 },
    InvalidSchedule { reason: &'static str },
}

impl std::error::Error for PanelError {}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelError::EmptyPanel => write!(f, "Panel contains no observations"),
            PanelError::LengthMismatch { series, expected, found } => {
                write!(f, "Series '{series}' has {found} values, expected {expected}")
            }
            PanelError::NonIncreasingDates { index, previous, current } => write!(
                f,
                "Dates must be strictly increasing: {current} at index {index} follows {previous}"
            ),
            PanelError::NonFiniteValue { series, index, value } => {
                write!(f, "Series '{series}' has non-finite value {value} at index {index}")
            }
            PanelError::TreatmentOutOfRange { index, value } => {
                write!(f, "Treatment share {value} at index {index} lies outside [0, 1]")
            }
            PanelError::DuplicateSeries { name } => {
                write!(f, "Series '{name}' is already present in the panel")
            }
            PanelError::InvalidWinsorPct { pct } => {
                write!(f, "Invalid winsorization tail probability {pct}: must lie in (0, 0.5)")
            }
            PanelError::InvalidSchedule { reason } => write!(f, "Invalid regime schedule: {reason}"),
        }
    }
}
