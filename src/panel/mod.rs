//! panel — the validated daily input shared by every estimator.
//!
//! Purpose
//! -------
//! Represent one in-memory daily time series with its regime annotation,
//! deterministic calendar controls, and optional event indicators supplied
//! by an external collaborator. Loading, cleaning and snapshotting happen
//! upstream; this module only validates and reshapes.
//!
//! Key behaviors
//! -------------
//! - [`Panel`] checks ordering, finiteness and the unit-interval treatment
//!   once at construction and reports failures through [`PanelError`].
//! - [`RegimeSchedule`] is the single value object holding the structural
//!   break dates; it produces mutually exclusive regime flags.
//! - [`CalendarControls`] derives weekend and month-end indicators from the
//!   date alone.
//! - [`EventControls`] is the seam for optional event-day indicators; the
//!   in-memory [`EventCalendar`] implements it.
//! - [`DatedSeries`] keeps residuals keyed by date so re-alignment after
//!   row drops is by date, not position.
//!
//! Conventions
//! -----------
//! - Undefined shifted values are `f64::NAN` inside column vectors and are
//!   dropped (never imputed) when a design is built.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule: construction errors, flag
//!   partition properties, calendar edge days, and date-based lagging.

pub mod calendar;
pub mod data;
pub mod errors;
pub mod events;
pub mod regimes;
pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::calendar::CalendarControls;
pub use self::data::{Panel, SeriesKey};
pub use self::errors::{PanelError, PanelResult};
pub use self::events::{EventCalendar, EventControls};
pub use self::regimes::{RegimeBoundary, RegimeSchedule};
pub use self::series::DatedSeries;

pub mod prelude {
    pub use super::calendar::CalendarControls;
    pub use super::data::{Panel, SeriesKey};
    pub use super::errors::{PanelError, PanelResult};
    pub use super::events::{EventCalendar, EventControls};
    pub use super::regimes::{RegimeBoundary, RegimeSchedule};
    pub use super::series::DatedSeries;
}
