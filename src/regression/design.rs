//! regression::design — named design matrices with row and column screening.
//!
//! Purpose
//! -------
//! Turn named column vectors (which may contain NaN for undefined lags,
//! leads, differences or missing auxiliary values) into a dense design
//! matrix ready for OLS.
//!
//! Key behaviors
//! -------------
//! - Rows with a NaN in the response or any column are dropped, never
//!   imputed. The surviving rows keep their dates.
//! - Columns are either *required* (the intercept, the treatment and the
//!   regressors a specification is about) or *optional* (regime flags,
//!   calendar controls, event indicators). Optional columns that are
//!   constant or collinear over the retained rows are removed and listed in
//!   [`Design::dropped`]; a collinear required column makes the build fail
//!   with [`EngineError::SingularDesign`] naming it.
//! - Screening visits required columns first so an optional column can never
//!   push a required one out.
//!
//! Conventions
//! -----------
//! - The intercept is called `const` and is always the first column.
use crate::{
    errors::{EngineError, EngineResult},
    regression::linalg::{COLLINEARITY_TOL, screen_columns},
};
use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1, Axis};

pub const INTERCEPT: &str = "const";

#[derive(Debug, Clone)]
struct Column {
    name: String,
    values: Vec<f64>,
    required: bool,
}

/// Accumulates named columns over a common date index.
#[derive(Debug, Clone)]
pub struct DesignBuilder {
    dates: Vec<NaiveDate>,
    response_name: String,
    response: Vec<f64>,
    columns: Vec<Column>,
}

impl DesignBuilder {
    /// Start a design for `response` over `dates`, with an intercept.
    pub fn new(dates: &[NaiveDate], response_name: impl Into<String>, response: Vec<f64>) -> Self {
        let intercept = Column { name: INTERCEPT.to_string(), values: vec![1.0; dates.len()], required: true };
        DesignBuilder {
            dates: dates.to_vec(),
            response_name: response_name.into(),
            response,
            columns: vec![intercept],
        }
    }

    pub fn required(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push(Column { name: name.into(), values, required: true });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push(Column { name: name.into(), values, required: false });
        self
    }

    pub fn required_many<I>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        columns.into_iter().fold(self, |b, (name, values)| b.required(name, values))
    }

    pub fn optional_many<I>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        columns.into_iter().fold(self, |b, (name, values)| b.optional(name, values))
    }

    /// Drop undefined rows, screen columns, and assemble the matrix.
    ///
    /// Errors
    /// ------
    /// - `EngineError::EmptySample` when no row is fully defined.
    /// - `EngineError::SingularDesign` when a required column is constant or
    ///   collinear with earlier required columns.
    pub fn build(self, spec: &str) -> EngineResult<Design> {
        let n_total = self.dates.len();
        let rows: Vec<usize> = (0..n_total)
            .filter(|&t| {
                self.response.get(t).is_some_and(|v| v.is_finite())
                    && self.columns.iter().all(|c| c.values.get(t).is_some_and(|v| v.is_finite()))
            })
            .collect();
        if rows.is_empty() {
            return Err(EngineError::EmptySample { spec: spec.to_string() });
        }

        let n = rows.len();
        let k_all = self.columns.len();
        let full = Array2::from_shape_fn((n, k_all), |(i, j)| self.columns[j].values[rows[i]]);
        let order: Vec<usize> = (0..k_all)
            .filter(|&j| self.columns[j].required)
            .chain((0..k_all).filter(|&j| !self.columns[j].required))
            .collect();
        let (_, dependent) = screen_columns(&full, &order, COLLINEARITY_TOL);

        let offending: Vec<String> = dependent
            .iter()
            .filter(|&&j| self.columns[j].required)
            .map(|&j| self.columns[j].name.clone())
            .collect();
        if !offending.is_empty() {
            return Err(EngineError::SingularDesign { spec: spec.to_string(), regressors: offending });
        }

        let keep: Vec<usize> = (0..k_all).filter(|j| !dependent.contains(j)).collect();
        let dropped = dependent.iter().map(|&j| self.columns[j].name.clone()).collect();
        Ok(Design {
            dates: rows.iter().map(|&t| self.dates[t]).collect(),
            response_name: self.response_name,
            y: Array1::from_iter(rows.iter().map(|&t| self.response[t])),
            x: full.select(Axis(1), &keep),
            names: keep.iter().map(|&j| self.columns[j].name.clone()).collect(),
            dropped,
        })
    }
}

/// Dense, fully defined design ready for least squares.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub dates: Vec<NaiveDate>,
    pub response_name: String,
    pub y: Array1<f64>,
    pub x: Array2<f64>,
    pub names: Vec<String>,
    pub dropped: Vec<String>,
}

impl Design {
    pub fn n(&self) -> usize {
        self.y.len()
    }

    pub fn k(&self) -> usize {
        self.x.ncols()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.index_of(name).map(|j| self.x.column(j))
    }

    /// Rows `rows` (with repetition) of this design, e.g. a bootstrap draw.
    pub fn select_rows(&self, rows: &[usize]) -> Design {
        Design {
            dates: rows.iter().map(|&t| self.dates[t]).collect(),
            response_name: self.response_name.clone(),
            y: self.y.select(Axis(0), rows),
            x: self.x.select(Axis(0), rows),
            names: self.names.clone(),
            dropped: self.dropped.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Row dropping on NaN, silent narrowing of optional columns, and the
    // singular-design error naming required columns.
    // -------------------------------------------------------------------------

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid test date");
        (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect()
    }

    #[test]
    // Purpose
    // -------
    // Undefined values drop the whole row and the dates follow.
    //
    // Given
    // -----
    // - A lagged regressor with NaN in row 0 and a response NaN in row 3.
    //
    // Expect
    // ------
    // - Rows {1, 2, 4} survive with their dates.
    fn undefined_rows_are_dropped_with_their_dates() {
        // Arrange
        let d = dates(5);
        let builder = DesignBuilder::new(&d, "y", vec![1.0, 2.0, 3.0, f64::NAN, 5.0])
            .required("x_lag1", vec![f64::NAN, 1.0, 4.0, 2.0, 8.0]);

        // Act
        let design = builder.build("test").expect("buildable");

        // Assert
        assert_eq!(design.n(), 3);
        assert_eq!(design.dates, vec![d[1], d[2], d[4]]);
        assert_eq!(design.y.to_vec(), vec![2.0, 3.0, 5.0]);
        assert_eq!(design.names, vec!["const", "x_lag1"]);
    }

    #[test]
    fn constant_optional_column_is_narrowed_away() {
        let d = dates(6);
        let design = DesignBuilder::new(&d, "y", vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0])
            .required("x", vec![0.5, 1.5, 1.0, 2.0, 2.5, 3.5])
            .optional("regime_late", vec![0.0; 6])
            .optional("is_weekend", vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0])
            .build("test")
            .expect("buildable");

        assert_eq!(design.names, vec!["const", "x", "is_weekend"]);
        assert_eq!(design.dropped, vec!["regime_late"]);
    }

    #[test]
    // Purpose
    // -------
    // A required regressor that duplicates another is a hard error that
    // names it, even when an optional column precedes it in insertion order.
    //
    // Given
    // -----
    // - Required x and x_copy = 2x; an optional flag inserted between them.
    //
    // Expect
    // ------
    // - `SingularDesign { regressors: ["x_copy"] }`.
    fn collinear_required_column_is_named() {
        let d = dates(5);
        let x = vec![1.0, 2.0, 4.0, 3.0, 5.0];
        let err = DesignBuilder::new(&d, "y", vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .required("x", x.clone())
            .optional("flag", vec![0.0, 1.0, 0.0, 1.0, 0.0])
            .required("x_copy", x.iter().map(|v| 2.0 * v).collect())
            .build("main")
            .expect_err("singular");

        assert_eq!(
            err,
            EngineError::SingularDesign { spec: "main".into(), regressors: vec!["x_copy".into()] }
        );
    }

    #[test]
    fn all_undefined_rows_is_an_empty_sample() {
        let d = dates(3);
        let err = DesignBuilder::new(&d, "y", vec![f64::NAN; 3]).build("lp_h3").expect_err("empty");
        assert_eq!(err, EngineError::EmptySample { spec: "lp_h3".into() });
    }
}
