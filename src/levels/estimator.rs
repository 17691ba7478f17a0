//! levels::estimator — the levels/dynamics regression engine.
//!
//! Purpose
//! -------
//! Fit the contemporaneous and dynamic specifications of outcome on
//! treatment over one panel: main HAC regression, distributed lags, Koyck
//! partial adjustment, ARMA errors (single order or grid), Prais–Winsten
//! FGLS, and the first-difference robustness check.
//!
//! Key behaviors
//! -------------
//! - Main design: `const, treatment, demand_factor (when present), regime
//!   flags, is_weekend, is_month_end [, time_trend]`. Regime and calendar
//!   columns are optional and narrow away silently when constant or
//!   collinear; treatment, demand factor and trend are required.
//! - HAC inference from [`LevelsOptions::hac`]: Bartlett with the automatic
//!   bandwidth unless `hac_lags`, `hac_kernel` or `hac_plug_in` say
//!   otherwise.
//! - Every public operation fails only when its primary regression cannot
//!   be fit; dependent pieces (ARMA cells, FGLS ρ, undefined long-run
//!   effects) come back as [`Outcome`] / [`Derived`] variants.
//!
//! Conventions
//! -----------
//! - Lag and lead columns are named `<series>_lag<k>`; differenced columns
//!   `d_<series>`.
use crate::{
    errors::{EngineError, EngineResult},
    inference::delta::SemiElasticity,
    levels::{
        arma::{ArmaFit, fit_arma_errors},
        options::{ArmaGridOptions, LevelsOptions, VariableSelection, validate_lag_set},
        results::{
            ArmaGridCell, ArmaGridResult, DifferenceFit, DistributedLagFit, FglsFit, KoyckFit,
            MainSpecFit, TRANSLATION_NOTE,
        },
    },
    outcome::{Derived, Outcome, SweepSummary},
    panel::{
        data::{Panel, SeriesKey},
        series::{differenced, lagged},
    },
    regression::{
        design::{Design, DesignBuilder},
        fitted::{FittedSpec, LinearEstimate},
        ols::{CovarianceChoice, fit_ols},
    },
};
use ndarray::{Array1, Array2};
use tracing::{debug, warn};

/// AIC differences below this are ties in the ARMA grid.
const AIC_TIE_TOL: f64 = 1e-9;

/// LevelsEstimator — borrows a panel and fits level/dynamic specifications.
#[derive(Debug, Clone)]
pub struct LevelsEstimator<'a> {
    panel: &'a Panel,
    selection: VariableSelection,
    options: LevelsOptions,
}

impl<'a> LevelsEstimator<'a> {
    pub fn new(panel: &'a Panel, selection: VariableSelection, options: LevelsOptions) -> Self {
        Self { panel, selection, options }
    }

    pub fn options(&self) -> &LevelsOptions {
        &self.options
    }

    pub fn selection(&self) -> &VariableSelection {
        &self.selection
    }

    fn series(&self, key: &SeriesKey) -> EngineResult<&'a [f64]> {
        self.panel.series(key).ok_or_else(|| EngineError::MissingSeries { key: key.to_string() })
    }

    fn outcome_label(&self) -> &str {
        self.selection.outcome.label()
    }

    fn treatment_label(&self) -> &str {
        self.selection.treatment.label()
    }

    fn hac(&self) -> CovarianceChoice {
        CovarianceChoice::Hac(self.options.hac())
    }

    /// Builder holding the main-specification columns for `response`.
    fn main_builder(&self, response: Vec<f64>) -> EngineResult<DesignBuilder> {
        let treatment = self.series(&self.selection.treatment)?;
        let calendar = self.panel.calendar_controls();
        let mut builder = DesignBuilder::new(self.panel.dates(), self.outcome_label(), response)
            .required(self.treatment_label(), treatment.to_vec());
        if let Some(demand) = self.panel.demand_factor() {
            builder = builder.required(SeriesKey::DemandFactor.label(), demand.to_vec());
        }
        builder = builder.optional_many(self.panel.regime_flags()).optional_many(
            calendar.columns().into_iter().map(|(name, col)| (name.to_string(), col.to_vec())),
        );
        if self.options.time_trend {
            let trend = (0..self.panel.len()).map(|t| t as f64).collect();
            builder = builder.required("time_trend", trend);
        }
        Ok(builder)
    }

    /// The main-specification design (shared by FGLS and ARMA errors).
    pub fn main_design(&self) -> EngineResult<Design> {
        let outcome = self.series(&self.selection.outcome)?;
        self.main_builder(outcome.to_vec())?.build("main")
    }

    /// OLS with HAC covariance on the main design, plus the treatment
    /// semi-elasticity.
    pub fn estimate_main_spec(&self) -> EngineResult<MainSpecFit> {
        let design = self.main_design()?;
        let spec = fit_ols("main", &design, self.hac(), self.options.lb_lags)?;
        let treatment = spec
            .coefficient(self.treatment_label())
            .ok_or_else(|| EngineError::MissingSeries { key: self.treatment_label().to_string() })?;
        let semi_elasticity = treatment.semi_elasticity();
        debug!(n = spec.n, beta = treatment.estimate, "main specification fitted");
        Ok(MainSpecFit { spec, treatment, semi_elasticity })
    }

    /// Main design plus treatment lags at `lags`; long-run effect is the sum
    /// of the contemporaneous and lag coefficients.
    pub fn estimate_distributed_lags(&self, lags: &[usize]) -> EngineResult<DistributedLagFit> {
        validate_lag_set(lags)?;
        let outcome = self.series(&self.selection.outcome)?;
        let treatment = self.series(&self.selection.treatment)?;
        let mut names = vec![self.treatment_label().to_string()];
        let mut builder = self.main_builder(outcome.to_vec())?;
        for &lag in lags {
            let name = format!("{}_lag{lag}", self.treatment_label());
            builder = builder.required(name.clone(), lagged(treatment, lag));
            names.push(name);
        }
        let design = builder.build("distributed_lags")?;
        let spec = fit_ols("distributed_lags", &design, self.hac(), self.options.lb_lags)?;
        let weights: Vec<(&str, f64)> = names.iter().map(|n| (n.as_str(), 1.0)).collect();
        let long_run = spec
            .linear_combination(&weights)
            .ok_or_else(|| EngineError::MissingSeries { key: names.join(", ") })?;
        let long_run_semi = SemiElasticity::from_linear(long_run.estimate, long_run.std_error);
        Ok(DistributedLagFit { spec, lags: lags.to_vec(), long_run, long_run_semi })
    }

    /// Main design plus the lagged outcome (geometric lag).
    pub fn estimate_koyck_lag(&self) -> EngineResult<KoyckFit> {
        let outcome = self.series(&self.selection.outcome)?;
        let lag_name = format!("{}_lag1", self.outcome_label());
        let design = self
            .main_builder(outcome.to_vec())?
            .required(lag_name.clone(), lagged(outcome, 1))
            .build("koyck")?;
        let spec = fit_ols("koyck", &design, self.hac(), self.options.lb_lags)?;
        let missing = |key: &str| EngineError::MissingSeries { key: key.to_string() };
        let rho = spec.coefficient(&lag_name).ok_or_else(|| missing(&lag_name))?;
        let short_run = spec.coefficient(self.treatment_label()).ok_or_else(|| missing(self.treatment_label()))?;
        let long_run = koyck_long_run(&spec, self.treatment_label(), &lag_name);
        let long_run_semi = match &long_run {
            Derived::Value(lr) => Derived::Value(SemiElasticity::from_linear(lr.estimate, lr.std_error)),
            Derived::Undefined { reason } => Derived::undefined(reason.clone()),
        };
        Ok(KoyckFit {
            adjustment_speed: 1.0 - rho.estimate,
            spec,
            rho,
            short_run,
            long_run,
            long_run_semi,
        })
    }

    /// Main mean specification with ARMA(`ar_order`, `ma_order`) errors.
    pub fn estimate_ar_errors(
        &self, ar_order: usize, ma_order: usize,
    ) -> EngineResult<Outcome<ArmaFit>> {
        let design = self.main_design()?;
        let mle = &self.options.mle;
        Ok(fit_arma_errors("arma_errors", &design, ar_order, ma_order, mle, self.options.lb_lags))
    }

    /// Fit every `(p, q)` cell and select by AIC, ties to the higher
    /// Ljung–Box p-value. Failed cells are recorded and never selected.
    pub fn estimate_arma_grid(&self, grid: &ArmaGridOptions) -> EngineResult<ArmaGridResult> {
        let design = self.main_design()?;
        let mut summary = SweepSummary::default();
        let cells: Vec<ArmaGridCell> = grid
            .cells()
            .map(|(p, q)| {
                let fit = fit_arma_errors("arma_grid", &design, p, q, &self.options.mle, grid.lb_lags);
                summary.record(format!("ARMA({p},{q})"), &fit);
                ArmaGridCell { p, q, fit }
            })
            .collect();
        if !summary.failed.is_empty() {
            warn!(failed = summary.failed.len(), attempted = summary.attempted, "ARMA grid cells failed");
        }
        let selected = select_by_aic(&cells);
        Ok(ArmaGridResult { cells, selected, summary })
    }

    /// Prais–Winsten FGLS with ρ from the lag-1 correlation of OLS
    /// residuals; `NotComputed` when `|ρ| ≥ 1` or ρ is undefined.
    pub fn estimate_fgls(&self) -> EngineResult<Outcome<FglsFit>> {
        let design = self.main_design()?;
        let ols = fit_ols("fgls_first_stage", &design, CovarianceChoice::Classical, self.options.lb_lags)?;
        let rho = lag_one_correlation(&ols.residuals.values);
        if !rho.is_finite() || rho.abs() >= 1.0 {
            return Ok(Outcome::not_computed(format!("degenerate Prais-Winsten transform: rho = {rho}")));
        }
        self.fgls_on(&design, rho, ols.diagnostics.durbin_watson_value()).map(Outcome::Fitted)
    }

    /// FGLS with a given ρ. `ρ = 0` reproduces OLS exactly.
    pub fn estimate_fgls_with_rho(&self, rho: f64) -> EngineResult<FglsFit> {
        if !rho.is_finite() || rho.abs() >= 1.0 {
            return Err(EngineError::InvalidOption { name: "rho", reason: format!("|rho| must be < 1, got {rho}") });
        }
        let design = self.main_design()?;
        let ols = fit_ols("fgls_first_stage", &design, CovarianceChoice::Classical, self.options.lb_lags)?;
        self.fgls_on(&design, rho, ols.diagnostics.durbin_watson_value())
    }

    fn fgls_on(&self, design: &Design, rho: f64, ols_dw: Option<f64>) -> EngineResult<FglsFit> {
        let transformed = prais_winsten_transform(design, rho);
        let spec = fit_ols("fgls", &transformed, CovarianceChoice::Classical, self.options.lb_lags)?;
        let transformed_durbin_watson = spec.diagnostics.durbin_watson_value();
        debug!(rho, dw = ?transformed_durbin_watson, "Prais-Winsten FGLS fitted");
        Ok(FglsFit { rho, spec, ols_durbin_watson: ols_dw, transformed_durbin_watson })
    }

    /// `Δoutcome ~ const + Δtreatment + Δdemand` with HAC inference.
    pub fn estimate_differences_robustness(&self) -> EngineResult<DifferenceFit> {
        let outcome = self.series(&self.selection.outcome)?;
        let treatment = self.series(&self.selection.treatment)?;
        let mut builder = DesignBuilder::new(
            self.panel.dates(),
            format!("d_{}", self.outcome_label()),
            differenced(outcome),
        )
        .required(format!("d_{}", self.treatment_label()), differenced(treatment));
        if let Some(demand) = self.panel.demand_factor() {
            builder = builder.required(format!("d_{}", SeriesKey::DemandFactor.label()), differenced(demand));
        }
        let design = builder.build("first_differences")?;
        let spec = fit_ols("first_differences", &design, self.hac(), self.options.lb_lags)?;
        Ok(DifferenceFit { spec, translation_note: TRANSLATION_NOTE })
    }
}

/// Prais–Winsten transform of every column and the response: row 0 scaled
/// by `sqrt(1 − ρ²)`, row `t` replaced by `z_t − ρ z_{t−1}`.
pub fn prais_winsten_transform(design: &Design, rho: f64) -> Design {
    let n = design.n();
    let scale = (1.0 - rho * rho).sqrt();
    let y = Array1::from_shape_fn(n, |t| {
        if t == 0 { scale * design.y[0] } else { design.y[t] - rho * design.y[t - 1] }
    });
    let x = Array2::from_shape_fn(design.x.raw_dim(), |(t, j)| {
        if t == 0 { scale * design.x[[0, j]] } else { design.x[[t, j]] - rho * design.x[[t - 1, j]] }
    });
    Design { y, x, ..design.clone() }
}

/// Pearson correlation of `(e_1..e_{n−1})` with `(e_2..e_n)`.
fn lag_one_correlation(e: &[f64]) -> f64 {
    if e.len() < 3 {
        return f64::NAN;
    }
    let (a, b) = (&e[..e.len() - 1], &e[1..]);
    let m = a.len() as f64;
    let (ma, mb) = (a.iter().sum::<f64>() / m, b.iter().sum::<f64>() / m);
    let cov: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let va: f64 = a.iter().map(|x| (x - ma).powi(2)).sum();
    let vb: f64 = b.iter().map(|y| (y - mb).powi(2)).sum();
    cov / (va * vb).sqrt()
}

/// `β / (1 − ρ)` with a delta-method SE over `(β, ρ)`.
fn koyck_long_run(spec: &FittedSpec, treatment: &str, lag: &str) -> Derived<LinearEstimate> {
    let (Some(i), Some(j)) = (spec.index_of(treatment), spec.index_of(lag)) else {
        return Derived::undefined("coefficients not present");
    };
    let (beta, rho) = (spec.coefficients[i], spec.coefficients[j]);
    if rho >= 1.0 {
        return Derived::undefined(format!("persistence rho = {rho:.4} >= 1"));
    }
    let denom = 1.0 - rho;
    let (g_beta, g_rho) = (1.0 / denom, beta / (denom * denom));
    let v = &spec.covariance;
    let var = g_beta * g_beta * v[[i, i]] + 2.0 * g_beta * g_rho * v[[i, j]] + g_rho * g_rho * v[[j, j]];
    Derived::Value(LinearEstimate { estimate: beta / denom, std_error: var.max(0.0).sqrt() })
}

/// Minimum AIC among fitted cells; near-ties go to the higher Ljung–Box p.
fn select_by_aic(cells: &[ArmaGridCell]) -> Option<(usize, usize)> {
    let mut best: Option<&ArmaGridCell> = None;
    for cell in cells {
        let Some(aic) = cell.aic() else { continue };
        best = match best {
            None => Some(cell),
            Some(current) => {
                let current_aic = current.aic().unwrap_or(f64::INFINITY);
                let lb = |c: &ArmaGridCell| c.ljung_box_p().unwrap_or(f64::NEG_INFINITY);
                if aic < current_aic - AIC_TIE_TOL
                    || ((aic - current_aic).abs() <= AIC_TIE_TOL && lb(cell) > lb(current))
                {
                    Some(cell)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.map(|c| (c.p, c.q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::kernel::KernelType;
    use crate::panel::regimes::{RegimeBoundary, RegimeSchedule};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Main specification recovery and the semi-elasticity it reports.
    // - Distributed lags: long-run effect equals the coefficient sum.
    // - Koyck: persistence, adjustment speed, undefined long run for ρ ≥ 1.
    // - FGLS: ρ = 0 reproduces OLS; the estimated ρ tracks the error AR(1).
    // - ARMA grid bookkeeping and selection.
    // - The first-difference fit and its translation note.
    // -------------------------------------------------------------------------

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// outcome = 0.5·treatment + 0.2·demand + u, u AR(1) with `phi`.
    fn panel(n: usize, phi: f64, seed: u64) -> Panel {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let start = ymd(2022, 1, 1);
        let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect();
        let mut draw = || -> f64 { StandardNormal.sample(&mut rng) };
        let (mut treatment, mut demand, mut outcome) = (Vec::new(), Vec::new(), Vec::new());
        let (mut level, mut u) = (0.3, 0.0);
        for _ in 0..n {
            level = (level + 0.02 * draw()).clamp(0.0, 1.0);
            let d = draw();
            u = phi * u + 0.1 * draw();
            treatment.push(level);
            demand.push(d);
            outcome.push(0.5 * level + 0.2 * d + u);
        }
        let schedule =
            RegimeSchedule::new(vec![RegimeBoundary::new("early", start), RegimeBoundary::new("late", ymd(2022, 6, 1))])
                .expect("valid schedule");
        Panel::new(dates, outcome, treatment, Some(demand), schedule).expect("valid panel")
    }

    fn estimator(panel: &Panel) -> LevelsEstimator<'_> {
        LevelsEstimator::new(panel, VariableSelection::default(), LevelsOptions::default())
    }

    #[test]
    // Purpose
    // -------
    // The main specification recovers β and reports a consistent
    // semi-elasticity.
    //
    // Given
    // -----
    // - 400 days, β = 0.5, AR(1) errors with φ = 0.3.
    //
    // Expect
    // ------
    // - |β̂ − 0.5| < 0.15, a HAC bandwidth of ⌊4(n/100)^{2/9}⌋, regime and
    //   calendar columns present, semi-elasticity = g(β̂).
    fn main_spec_recovers_treatment_effect() {
        // Arrange
        let p = panel(400, 0.3, 11);

        // Act
        let fit = estimator(&p).estimate_main_spec().expect("fits");

        // Assert
        assert!((fit.treatment.estimate - 0.5).abs() < 0.15, "beta = {}", fit.treatment.estimate);
        assert_eq!(fit.spec.bandwidth(), Some(5));
        assert!(fit.spec.index_of("regime_late").is_some());
        assert!(fit.spec.index_of("is_weekend").is_some());
        assert_relative_eq!(
            fit.semi_elasticity.percent,
            100.0 * ((0.1 * fit.treatment.estimate).exp() - 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // The configured HAC kernel and bandwidth rule reach the main fit.
    //
    // Given
    // -----
    // - 400 days; Bartlett and quadratic-spectral kernels at 5 forced lags;
    //   Bartlett with the AR(1) plug-in.
    //
    // Expect
    // ------
    // - Same coefficients under every choice, different standard errors
    //   across kernels.
    // - The plug-in bandwidth equals the Andrews rule on the OLS scores.
    fn hac_kernel_and_plug_in_reach_the_main_fit() {
        // Arrange
        let p = panel(400, 0.3, 19);
        let with = |options: LevelsOptions| {
            LevelsEstimator::new(&p, VariableSelection::default(), options).estimate_main_spec().expect("fits")
        };
        let forced = LevelsOptions { hac_lags: Some(5), ..LevelsOptions::default() };

        // Act
        let bartlett = with(forced.clone());
        let qs = with(forced.with_hac_kernel(KernelType::QuadraticSpectral, false));
        let plug_in = with(LevelsOptions::default().with_hac_kernel(KernelType::Bartlett, true));

        // Assert
        assert_eq!(bartlett.spec.coefficients, qs.spec.coefficients);
        assert_eq!(bartlett.spec.bandwidth(), Some(5));
        assert_eq!(qs.spec.bandwidth(), Some(5));
        assert!((bartlett.treatment.std_error - qs.treatment.std_error).abs() > 1e-12);

        let design = estimator(&p).main_design().expect("design");
        let e = Array1::from(plug_in.spec.residuals.values.clone());
        let scores = &design.x * &e.insert_axis(ndarray::Axis(1));
        let expected = KernelType::Bartlett.optimal_bandwidth(&scores).min(design.n() - 1);
        assert_eq!(plug_in.spec.bandwidth(), Some(expected));
        assert_eq!(plug_in.spec.coefficients, bartlett.spec.coefficients);
    }

    #[test]
    fn distributed_lag_long_run_is_the_coefficient_sum() {
        let p = panel(300, 0.3, 12);
        let fit = estimator(&p).estimate_distributed_lags(&[1, 7]).expect("fits");
        let sum = ["treatment", "treatment_lag1", "treatment_lag7"]
            .iter()
            .map(|n| fit.spec.estimate(n).expect("present"))
            .sum::<f64>();
        assert_relative_eq!(fit.long_run.estimate, sum, epsilon = 1e-12);
        assert_eq!(fit.spec.n, 300 - 7);
        assert!(estimator(&p).estimate_distributed_lags(&[0]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Koyck reports persistence and a long run only when ρ < 1.
    //
    // Given
    // -----
    // - A fitted spec with ρ = 0.4, and a hand-built spec with ρ = 1.02.
    //
    // Expect
    // ------
    // - adjustment_speed = 1 − ρ̂; long run = β/(1 − ρ); undefined for ρ ≥ 1.
    fn koyck_long_run_defined_only_below_unit_persistence() {
        // Arrange
        let p = panel(300, 0.4, 13);

        // Act
        let fit = estimator(&p).estimate_koyck_lag().expect("fits");

        // Assert
        assert_relative_eq!(fit.adjustment_speed, 1.0 - fit.rho.estimate, epsilon = 1e-15);
        let lr = fit.long_run.value().expect("rho < 1");
        assert_relative_eq!(lr.estimate, fit.short_run.estimate / (1.0 - fit.rho.estimate), epsilon = 1e-12);

        let mut explosive = fit.spec.clone();
        let j = explosive.index_of("outcome_lag1").expect("present");
        explosive.coefficients[j] = 1.02;
        let undefined = koyck_long_run(&explosive, "treatment", "outcome_lag1");
        assert!(!undefined.is_defined());
    }

    #[test]
    // Purpose
    // -------
    // Prais–Winsten with ρ = 0 is the identity, so FGLS equals OLS.
    //
    // Given
    // -----
    // - The main design of a 250-day panel.
    //
    // Expect
    // ------
    // - Bit-identical coefficients.
    fn fgls_with_zero_rho_reproduces_ols() {
        // Arrange
        let p = panel(250, 0.3, 14);
        let est = estimator(&p);
        let ols = fit_ols("ols", &est.main_design().expect("design"), CovarianceChoice::Classical, 10)
            .expect("fits");

        // Act
        let fgls = est.estimate_fgls_with_rho(0.0).expect("fits");

        // Assert
        assert_eq!(fgls.spec.coefficients, ols.coefficients);
        assert!(est.estimate_fgls_with_rho(1.0).is_err());
    }

    #[test]
    fn estimated_fgls_rho_tracks_error_persistence() {
        let p = panel(500, 0.6, 15);
        let fit = estimator(&p).estimate_fgls().expect("fits").into_fitted().expect("rho < 1");
        assert!((fit.rho - 0.6).abs() < 0.12, "rho = {}", fit.rho);
        let dw = fit.transformed_durbin_watson.expect("computed");
        assert!((dw - 2.0).abs() < 0.3, "dw = {dw}");
    }

    #[test]
    // Purpose
    // -------
    // The grid visits every cell, records failures, and selects a fitted
    // cell with minimal AIC.
    //
    // Given
    // -----
    // - max_p = 1, max_q = 1 on a panel with AR(1) errors.
    //
    // Expect
    // ------
    // - 4 cells attempted; the selected cell has the smallest AIC.
    fn arma_grid_selects_minimum_aic() {
        // Arrange
        let p = panel(300, 0.5, 16);
        let grid = ArmaGridOptions::new(1, 1, 10).expect("valid");

        // Act
        let res = estimator(&p).estimate_arma_grid(&grid).expect("fits");

        // Assert
        assert_eq!(res.summary.attempted, 4);
        let best = res.best().expect("at least one fitted cell");
        let min_aic = res.cells.iter().filter_map(ArmaGridCell::aic).fold(f64::INFINITY, f64::min);
        assert_relative_eq!(best.aic, min_aic, epsilon = 1e-12);
        assert_ne!(res.selected, Some((0, 0)));
    }

    #[test]
    fn aic_ties_go_to_the_whiter_residuals() {
        let p = panel(120, 0.0, 17);
        let est = estimator(&p);
        let fit = est.estimate_ar_errors(0, 0).expect("design").into_fitted().expect("fitted");
        let mut worse_lb = fit.clone();
        if let Outcome::Fitted(lb) = &mut worse_lb.spec.diagnostics.ljung_box {
            lb.p_value = 0.0;
        }
        let cells = vec![
            ArmaGridCell { p: 1, q: 0, fit: Outcome::Fitted(worse_lb) },
            ArmaGridCell { p: 0, q: 0, fit: Outcome::Fitted(fit) },
            ArmaGridCell { p: 0, q: 1, fit: Outcome::not_computed("failed") },
        ];
        assert_eq!(select_by_aic(&cells), Some((0, 0)));
    }

    #[test]
    fn first_differences_carry_the_translation_note() {
        let p = panel(200, 0.3, 18);
        let fit = estimator(&p).estimate_differences_robustness().expect("fits");
        assert_eq!(fit.spec.n, 199);
        assert_eq!(fit.spec.regressors, vec!["const", "d_treatment", "d_demand_factor"]);
        assert!(fit.translation_note.contains("different estimands"));
    }
}
