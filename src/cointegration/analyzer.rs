//! cointegration::analyzer — unit roots, Engle–Granger, Johansen and the ECM.
//!
//! Purpose
//! -------
//! Establish whether outcome, treatment and demand factor share a common
//! stochastic trend and, when they do, estimate how fast the outcome
//! corrects toward the long-run relation.
//!
//! Key behaviors
//! -------------
//! - The analysis is a fixed sequence: unit-root battery, long-run
//!   regression with Engle–Granger on its residuals, Johansen on the system,
//!   then the Engle–Granger gate deciding between the ECM and the retained
//!   first-difference specification.
//! - The equilibrium error enters the ECM through
//!   [`DatedSeries::lagged_along`](crate::panel::series::DatedSeries::lagged_along),
//!   so rows dropped from either frame never shift the lag.
//! - The event variant appends event indicators to the long-run relation,
//!   the ECM and the difference specification, and is reported beside the
//!   baseline.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only the long-run regression can return `Err`. Unit-root tests,
//!   Johansen, regime subsamples and the ECM come back as [`Outcome`].
//! - ECM HAC bandwidth is `min(cap, max(1, ⌊4(n/100)^{2/9}⌋))`; the
//!   long-run fits follow `hac_lags` and the kernel choice in the options.
//!
//! Conventions
//! -----------
//! - ECM columns: `ect_lag1`, `d_<treatment>`, `d_demand_factor`,
//!   `d_<outcome>_lag1`, calendar, events.
use crate::{
    cointegration::{
        battery::UnitRootBattery,
        options::CointegrationOptions,
        results::{
            CointegrationReport, CointegrationVariant, EcmDecision, EcmFit, LongRunRelation,
            RegimeRelation,
        },
    },
    errors::{EngineError, EngineResult},
    inference::{hac::HACOptions, kernel::newey_west_bandwidth},
    outcome::{Derived, Outcome},
    panel::{
        data::{Panel, SeriesKey},
        events::{EventControls, materialize},
        series::{differenced, lagged},
    },
    regression::{
        design::DesignBuilder,
        fitted::FittedSpec,
        ols::{CovarianceChoice, fit_ols},
    },
    statistical_tests::{
        johansen::{JohansenResult, johansen},
        unit_root::{
            Deterministic,
            adf::{LagSelection, adf},
        },
    },
};
use tracing::debug;

const ECT: &str = "ect_lag1";

/// CointegrationAnalyzer — runs the cointegration sequence over one panel.
pub struct CointegrationAnalyzer<'a> {
    panel: &'a Panel,
    options: CointegrationOptions,
    events: Option<&'a dyn EventControls>,
}

impl std::fmt::Debug for CointegrationAnalyzer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CointegrationAnalyzer")
            .field("n", &self.panel.len())
            .field("options", &self.options)
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl<'a> CointegrationAnalyzer<'a> {
    pub fn new(
        panel: &'a Panel, options: CointegrationOptions, events: Option<&'a dyn EventControls>,
    ) -> Self {
        Self { panel, options, events }
    }

    pub fn options(&self) -> &CointegrationOptions {
        &self.options
    }

    /// Run every step; the event variant only when a collaborator is set.
    pub fn run(&self) -> EngineResult<CointegrationReport> {
        let unit_roots = self.unit_root_battery();
        let johansen = self.johansen();
        let regimes = self.long_run_by_regime();
        let baseline = self.variant(false)?;
        let with_events = match self.events {
            Some(_) => Some(self.variant(true)?),
            None => None,
        };
        Ok(CointegrationReport { unit_roots, johansen, regimes, baseline, with_events })
    }

    fn variant(&self, with_events: bool) -> EngineResult<CointegrationVariant> {
        let long_run = self.long_run_relation(with_events)?;
        let ecm = self.estimate_ecm(&long_run, with_events);
        Ok(CointegrationVariant { with_events, long_run, ecm })
    }

    /// ADF, KPSS and Phillips–Perron on each series and its first difference.
    pub fn unit_root_battery(&self) -> Vec<UnitRootBattery> {
        let det = self.options.unit_root_deterministic;
        self.system()
            .into_iter()
            .flat_map(|(name, values)| {
                let diff_name = format!("d_{name}");
                [
                    UnitRootBattery::run(name, false, values, det),
                    UnitRootBattery::run(diff_name, true, &differenced(values), det),
                ]
            })
            .collect()
    }

    /// `outcome ~ const + treatment + demand + calendar + regimes [+ events]`
    /// with Engle–Granger on the residuals.
    pub fn long_run_relation(&self, with_events: bool) -> EngineResult<LongRunRelation> {
        let spec_name = if with_events { "long_run_events" } else { "long_run" };
        let design = self
            .long_run_builder(self.panel.outcome().to_vec())
            .optional_many(self.panel.regime_flags())
            .optional_many(self.event_columns(with_events))
            .build(spec_name)?;
        let spec = fit_ols(spec_name, &design, CovarianceChoice::Hac(self.options.long_run_hac()), self.options.lb_lags)?;
        Ok(self.relation_from(spec))
    }

    /// The long-run relation on each regime's rows (calendar controls only).
    pub fn long_run_by_regime(&self) -> Vec<RegimeRelation> {
        let schedule = self.panel.schedule();
        schedule
            .boundaries()
            .iter()
            .map(|boundary| {
                let response = self
                    .panel
                    .dates()
                    .iter()
                    .zip(self.panel.outcome())
                    .map(|(&d, &y)| {
                        if schedule.regime_name(d) == Some(boundary.name.as_str()) { y } else { f64::NAN }
                    })
                    .collect();
                let spec_name = format!("long_run_{}", boundary.name);
                let relation = self
                    .long_run_builder(response)
                    .build(&spec_name)
                    .and_then(|design| {
                        fit_ols(&spec_name, &design, CovarianceChoice::Hac(self.options.long_run_hac()), self.options.lb_lags)
                    })
                    .map(|spec| self.relation_from(spec));
                RegimeRelation { regime: boundary.name.clone(), relation: relation.into() }
            })
            .collect()
    }

    /// Johansen trace and maximum-eigenvalue statistics on the system.
    pub fn johansen(&self) -> Outcome<JohansenResult> {
        let series: Vec<&[f64]> = self.system().into_iter().map(|(_, values)| values).collect();
        johansen(&series, self.options.det_order, self.options.k_ar_diff).into()
    }

    /// Apply the Engle–Granger gate: the ECM when the residual unit root is
    /// rejected, otherwise the retained first-difference specification.
    pub fn estimate_ecm(&self, long_run: &LongRunRelation, with_events: bool) -> Outcome<EcmDecision> {
        let Some(eg_p_value) = long_run.engle_granger_p() else {
            let reason = long_run.engle_granger.failure_reason().unwrap_or_default();
            return Outcome::not_computed(format!("Engle-Granger test unavailable ({reason})"));
        };
        if eg_p_value >= self.options.significance {
            debug!(eg_p_value, "no cointegration; retaining first-difference specification");
            return self
                .difference_spec(with_events)
                .map(|difference_spec| EcmDecision::RetainedDifferenceSpec { eg_p_value, difference_spec })
                .into();
        }
        match self.fit_ecm(long_run, with_events) {
            Ok(outcome) => outcome,
            Err(err) => Err::<EcmDecision, _>(err).into(),
        }
    }

    fn fit_ecm(&self, long_run: &LongRunRelation, with_events: bool) -> EngineResult<Outcome<EcmDecision>> {
        let spec_name = if with_events { "ecm_events" } else { "ecm" };
        let outcome_label = SeriesKey::Outcome.to_string();
        let d_outcome = differenced(self.panel.outcome());
        let design = DesignBuilder::new(self.panel.dates(), format!("d_{outcome_label}"), d_outcome.clone())
            .required(ECT, long_run.spec.residuals.lagged_along(self.panel.dates()))
            .required_many(self.difference_columns())
            .required(format!("d_{outcome_label}_lag1"), lagged(&d_outcome, 1))
            .optional_many(self.calendar_columns())
            .optional_many(self.event_columns(with_events))
            .build(spec_name)?;
        let n = design.n();
        if n < self.options.ecm_min_obs {
            return Ok(Outcome::InsufficientData { required: self.options.ecm_min_obs, available: n });
        }
        let bandwidth = self.ecm_bandwidth(n);
        let spec = fit_ols(spec_name, &design, CovarianceChoice::Hac(HACOptions::bartlett(bandwidth)), self.options.lb_lags)?;

        let d_treatment = format!("d_{}", SeriesKey::Treatment.label());
        let phi = spec.coefficient(ECT).ok_or_else(|| EngineError::MissingSeries { key: ECT.to_string() })?;
        let psi = spec
            .coefficient(&d_treatment)
            .ok_or_else(|| EngineError::MissingSeries { key: d_treatment.clone() })?;
        let half_life = half_life(phi.estimate);
        let residual_adf = adf(&spec.residuals.values, Deterministic::Constant, LagSelection::Aic).into();
        debug!(n, bandwidth, phi = phi.estimate, psi = psi.estimate, "error-correction model fitted");
        Ok(Outcome::Fitted(EcmDecision::Estimated(EcmFit {
            spec,
            phi,
            psi,
            half_life,
            bandwidth,
            residual_adf,
        })))
    }

    /// `Δoutcome ~ const + Δtreatment + Δdemand + calendar [+ events]`.
    pub fn difference_spec(&self, with_events: bool) -> EngineResult<FittedSpec> {
        let spec_name = if with_events { "difference_events" } else { "difference" };
        let design = DesignBuilder::new(
            self.panel.dates(),
            format!("d_{}", SeriesKey::Outcome.label()),
            differenced(self.panel.outcome()),
        )
        .required_many(self.difference_columns())
        .optional_many(self.calendar_columns())
        .optional_many(self.event_columns(with_events))
        .build(spec_name)?;
        let bandwidth = self.ecm_bandwidth(design.n());
        fit_ols(spec_name, &design, CovarianceChoice::Hac(HACOptions::bartlett(bandwidth)), self.options.lb_lags)
    }

    fn ecm_bandwidth(&self, n: usize) -> usize {
        newey_west_bandwidth(n).max(1).min(self.options.ecm_bandwidth_cap)
    }

    fn relation_from(&self, spec: FittedSpec) -> LongRunRelation {
        let engle_granger = adf(&spec.residuals.values, Deterministic::Constant, LagSelection::Aic).into();
        let relation = LongRunRelation { spec, engle_granger };
        debug!(spec = %relation.spec.name, eg_p = ?relation.engle_granger_p(), "long-run relation fitted");
        relation
    }

    /// `(label, values)` for outcome, treatment and, when held, demand factor.
    fn system(&self) -> Vec<(String, &'a [f64])> {
        let mut system = vec![
            (SeriesKey::Outcome.to_string(), self.panel.outcome()),
            (SeriesKey::Treatment.to_string(), self.panel.treatment()),
        ];
        if let Some(demand) = self.panel.demand_factor() {
            system.push((SeriesKey::DemandFactor.to_string(), demand));
        }
        system
    }

    fn long_run_builder(&self, response: Vec<f64>) -> DesignBuilder {
        let mut builder = DesignBuilder::new(self.panel.dates(), SeriesKey::Outcome.label(), response)
            .required(SeriesKey::Treatment.label(), self.panel.treatment().to_vec());
        if let Some(demand) = self.panel.demand_factor() {
            builder = builder.required(SeriesKey::DemandFactor.label(), demand.to_vec());
        }
        builder.optional_many(self.calendar_columns())
    }

    fn difference_columns(&self) -> Vec<(String, Vec<f64>)> {
        let mut columns =
            vec![(format!("d_{}", SeriesKey::Treatment.label()), differenced(self.panel.treatment()))];
        if let Some(demand) = self.panel.demand_factor() {
            columns.push((format!("d_{}", SeriesKey::DemandFactor.label()), differenced(demand)));
        }
        columns
    }

    fn calendar_columns(&self) -> Vec<(String, Vec<f64>)> {
        let calendar = self.panel.calendar_controls();
        calendar.columns().into_iter().map(|(name, col)| (name.to_string(), col.to_vec())).collect()
    }

    fn event_columns(&self, with_events: bool) -> Vec<(String, Vec<f64>)> {
        if with_events { materialize(self.events, self.panel.dates()) } else { Vec::new() }
    }
}

/// `ln(0.5) / ln(1 + φ)`. Undefined when `1 + φ ≤ 0` or when `φ ≥ 0`
/// (deviations never decay).
pub fn half_life(phi: f64) -> Derived<f64> {
    let base = 1.0 + phi;
    if !(base > 0.0) {
        return Derived::undefined(format!("1 + phi = {base:.4} is not positive"));
    }
    if phi >= 0.0 {
        return Derived::undefined(format!("phi = {phi:.4} implies no reversion toward equilibrium"));
    }
    Derived::Value(0.5_f64.ln() / base.ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        panel::{
            events::EventCalendar,
            regimes::{RegimeBoundary, RegimeSchedule},
        },
        statistical_tests::johansen::JOHANSEN_MIN_OBS,
    };
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Half-life definition domain.
    // - Engle–Granger detection and ECM estimation on a cointegrated panel.
    // - The gate retaining the difference specification.
    // - Sample-size guards (ECM minimum n, Johansen minimum n).
    // - Regime subsamples and the event variant in the full report.
    // -------------------------------------------------------------------------

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// Treatment and demand are random walks; the outcome equals
    /// `1 + 0.8·treatment + 0.3·demand + u` with `u` AR(1) at `rho`.
    fn cointegrated_panel(n: usize, rho: f64, seed: u64) -> Panel {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let start = ymd(2022, 1, 1);
        let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect();
        let mut draw = || -> f64 { StandardNormal.sample(&mut rng) };
        let (mut x, mut d, mut u) = (0.0, 0.0, 0.0);
        let (mut treatment, mut demand, mut outcome) = (Vec::new(), Vec::new(), Vec::new());
        for _ in 0..n {
            x += 0.1 * draw();
            d += 0.1 * draw();
            u = rho * u + 0.05 * draw();
            treatment.push(x);
            demand.push(d);
            outcome.push(1.0 + 0.8 * x + 0.3 * d + u);
        }
        let schedule = RegimeSchedule::new(vec![
            RegimeBoundary::new("early", start),
            RegimeBoundary::new("late", start + chrono::Duration::days(n as i64 / 2)),
        ])
        .expect("valid schedule");
        Panel::new(dates, outcome, treatment, Some(demand), schedule).expect("valid panel")
    }

    #[test]
    fn half_life_is_defined_only_for_mean_reversion() {
        assert_relative_eq!(*half_life(-0.5).value().expect("defined"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            *half_life(-0.1).value().expect("defined"),
            0.5_f64.ln() / 0.9_f64.ln(),
            epsilon = 1e-12
        );
        assert!(!half_life(-1.2).is_defined());
        assert!(!half_life(-1.0).is_defined());
        assert!(!half_life(0.0).is_defined());
        assert!(!half_life(0.05).is_defined());
    }

    #[test]
    // Purpose
    // -------
    // On a cointegrated panel the gate opens and the ECM recovers the
    // adjustment speed implied by the equilibrium error's persistence.
    //
    // Given
    // -----
    // - 400 days, equilibrium error AR(1) with ρ = 0.5 (so φ ≈ −0.5).
    //
    // Expect
    // ------
    // - EG p < 0.05, an `Estimated` decision with φ ∈ (−0.8, −0.2), a
    //   defined half-life, and a bandwidth of min(7, NW(n)) = 5.
    fn cointegrated_panel_yields_error_correction_fit() {
        // Arrange
        let panel = cointegrated_panel(400, 0.5, 21);
        let analyzer = CointegrationAnalyzer::new(&panel, CointegrationOptions::default(), None);

        // Act
        let long_run = analyzer.long_run_relation(false).expect("long run fits");
        let decision = analyzer.estimate_ecm(&long_run, false);

        // Assert
        assert!(long_run.engle_granger_p().expect("EG computed") < 0.05);
        assert!((long_run.spec.estimate("treatment").expect("present") - 0.8).abs() < 0.1);
        let ecm = decision.fitted().and_then(EcmDecision::ecm).expect("ECM estimated");
        assert!(ecm.phi.estimate > -0.8 && ecm.phi.estimate < -0.2, "phi = {}", ecm.phi.estimate);
        assert!(ecm.half_life.is_defined());
        assert_eq!(ecm.bandwidth, 5);
        assert_eq!(ecm.spec.bandwidth(), Some(5));
        assert!(ecm.spec.index_of("d_outcome_lag1").is_some());
        assert!(ecm.residual_adf.is_fitted());
    }

    #[test]
    // Purpose
    // -------
    // A forced HAC lag count applies to the pooled and per-regime long-run
    // fits and leaves the ECM on its capped rule.
    //
    // Given
    // -----
    // - 400 days, `hac_lags = Some(2)`.
    //
    // Expect
    // ------
    // - Long-run and both regime fits report bandwidth 2; the ECM still 5.
    fn long_run_fits_honor_forced_hac_lags() {
        // Arrange
        let panel = cointegrated_panel(400, 0.5, 21);
        let options = CointegrationOptions { hac_lags: Some(2), ..CointegrationOptions::default() };
        let analyzer = CointegrationAnalyzer::new(&panel, options, None);

        // Act
        let long_run = analyzer.long_run_relation(false).expect("long run fits");
        let regimes = analyzer.long_run_by_regime();
        let decision = analyzer.estimate_ecm(&long_run, false);

        // Assert
        assert_eq!(long_run.spec.bandwidth(), Some(2));
        assert_eq!(regimes.len(), 2);
        for regime in &regimes {
            let relation = regime.relation.fitted().expect("regime fitted");
            assert_eq!(relation.spec.bandwidth(), Some(2), "regime {}", regime.regime);
        }
        let ecm = decision.fitted().and_then(EcmDecision::ecm).expect("ECM estimated");
        assert_eq!(ecm.spec.bandwidth(), Some(5));
    }

    #[test]
    // Purpose
    // -------
    // An insignificant Engle–Granger test keeps the first-difference
    // specification instead of estimating an ECM.
    //
    // Given
    // -----
    // - A fitted long-run relation whose EG p-value is overridden to 0.4.
    //
    // Expect
    // ------
    // - `RetainedDifferenceSpec` carrying p = 0.4 and a fit without `ect_lag1`.
    fn insignificant_engle_granger_retains_difference_spec() {
        // Arrange
        let panel = cointegrated_panel(200, 0.5, 22);
        let analyzer = CointegrationAnalyzer::new(&panel, CointegrationOptions::default(), None);
        let mut long_run = analyzer.long_run_relation(false).expect("long run fits");
        if let Outcome::Fitted(test) = &mut long_run.engle_granger {
            test.p_value = 0.4;
        }

        // Act
        let decision = analyzer.estimate_ecm(&long_run, false);

        // Assert
        match decision {
            Outcome::Fitted(EcmDecision::RetainedDifferenceSpec { eg_p_value, difference_spec }) => {
                assert_eq!(eg_p_value, 0.4);
                assert!(difference_spec.index_of(ECT).is_none());
                assert!(difference_spec.index_of("d_treatment").is_some());
            }
            other => panic!("expected retained difference spec, got {other:?}"),
        }
    }

    #[test]
    fn short_panel_reports_insufficient_data_for_ecm_and_johansen() {
        let panel = cointegrated_panel(25, 0.5, 23);
        let analyzer = CointegrationAnalyzer::new(&panel, CointegrationOptions::default(), None);
        let mut long_run = analyzer.long_run_relation(false).expect("long run fits");
        long_run.engle_granger = Outcome::Fitted(
            adf(&long_run.spec.residuals.values, Deterministic::Constant, LagSelection::Fixed(0)).expect("adf"),
        );
        if let Outcome::Fitted(test) = &mut long_run.engle_granger {
            test.p_value = 0.01;
        }

        let decision = analyzer.estimate_ecm(&long_run, false);
        let johansen = analyzer.johansen();

        assert!(matches!(decision, Outcome::InsufficientData { required: 30, .. }));
        assert!(matches!(johansen, Outcome::InsufficientData { required, .. } if required >= JOHANSEN_MIN_OBS));
    }

    #[test]
    // Purpose
    // -------
    // The full report carries the battery, both regimes, and the event
    // variant side by side with the baseline.
    //
    // Given
    // -----
    // - 300 days, two regimes, an event calendar with two event days.
    //
    // Expect
    // ------
    // - Six battery rows (three series, levels and differences).
    // - Two fitted regime relations.
    // - Event variant present, with the event column in its long-run fit
    //   and absent from the baseline.
    fn report_runs_every_step_and_both_variants() {
        // Arrange
        let panel = cointegrated_panel(300, 0.4, 24);
        let events = EventCalendar::new().with_event("outage_day", [ymd(2022, 3, 1), ymd(2022, 7, 9)]);
        let analyzer = CointegrationAnalyzer::new(&panel, CointegrationOptions::default(), Some(&events));

        // Act
        let report = analyzer.run().expect("report");

        // Assert
        assert_eq!(report.unit_roots.len(), 6);
        assert_eq!(report.unit_roots.iter().filter(|b| b.differenced).count(), 3);
        assert_eq!(report.regimes.len(), 2);
        assert!(report.regimes.iter().all(|r| r.relation.is_fitted()));
        let johansen = report.johansen.fitted().expect("johansen computed");
        assert_eq!(johansen.ranks.len(), 3);
        assert!(report.baseline.long_run.spec.index_of("outage_day").is_none());
        let variant = report.with_events.expect("event variant present");
        assert!(variant.with_events);
        assert!(variant.long_run.spec.index_of("outage_day").is_some());
    }
}
