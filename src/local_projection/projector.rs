//! local_projection::projector — Jordà local projections of the outcome.
//!
//! Purpose
//! -------
//! Trace the response of the outcome's daily change `h` days ahead to
//! today's treatment change, for `h = 0..=H`, with HAC inference whose
//! bandwidth grows with the horizon and an optional block bootstrap.
//!
//! Key behaviors
//! -------------
//! - Horizon `h` regresses `Δy_{t+h}` on `Δtreatment_t`, `Δdemand_t`,
//!   regime flags, calendar controls and (when supplied) event indicators.
//!   Rows whose lead is undefined are dropped.
//! - The base bandwidth is computed once from the `h = 0` sample; horizon
//!   `h` uses `min(base + max(h, 1), n − 1)`.
//! - Alternative outcomes (another log series, or a level series such as
//!   utilization) go through the same machinery via [`OutcomeSpec`].
//! - A failed horizon becomes a non-`Fitted` entry and is counted in the
//!   sweep summary; only the `h = 0` design can fail the sweep.
//!
//! Conventions
//! -----------
//! - Horizon specs are named `lp_h<h>`; the treatment column is
//!   `d_treatment`.
use crate::{
    errors::{EngineError, EngineResult},
    inference::{hac::HACOptions, kernel::newey_west_bandwidth},
    levels::{LevelsEstimator, LevelsOptions, VariableSelection, results::KoyckFit},
    local_projection::{
        bootstrap::moving_block_bootstrap,
        options::{LocalProjectionOptions, OutcomeSpec},
        results::{EventRebound, HorizonFit, HorizonResult, HorizonSweep},
    },
    outcome::{Outcome, SweepSummary},
    panel::{
        data::{Panel, SeriesKey},
        events::{EventControls, materialize},
        series::{differenced, led},
    },
    regression::{
        design::{Design, DesignBuilder},
        ols::{CovarianceChoice, fit_ols},
        wald::WaldTest,
    },
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

/// `min(base + max(h, 1), n − 1)`.
pub fn horizon_bandwidth(base: usize, h: usize, n: usize) -> usize {
    (base + h.max(1)).min(n.saturating_sub(1))
}

/// LocalProjector — horizon-by-horizon projections over one panel.
pub struct LocalProjector<'a> {
    panel: &'a Panel,
    outcome: OutcomeSpec,
    options: LocalProjectionOptions,
    events: Option<&'a dyn EventControls>,
}

impl std::fmt::Debug for LocalProjector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalProjector")
            .field("n", &self.panel.len())
            .field("outcome", &self.outcome)
            .field("options", &self.options)
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl<'a> LocalProjector<'a> {
    pub fn new(
        panel: &'a Panel, outcome: OutcomeSpec, options: LocalProjectionOptions,
        events: Option<&'a dyn EventControls>,
    ) -> Self {
        Self { panel, outcome, options, events }
    }

    pub fn options(&self) -> &LocalProjectionOptions {
        &self.options
    }

    pub fn outcome(&self) -> &OutcomeSpec {
        &self.outcome
    }

    fn treatment_column() -> String {
        format!("d_{}", SeriesKey::Treatment.label())
    }

    /// Design of horizon `h`; event indicators only when `with_events`.
    pub fn horizon_design(&self, h: usize, with_events: bool) -> EngineResult<Design> {
        let key = &self.outcome.key;
        let outcome =
            self.panel.series(key).ok_or_else(|| EngineError::MissingSeries { key: key.to_string() })?;
        let calendar = self.panel.calendar_controls();
        let mut builder = DesignBuilder::new(
            self.panel.dates(),
            format!("d_{}_lead{h}", key.label()),
            led(&differenced(outcome), h),
        )
        .required(Self::treatment_column(), differenced(self.panel.treatment()));
        if let Some(demand) = self.panel.demand_factor() {
            builder = builder.required(format!("d_{}", SeriesKey::DemandFactor.label()), differenced(demand));
        }
        builder = builder
            .optional_many(self.panel.regime_flags())
            .optional_many(calendar.columns().into_iter().map(|(name, col)| (name.to_string(), col.to_vec())));
        if with_events {
            builder = builder.optional_many(materialize(self.events, self.panel.dates()));
        }
        builder.build(&format!("lp_h{h}"))
    }

    /// `⌊4(n₀/100)^{2/9}⌋` from the `h = 0` design.
    pub fn base_bandwidth(&self) -> EngineResult<usize> {
        Ok(newey_west_bandwidth(self.horizon_design(0, true)?.n()))
    }

    fn fit_horizon(
        &self, h: usize, base: usize, with_events: bool, bootstrap: bool,
    ) -> EngineResult<HorizonFit> {
        let design = self.horizon_design(h, with_events)?;
        let n = design.n();
        let bandwidth = horizon_bandwidth(base, h, n);
        let spec_name = format!("lp_h{h}");
        let choice = CovarianceChoice::Hac(HACOptions::bartlett(bandwidth));
        let spec = fit_ols(&spec_name, &design, choice, self.options.lb_lags)?;
        let treatment = Self::treatment_column();
        let beta = spec
            .coefficient(&treatment)
            .ok_or_else(|| EngineError::MissingSeries { key: treatment.clone() })?;
        let bootstrap = match (bootstrap, &self.options.bootstrap) {
            (true, Some(opts)) => Some(moving_block_bootstrap(&design, &treatment, opts)),
            _ => None,
        };
        Ok(HorizonFit { h, n, bandwidth, beta, spec, bootstrap })
    }

    /// One horizon, with the sweep's base bandwidth.
    pub fn estimate_horizon(&self, h: usize) -> EngineResult<HorizonFit> {
        let base = self.base_bandwidth()?;
        self.fit_horizon(h, base, true, true)
    }

    /// Every horizon `0..=H`. Horizons run on the rayon pool with the
    /// `parallel` feature; the result is the same either way.
    pub fn sweep(&self) -> EngineResult<HorizonSweep> {
        let base_bandwidth = self.base_bandwidth()?;
        let run = |h: usize| HorizonResult { h, fit: self.fit_horizon(h, base_bandwidth, true, true).into() };

        #[cfg(feature = "parallel")]
        let horizons: Vec<HorizonResult> = (0..=self.options.max_horizon).into_par_iter().map(run).collect();
        #[cfg(not(feature = "parallel"))]
        let horizons: Vec<HorizonResult> = (0..=self.options.max_horizon).map(run).collect();

        let mut summary = SweepSummary::default();
        for result in &horizons {
            summary.record(format!("h={}", result.h), &result.fit);
        }
        if !summary.failed.is_empty() {
            warn!(failed = summary.failed.len(), attempted = summary.attempted, "local-projection horizons failed");
        }
        debug!(base_bandwidth, horizons = summary.attempted, "local-projection sweep finished");
        Ok(HorizonSweep { outcome: self.outcome.clone(), base_bandwidth, horizons, summary })
    }

    /// The same sweep after dropping `±exclusion_half_width` days around
    /// every regime change.
    pub fn sweep_excluding_upgrade_windows(&self) -> EngineResult<HorizonSweep> {
        let changes = self.panel.schedule().change_dates();
        let trimmed = self.panel.excluding_windows(&changes, self.options.exclusion_half_width)?;
        LocalProjector::new(&trimmed, self.outcome.clone(), self.options.clone(), self.events).sweep()
    }

    /// Partial-adjustment long-run multiplier of the projected outcome.
    pub fn koyck_long_run(&self) -> EngineResult<KoyckFit> {
        let selection = VariableSelection { outcome: self.outcome.key.clone(), treatment: SeriesKey::Treatment };
        LevelsEstimator::new(self.panel, selection, LevelsOptions::default()).estimate_koyck_lag()
    }

    /// β at `event_test_horizon` with and without event indicators, and the
    /// joint HAC Wald test of the indicators (bandwidth of the with-events
    /// fit).
    pub fn event_rebound_test(&self) -> EngineResult<EventRebound> {
        let h = self.options.event_test_horizon;
        let base = self.base_bandwidth()?;
        let without = self.fit_horizon(h, base, false, false)?;
        let with = self.fit_horizon(h, base, true, false)?;
        let event_controls: Vec<String> = materialize(self.events, self.panel.dates())
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| with.spec.index_of(name).is_some())
            .collect();
        let wald = if event_controls.is_empty() {
            Outcome::not_computed("no event indicators in the design")
        } else {
            WaldTest::zero_restrictions(&with.spec, &event_controls)
        };
        Ok(EventRebound {
            h,
            n: with.n,
            bandwidth: with.bandwidth,
            without_events: without.beta,
            with_events: with.beta,
            event_controls,
            wald,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        local_projection::options::{BootstrapOptions, OutcomeScale},
        panel::{
            events::EventCalendar,
            regimes::{RegimeBoundary, RegimeSchedule},
        },
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
    // - Horizon bandwidth rule and lead-induced row dropping.
    // - Recovery of a known impulse response.
    // - Sweep bookkeeping and cumulative aggregation over listed horizons.
    // - Level-scale outcomes through the same machinery.
    // - The event rebound test and the upgrade-window robustness sweep.
    // -------------------------------------------------------------------------

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// `Δy_t = 0.4·Δx_t + 0.2·Δx_{t−1} + 0.1·Δdemand_t + e_t`, plus a level
    /// series `util = 0.3·x + noise`.
    fn panel(n: usize, seed: u64) -> Panel {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let start = ymd(2022, 1, 1);
        let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect();
        let mut draw = || -> f64 { StandardNormal.sample(&mut rng) };
        let (mut x, mut d, mut y, mut dx_prev) = (0.3, 0.0, 0.0, 0.0);
        let (mut treatment, mut demand, mut outcome, mut util) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for _ in 0..n {
            let dx = 0.02 * draw();
            let dd = 0.1 * draw();
            x += dx;
            d += dd;
            y += 0.4 * dx + 0.2 * dx_prev + 0.1 * dd + 0.002 * draw();
            dx_prev = dx;
            treatment.push(x);
            demand.push(d);
            outcome.push(y);
            util.push(0.3 * x + 0.001 * draw());
        }
        let schedule = RegimeSchedule::new(vec![
            RegimeBoundary::new("early", start),
            RegimeBoundary::new("late", ymd(2022, 7, 1)),
        ])
        .expect("valid schedule");
        Panel::new(dates, outcome, treatment, Some(demand), schedule)
            .expect("valid panel")
            .with_series("utilization", util)
            .expect("aligned series")
    }

    fn options(max_horizon: usize) -> LocalProjectionOptions {
        LocalProjectionOptions::new(max_horizon, vec![1, 7], None, 7, 7, 10).expect("valid options")
    }

    #[test]
    fn horizon_bandwidth_grows_and_is_capped() {
        assert_eq!(horizon_bandwidth(5, 0, 400), 6);
        assert_eq!(horizon_bandwidth(5, 1, 400), 6);
        assert_eq!(horizon_bandwidth(5, 28, 400), 33);
        assert_eq!(horizon_bandwidth(5, 56, 40), 39);
    }

    #[test]
    // Purpose
    // -------
    // The projection recovers a two-day impulse response and drops exactly
    // the rows lost to the lead.
    //
    // Given
    // -----
    // - 400 days with β₀ = 0.4, β₁ = 0.2 and no response afterwards.
    //
    // Expect
    // ------
    // - n_h = 400 − 1 − h; β₀ ≈ 0.4, β₁ ≈ 0.2, β₃ ≈ 0.
    // - The base bandwidth is ⌊4(399/100)^{2/9}⌋ = 5, horizon 3 uses 8.
    fn sweep_recovers_impulse_response() {
        // Arrange
        let p = panel(400, 31);
        let projector = LocalProjector::new(&p, OutcomeSpec::default(), options(3), None);

        // Act
        let sweep = projector.sweep().expect("sweep");

        // Assert
        assert_eq!(sweep.base_bandwidth, 5);
        assert_eq!(sweep.summary.attempted, 4);
        assert!(sweep.summary.failed.is_empty());
        for h in 0..=3 {
            assert_eq!(sweep.fit(h).expect("fitted").n, 399 - h);
        }
        assert_eq!(sweep.fit(3).expect("fitted").bandwidth, 8);
        assert!((sweep.fit(0).expect("fitted").beta.estimate - 0.4).abs() < 0.05);
        assert!((sweep.fit(1).expect("fitted").beta.estimate - 0.2).abs() < 0.08);
        assert!(sweep.fit(3).expect("fitted").beta.estimate.abs() < 0.08);
        assert!(sweep.fit(0).expect("fitted").bootstrap.is_none());
    }

    #[test]
    fn cumulative_over_listed_horizons_is_the_exact_sum() {
        let p = panel(300, 32);
        let sweep = LocalProjector::new(&p, OutcomeSpec::default(), options(7), None).sweep().expect("sweep");

        let cum = sweep.aggregate(&[1, 7]).into_fitted().expect("fitted");

        let b1 = sweep.fit(1).expect("fitted").beta.estimate;
        let b7 = sweep.fit(7).expect("fitted").beta.estimate;
        assert_eq!(cum.beta_cum, b1 + b7);
        assert_eq!(sweep.cumulative_table(&[1, 7]).len(), 2);
        assert_eq!(sweep.cumulative_through(7).into_fitted().expect("fitted").horizons.len(), 8);
    }

    #[test]
    fn level_outcome_uses_the_same_machinery() {
        let p = panel(300, 33);
        let spec = OutcomeSpec::level(SeriesKey::named("utilization"));
        let sweep = LocalProjector::new(&p, spec, options(1), None).sweep().expect("sweep");

        let fit = sweep.fit(0).expect("fitted");
        assert_relative_eq!(fit.beta.estimate, 0.3, epsilon = 0.05);
        assert_eq!(sweep.outcome.scale, OutcomeScale::Level);
        assert!(fit.spec.response.contains("utilization"));
    }

    #[test]
    // Purpose
    // -------
    // The rebound test reports both fits and a Wald test restricted to the
    // event indicators that survive in the design.
    //
    // Given
    // -----
    // - An event calendar with two indicator series.
    //
    // Expect
    // ------
    // - Two restrictions, a p-value in [0, 1], and the with-events bandwidth
    //   equal to base + 7.
    fn event_rebound_test_restricts_event_columns() {
        // Arrange
        let p = panel(300, 34);
        let events = EventCalendar::new()
            .with_event("airdrop_day", [ymd(2022, 3, 3), ymd(2022, 5, 5)])
            .with_event("outage_day", [ymd(2022, 4, 4)]);
        let projector = LocalProjector::new(&p, OutcomeSpec::default(), options(7), Some(&events));

        // Act
        let rebound = projector.event_rebound_test().expect("rebound test");

        // Assert
        assert_eq!(rebound.h, 7);
        assert_eq!(rebound.event_controls.len(), 2);
        let wald = rebound.wald.fitted().expect("wald computed");
        assert_eq!(wald.df, 2);
        assert!((0.0..=1.0).contains(&wald.p_value));
        assert_eq!(rebound.bandwidth, projector.base_bandwidth().expect("base") + 7);
    }

    #[test]
    fn rebound_without_collaborator_reports_not_computed() {
        let p = panel(200, 35);
        let projector = LocalProjector::new(&p, OutcomeSpec::default(), options(7), None);
        let rebound = projector.event_rebound_test().expect("rebound test");
        assert!(matches!(rebound.wald, Outcome::NotComputed { .. }));
        assert_eq!(rebound.with_events, rebound.without_events);
    }

    #[test]
    fn upgrade_window_sweep_drops_rows_around_regime_changes() {
        let p = panel(300, 36);
        let projector = LocalProjector::new(&p, OutcomeSpec::default(), options(1), None);

        let full = projector.sweep().expect("sweep");
        let trimmed = projector.sweep_excluding_upgrade_windows().expect("trimmed sweep");

        assert!(trimmed.fit(0).expect("fitted").n < full.fit(0).expect("fitted").n);
    }

    #[test]
    fn bootstrap_is_attached_per_horizon_when_requested() {
        let p = panel(250, 37);
        let opts = LocalProjectionOptions::new(
            1,
            vec![1],
            Some(BootstrapOptions::new(60, None, 42).expect("valid")),
            1,
            7,
            10,
        )
        .expect("valid options");
        let sweep = LocalProjector::new(&p, OutcomeSpec::default(), opts, None).sweep().expect("sweep");

        let interval = sweep.fit(0).and_then(|f| f.bootstrap.as_ref()).and_then(Outcome::fitted).expect("interval");
        assert!(interval.low < interval.high);
        assert_eq!(interval.replications, 60);
    }

    #[test]
    fn koyck_companion_delegates_to_levels_engine() {
        let p = panel(300, 38);
        let projector = LocalProjector::new(&p, OutcomeSpec::default(), options(1), None);
        let koyck = projector.koyck_long_run().expect("koyck");
        assert!(koyck.spec.index_of("outcome_lag1").is_some());
    }
}
