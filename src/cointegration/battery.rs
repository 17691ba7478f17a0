//! cointegration::battery — ADF, KPSS and Phillips–Perron on one series.
//!
//! The three tests run independently; a failure in one is recorded as a
//! non-`Fitted` [`Outcome`] and never aborts the others.
use crate::{
    outcome::Outcome,
    panel::series::dense,
    statistical_tests::unit_root::{
        Deterministic, UnitRootTest,
        adf::{LagSelection, adf},
        kpss::kpss,
        phillips_perron::phillips_perron,
    },
};
use serde::Serialize;
use tracing::warn;

/// Joint reading of the three tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationarityVerdict {
    /// Every computed test points to stationarity.
    Stationary,
    /// Every computed test points to a unit root.
    UnitRoot,
    /// The computed tests disagree.
    Mixed,
    /// No test could be computed.
    Undetermined,
}

/// UnitRootBattery — the three tests on one (possibly differenced) series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRootBattery {
    pub series: String,
    pub differenced: bool,
    pub adf: Outcome<UnitRootTest>,
    pub kpss: Outcome<UnitRootTest>,
    pub phillips_perron: Outcome<UnitRootTest>,
}

impl UnitRootBattery {
    /// Run all three tests on the finite entries of `values`.
    pub fn run(
        series: impl Into<String>, differenced: bool, values: &[f64], det: Deterministic,
    ) -> Self {
        let series = series.into();
        let data = dense(values);
        let battery = UnitRootBattery {
            adf: adf(&data, det, LagSelection::Aic).into(),
            kpss: kpss(&data, det, None).into(),
            phillips_perron: phillips_perron(&data, det).into(),
            series,
            differenced,
        };
        for (name, test) in battery.tests() {
            if let Some(reason) = test.failure_reason() {
                warn!(series = %battery.series, differenced, test = name, %reason, "unit-root test failed");
            }
        }
        battery
    }

    pub fn tests(&self) -> [(&'static str, &Outcome<UnitRootTest>); 3] {
        [("adf", &self.adf), ("kpss", &self.kpss), ("phillips_perron", &self.phillips_perron)]
    }

    pub fn verdict(&self) -> StationarityVerdict {
        let verdicts: Vec<bool> =
            self.tests().iter().filter_map(|(_, t)| t.fitted().map(|r| r.stationary)).collect();
        if verdicts.is_empty() {
            StationarityVerdict::Undetermined
        } else if verdicts.iter().all(|&s| s) {
            StationarityVerdict::Stationary
        } else if verdicts.iter().all(|&s| !s) {
            StationarityVerdict::UnitRoot
        } else {
            StationarityVerdict::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Verdicts of the battery on textbook stationary / integrated series, and
    // isolation of per-test failures.
    // -------------------------------------------------------------------------

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        (0..n).map(|_| StandardNormal.sample(&mut rng)).collect()
    }

    #[test]
    // Purpose
    // -------
    // White noise reads as stationary and its cumulative sum as a unit root.
    //
    // Given
    // -----
    // - 400 standard-normal draws and their running sum.
    //
    // Expect
    // ------
    // - Noise: `Stationary`. Walk: `UnitRoot`.
    fn battery_separates_noise_from_random_walk() {
        // Arrange
        let e = noise(400, 5);
        let walk: Vec<f64> = e.iter().scan(0.0, |s, v| {
            *s += v;
            Some(*s)
        }).collect();

        // Act
        let stationary = UnitRootBattery::run("noise", false, &e, Deterministic::Constant);
        let integrated = UnitRootBattery::run("walk", false, &walk, Deterministic::Constant);

        // Assert
        assert_eq!(stationary.verdict(), StationarityVerdict::Stationary);
        assert_eq!(integrated.verdict(), StationarityVerdict::UnitRoot);
    }

    #[test]
    fn too_short_series_is_undetermined_not_an_error() {
        let battery = UnitRootBattery::run("short", true, &[f64::NAN, 1.0, 2.0], Deterministic::ConstantTrend);
        assert!(!battery.adf.is_fitted());
        assert!(!battery.kpss.is_fitted());
        assert!(!battery.phillips_perron.is_fitted());
        assert_eq!(battery.verdict(), StationarityVerdict::Undetermined);
    }
}
