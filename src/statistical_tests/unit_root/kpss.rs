//! KPSS stationarity test.
//!
//! ```text
//! η   = Σ_t S_t² / n²,       S_t = Σ_{s≤t} e_s,
//! σ̂²  = [Σe² + 2 Σ_{i=1}^{L} (1 − i/(L+1)) Σ_t e_t e_{t−i}] / n,
//! KPSS = η / σ̂²,
//! ```
//!
//! with `e` the residuals of the series on a constant (or constant and
//! trend). The null is stationarity, so small p-values indicate a unit root.
//!
//! Lag `L`: Hobijn, Franses and Ooms (1998) automatic rule unless fixed;
//! capped at `n − 1`. p-values are interpolated in the KPSS (1992) table
//! and therefore clip to `[0.01, 0.10]`. `Deterministic::None` is treated as
//! `Constant`.
use crate::{
    regression::linalg::residualize,
    statistical_tests::{
        errors::{TestError, TestResult},
        unit_root::{CriticalValues, Deterministic, UnitRootKind, UnitRootTest},
        validation::validate_series,
    },
};
use ndarray::ArrayView1;

const TABLE_P: [f64; 4] = [0.10, 0.05, 0.025, 0.01];
const CRIT_LEVEL: [f64; 4] = [0.347, 0.463, 0.574, 0.739];
const CRIT_TREND: [f64; 4] = [0.119, 0.146, 0.176, 0.216];

/// KPSS test; `lags = None` selects the lag automatically.
pub fn kpss(series: &[f64], det: Deterministic, lags: Option<usize>) -> TestResult<UnitRootTest> {
    validate_series(series, 4)?;
    let n = series.len();
    let (det, crit) = match det {
        Deterministic::ConstantTrend => (Deterministic::ConstantTrend, CRIT_TREND),
        Deterministic::Constant | Deterministic::None => (Deterministic::Constant, CRIT_LEVEL),
    };
    let resid = residualize(&det.design(n), ArrayView1::from(series))
        .ok_or(TestError::SingularRegression { context: "KPSS detrending" })?
        .to_vec();
    let ssr: f64 = resid.iter().map(|e| e * e).sum();
    if ssr <= 0.0 {
        return Err(TestError::DegenerateStatistic { context: "KPSS residual variance" });
    }

    let lags = lags.unwrap_or_else(|| hobijn_lag(&resid)).min(n - 1);
    let mut cumsum = 0.0;
    let eta = resid
        .iter()
        .map(|e| {
            cumsum += e;
            cumsum * cumsum
        })
        .sum::<f64>()
        / (n as f64).powi(2);
    let stat = eta / long_run_variance(&resid, lags);
    Ok(UnitRootTest::new(
        UnitRootKind::Kpss,
        det,
        stat,
        interpolate_p(stat, &crit),
        lags,
        n,
        CriticalValues { one: crit[3], five: crit[1], ten: crit[0] },
    ))
}

/// Bartlett-weighted long-run variance with lag truncation `lags`.
pub(crate) fn long_run_variance(resid: &[f64], lags: usize) -> f64 {
    let n = resid.len();
    let mut s = resid.iter().map(|e| e * e).sum::<f64>();
    for i in 1..=lags.min(n.saturating_sub(1)) {
        let weight = 1.0 - i as f64 / (lags + 1) as f64;
        s += 2.0 * weight * lagged_product(resid, i);
    }
    s / n as f64
}

/// `Σ_t e_t e_{t−i}`.
fn lagged_product(resid: &[f64], i: usize) -> f64 {
    resid[i..].iter().zip(resid).map(|(a, b)| a * b).sum()
}

/// Hobijn et al. automatic bandwidth.
fn hobijn_lag(resid: &[f64]) -> usize {
    let n = resid.len();
    let nf = n as f64;
    let cov_lags = nf.powf(2.0 / 9.0) as usize;
    let mut s0 = resid.iter().map(|e| e * e).sum::<f64>() / nf;
    let mut s1 = 0.0;
    for i in 1..=cov_lags.min(n - 1) {
        let prod = lagged_product(resid, i) / (nf / 2.0);
        s0 += prod;
        s1 += i as f64 * prod;
    }
    let s_hat = s1 / s0;
    let gamma_hat = 1.1447 * (s_hat * s_hat).powf(1.0 / 3.0);
    (gamma_hat * nf.powf(1.0 / 3.0)) as usize
}

/// Linear interpolation of `stat` against ascending `crit`, clipped.
fn interpolate_p(stat: f64, crit: &[f64; 4]) -> f64 {
    if stat <= crit[0] {
        return TABLE_P[0];
    }
    if stat >= crit[3] {
        return TABLE_P[3];
    }
    let i = crit.windows(2).position(|w| stat <= w[1]).unwrap_or(2);
    let frac = (stat - crit[i]) / (crit[i + 1] - crit[i]);
    TABLE_P[i] + frac * (TABLE_P[i + 1] - TABLE_P[i])
}
