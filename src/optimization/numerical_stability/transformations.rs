//! Parameter transforms and shared numerical tolerances.
//!
//! ARMA error coefficients are optimized in an unconstrained space. Each raw
//! value is squashed into a partial autocorrelation in `(−1, 1)` with `tanh`
//! (shrunk by [`STATIONARITY_MARGIN`]) and the Durbin–Levinson recursion
//! maps the partial autocorrelations to polynomial coefficients. Any raw
//! vector therefore yields a stationary AR polynomial, and the negated map
//! yields an invertible MA polynomial.

/// Slack keeping partial autocorrelations strictly inside the unit interval.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Eigenvalues at or below this are treated as zero in pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic small-denominator guard.
pub const GENERAL_TOL: f64 = 1e-12;

/// Map raw values to the coefficients `φ₁..φₚ` of a stationary
/// `1 − φ₁z − … − φₚzᵖ`.
///
/// Empty input gives an empty vector.
pub fn pacf_to_ar(raw: &[f64]) -> Vec<f64> {
    let mut phi: Vec<f64> = Vec::with_capacity(raw.len());
    for &value in raw {
        let r = value.tanh() * (1.0 - STATIONARITY_MARGIN);
        let previous = phi.clone();
        let k = previous.len();
        for j in 0..k {
            phi[j] = previous[j] - r * previous[k - 1 - j];
        }
        phi.push(r);
    }
    phi
}

/// Map raw values to the coefficients `θ₁..θ_q` of an invertible
/// `1 + θ₁z + … + θ_q z^q`.
pub fn pacf_to_ma(raw: &[f64]) -> Vec<f64> {
    pacf_to_ar(raw).into_iter().map(|a| -a).collect()
}
