//! regression::fitted — immutable fitted-specification records.
//!
//! A [`FittedSpec`] is created fresh by every estimation call and never
//! mutated afterwards; downstream code derives semi-elasticities, linear
//! combinations and Wald statistics from it by reference.
use crate::{
    inference::delta::{SemiElasticity, Z_95},
    panel::series::DatedSeries,
    statistical_tests::{diagnostics::ResidualDiagnostics, distributions::normal_two_sided_p},
};
use ndarray::{Array1, Array2};
use serde::Serialize;

/// How the coefficient covariance was estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CovarianceKind {
    /// `σ̂²(XᵀX)⁻¹`.
    Classical,
    /// Bartlett-kernel HAC sandwich with the given lag truncation.
    Hac { bandwidth: usize },
    /// Inverse observed information of a likelihood fit.
    ObservedInformation,
}

/// One row of a coefficient table (normal-reference inference).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub z_stat: f64,
    pub p_value: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl Coefficient {
    pub fn new(name: impl Into<String>, estimate: f64, std_error: f64) -> Self {
        let z_stat = estimate / std_error;
        Coefficient {
            name: name.into(),
            estimate,
            std_error,
            z_stat,
            p_value: normal_two_sided_p(z_stat),
            ci_low: estimate - Z_95 * std_error,
            ci_high: estimate + Z_95 * std_error,
        }
    }

    /// Percentage effect of a 10pp change, if this is a log-outcome slope.
    pub fn semi_elasticity(&self) -> SemiElasticity {
        SemiElasticity::from_linear(self.estimate, self.std_error)
    }
}

/// Point estimate and standard error of `aᵀβ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearEstimate {
    pub estimate: f64,
    pub std_error: f64,
}

/// Output of one regression call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedSpec {
    pub name: String,
    pub response: String,
    pub regressors: Vec<String>,
    pub coefficients: Array1<f64>,
    pub covariance: Array2<f64>,
    pub covariance_kind: CovarianceKind,
    pub residuals: DatedSeries,
    pub fitted_values: Vec<f64>,
    pub n: usize,
    pub k: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub dropped_regressors: Vec<String>,
    pub diagnostics: ResidualDiagnostics,
}

impl FittedSpec {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.regressors.iter().position(|r| r == name)
    }

    pub fn estimate(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.coefficients[i])
    }

    pub fn coefficient(&self, name: &str) -> Option<Coefficient> {
        self.index_of(name).map(|i| self.coefficient_at(i))
    }

    pub fn coefficient_table(&self) -> Vec<Coefficient> {
        (0..self.k).map(|i| self.coefficient_at(i)).collect()
    }

    /// HAC lag truncation actually used, if any.
    pub fn bandwidth(&self) -> Option<usize> {
        match self.covariance_kind {
            CovarianceKind::Hac { bandwidth } => Some(bandwidth),
            _ => None,
        }
    }

    /// `Σ wᵢ βᵢ` with standard error `sqrt(wᵀVw)`; `None` if a name is
    /// not among the regressors.
    pub fn linear_combination(&self, weights: &[(&str, f64)]) -> Option<LinearEstimate> {
        let mut a = Array1::<f64>::zeros(self.k);
        for &(name, w) in weights {
            a[self.index_of(name)?] += w;
        }
        let var = a.dot(&self.covariance.dot(&a));
        Some(LinearEstimate { estimate: a.dot(&self.coefficients), std_error: var.max(0.0).sqrt() })
    }

    pub fn semi_elasticity(&self, name: &str) -> Option<SemiElasticity> {
        self.coefficient(name).map(|c| c.semi_elasticity())
    }

    fn coefficient_at(&self, i: usize) -> Coefficient {
        let se = self.covariance[[i, i]].max(0.0).sqrt();
        Coefficient::new(self.regressors[i].clone(), self.coefficients[i], se)
    }
}
