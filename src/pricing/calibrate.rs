use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::math::least_squares::{solve_lower_bounded, solve_unconstrained};
use crate::math::TOLERANCE;
use crate::pricing::dataset::PricingObservation;
use crate::pricing::params::{
    FinishConfig, FinishParams, FitQuality, MaterialGradeParams, ParameterSet, SurfaceMetric,
};

/// Minimum matched records for a group to be calibrated. Thinner groups are
/// skipped; the coverage gap is the caller's to handle.
pub const MIN_GROUP_RECORDS: usize = 5;

/// Lower bound applied to every fitted coefficient.
pub const COEFFICIENT_FLOOR: f64 = 0.001;

/// Offline calibration of the pricing model over historical priced parts.
///
/// Two passes: per material-grade combination over baseline-finish records,
/// and per non-baseline finish over price offsets against matched baseline
/// records. Groups are independent and fit in parallel; output order is
/// deterministic (sorted by group key).
pub struct Calibrator {
    config: FinishConfig,
}

impl Calibrator {
    /// Creates a calibrator with the given finish configuration.
    #[must_use]
    pub fn new(config: FinishConfig) -> Self {
        Self { config }
    }

    /// Runs both calibration passes and assembles an immutable snapshot.
    #[must_use]
    pub fn run(&self, observations: &[PricingObservation]) -> ParameterSet {
        let materials = self.fit_material_grades(observations);
        let finishes = self.fit_finishes(observations);
        ParameterSet::new(self.config.clone(), materials, finishes)
    }

    /// Fits `price = b0 + b1·(matUseArea·thickness) + b2·numCuts` per
    /// (material type, material grade), over baseline-finish records only.
    fn fit_material_grades(&self, observations: &[PricingObservation]) -> Vec<MaterialGradeParams> {
        let mut groups: std::collections::BTreeMap<(String, String), Vec<&PricingObservation>> =
            std::collections::BTreeMap::new();
        for obs in observations.iter().filter(|o| o.finish == self.config.baseline) {
            groups
                .entry((obs.material_type.clone(), obs.material_grade.clone()))
                .or_default()
                .push(obs);
        }

        groups
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|((material_type, material_grade), rows)| {
                if rows.len() < MIN_GROUP_RECORDS {
                    tracing::info!(
                        %material_type,
                        %material_grade,
                        count = rows.len(),
                        "skipping material group with too few records"
                    );
                    return None;
                }

                let x = DMatrix::from_fn(rows.len(), 3, |i, j| match j {
                    0 => 1.0,
                    1 => rows[i].mat_use_sqin * rows[i].material_thickness,
                    _ => rows[i].num_cuts,
                });
                let y = DVector::from_iterator(
                    rows.len(),
                    rows.iter().map(|r| r.price_per_part),
                );

                let coefficients = constrained_fit(&x, &y);
                let quality = fit_quality(&x, &coefficients, &y);
                tracing::info!(
                    %material_type,
                    %material_grade,
                    r2 = quality.r2,
                    mape = quality.mape,
                    "material group calibrated"
                );

                Some(MaterialGradeParams {
                    material_type,
                    material_grade,
                    material_base: coefficients[0],
                    material_rate: coefficients[1],
                    cut_count_rate: coefficients[2],
                    quality,
                    data_count: rows.len(),
                })
            })
            .collect()
    }

    /// Fits `offset = c0 + c1·surfaceAreaMetric` per non-baseline finish,
    /// where each finish record joins its baseline counterpart by part
    /// identity, material, and thickness.
    fn fit_finishes(&self, observations: &[PricingObservation]) -> Vec<FinishParams> {
        let baseline_rows: Vec<&PricingObservation> = observations
            .iter()
            .filter(|o| o.finish == self.config.baseline)
            .collect();

        let names: BTreeSet<String> = observations
            .iter()
            .filter(|o| o.finish != self.config.baseline)
            .map(|o| o.finish.clone())
            .collect();

        names
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|finish| {
                let metric = self.config.surface_metric(&finish);
                let mut features = Vec::new();
                let mut offsets = Vec::new();
                for obs in observations.iter().filter(|o| o.finish == finish) {
                    let Some(baseline) =
                        baseline_rows.iter().find(|b| matches_baseline(obs, b))
                    else {
                        continue;
                    };
                    offsets.push(obs.price_per_part - baseline.price_per_part);
                    features.push(match metric {
                        SurfaceMetric::BilledArea => obs.mat_use_sqin,
                        SurfaceMetric::MeasuredArea => obs.surf_area_sqin,
                    });
                }

                if offsets.len() < MIN_GROUP_RECORDS {
                    tracing::info!(
                        %finish,
                        count = offsets.len(),
                        "skipping finish with too few matched records"
                    );
                    return None;
                }

                let x = DMatrix::from_fn(offsets.len(), 2, |i, j| {
                    if j == 0 {
                        1.0
                    } else {
                        features[i]
                    }
                });
                let y = DVector::from_vec(offsets);

                let coefficients = constrained_fit(&x, &y);
                let quality = fit_quality(&x, &coefficients, &y);
                tracing::info!(%finish, r2 = quality.r2, "finish calibrated");

                Some(FinishParams {
                    finish,
                    finish_base: coefficients[0],
                    surface_rate: coefficients[1],
                    surface_metric: metric,
                    quality,
                    data_count: y.len(),
                })
            })
            .collect()
    }
}

fn matches_baseline(obs: &PricingObservation, baseline: &PricingObservation) -> bool {
    obs.part_number == baseline.part_number
        && obs.material_type == baseline.material_type
        && obs.material_grade == baseline.material_grade
        && (obs.material_thickness - baseline.material_thickness).abs() < TOLERANCE
}

/// Constrained solve with the documented fallback: when the bounded
/// iteration fails to converge, take the unconstrained least-squares
/// solution and clamp every non-intercept coefficient to the floor. The
/// low confidence of such a fit shows up in its quality metrics.
fn constrained_fit(x: &DMatrix<f64>, y: &DVector<f64>) -> DVector<f64> {
    let seed = seed_coefficients(x, y);
    let fit = solve_lower_bounded(x, y, COEFFICIENT_FLOOR, &seed);
    if fit.converged {
        return fit.coefficients;
    }

    tracing::warn!("constrained fit did not converge; falling back to clamped least squares");
    match solve_unconstrained(x, y) {
        Some(mut coefficients) => {
            for j in 1..coefficients.len() {
                coefficients[j] = coefficients[j].max(COEFFICIENT_FLOOR);
            }
            coefficients
        }
        None => fit.coefficients,
    }
}

/// Closed-form rough estimates used to start the constrained solve:
/// a tenth of the mean price for the intercept, and a tenth of the mean
/// price per mean feature unit for each rate.
fn seed_coefficients(x: &DMatrix<f64>, y: &DVector<f64>) -> DVector<f64> {
    let y_mean = y.mean();
    let mut seed = DVector::zeros(x.ncols());
    seed[0] = 0.1 * y_mean;
    for j in 1..x.ncols() {
        let feature_mean = x.column(j).mean();
        seed[j] = if feature_mean > 0.0 {
            0.1 * y_mean / feature_mean
        } else {
            0.01
        };
    }
    seed
}

#[allow(clippy::cast_precision_loss)]
fn fit_quality(x: &DMatrix<f64>, coefficients: &DVector<f64>, y: &DVector<f64>) -> FitQuality {
    let predicted = x * coefficients;
    let residuals = y - &predicted;
    let n = y.len() as f64;

    let ss_res = residuals.norm_squared();
    let y_mean = y.mean();
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let r2 = if ss_tot > TOLERANCE {
        1.0 - ss_res / ss_tot
    } else if ss_res < TOLERANCE {
        1.0
    } else {
        0.0
    };

    let rmse = (ss_res / n).sqrt();
    let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;

    let percentage_terms: Vec<f64> = y
        .iter()
        .zip(residuals.iter())
        .filter(|(observed, _)| observed.abs() > TOLERANCE)
        .map(|(observed, residual)| (residual / observed).abs())
        .collect();
    let mape = if percentage_terms.is_empty() {
        0.0
    } else {
        100.0 * percentage_terms.iter().sum::<f64>() / percentage_terms.len() as f64
    };

    FitQuality { r2, rmse, mae, mape }
}
