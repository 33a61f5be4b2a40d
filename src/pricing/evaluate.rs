use serde::Serialize;

use crate::error::PricingError;
use crate::pricing::params::{FitQuality, ParameterSet, SurfaceMetric};

/// Features of one part relevant to pricing.
#[derive(Debug, Clone, Copy)]
pub struct QuoteFeatures<'a> {
    pub material_type: &'a str,
    pub material_grade: &'a str,
    pub finish: &'a str,
    /// Billed material rectangle, in square inches.
    pub mat_use_area: f64,
    /// Material thickness, in inches.
    pub thickness: f64,
    /// Number of cutting operations.
    pub num_cuts: usize,
    /// Measured total surface area, in square inches.
    pub surface_area: f64,
}

/// Itemized result of one price evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub material_cost: f64,
    pub cut_count_cost: f64,
    pub surface_cost: f64,
    pub total: f64,
    /// The area the surface rate was applied to.
    pub effective_surface_area: f64,
    /// True when the requested finish was unconfigured and the default
    /// finish's parameters were substituted.
    pub used_default_finish: bool,
    /// Fit quality of the material-grade parameters used.
    pub material_fit: FitQuality,
    /// Fit quality of the finish parameters used; exact for the baseline.
    pub finish_fit: FitQuality,
}

/// Prices one part against a calibrated parameter snapshot.
///
/// Pure and reentrant: no I/O, no shared state beyond the read-only
/// snapshot, safe for unrestricted concurrent invocation.
///
/// The baseline finish carries no surface cost. An unconfigured finish
/// falls back to the designated default finish's parameters; the
/// substitution is logged and flagged in the breakdown rather than applied
/// silently, since it can mask a configuration gap.
///
/// # Errors
///
/// Returns [`PricingError::MissingParameters`] when the material-grade
/// combination has no calibrated parameters, and
/// [`PricingError::MissingDefaultFinish`] when the finish fallback itself
/// is unconfigured.
pub fn evaluate(
    params: &ParameterSet,
    part: &QuoteFeatures<'_>,
) -> Result<PriceBreakdown, PricingError> {
    let material = params
        .material(part.material_type, part.material_grade)
        .ok_or_else(|| PricingError::MissingParameters {
            material_type: part.material_type.into(),
            material_grade: part.material_grade.into(),
        })?;

    #[allow(clippy::cast_precision_loss)]
    let num_cuts = part.num_cuts as f64;
    let material_cost = material.material_rate * part.mat_use_area * part.thickness;
    let cut_count_cost = material.cut_count_rate * num_cuts;

    let surface = if params.config().is_baseline(part.finish) {
        None
    } else {
        Some(lookup_finish(params, part.finish)?)
    };

    let (surface_cost, effective_surface_area, used_default_finish, finish_fit) = match surface {
        None => (0.0, 0.0, false, FitQuality::EXACT),
        Some((finish_params, used_default)) => {
            // The area measure follows the requested finish's configured
            // category, even when the rate comes from the default finish.
            let effective = match params.config().surface_metric(part.finish) {
                SurfaceMetric::BilledArea => part.mat_use_area,
                SurfaceMetric::MeasuredArea => part.surface_area,
            };
            (
                finish_params.surface_rate * effective,
                effective,
                used_default,
                finish_params.quality,
            )
        }
    };

    Ok(PriceBreakdown {
        material_cost,
        cut_count_cost,
        surface_cost,
        total: material_cost + cut_count_cost + surface_cost,
        effective_surface_area,
        used_default_finish,
        material_fit: material.quality,
        finish_fit,
    })
}

fn lookup_finish<'a>(
    params: &'a ParameterSet,
    finish: &str,
) -> Result<(&'a crate::pricing::params::FinishParams, bool), PricingError> {
    if let Some(found) = params.finish(finish) {
        return Ok((found, false));
    }
    let default_finish = &params.config().default_finish;
    let fallback = params
        .finish(default_finish)
        .ok_or_else(|| PricingError::MissingDefaultFinish {
            finish: finish.into(),
            default_finish: default_finish.clone(),
        })?;
    tracing::warn!(
        %finish,
        %default_finish,
        "finish has no calibrated parameters; substituting the default finish"
    );
    Ok((fallback, true))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pricing::params::{
        FinishConfig, FinishParams, MaterialGradeParams, SurfaceMetric,
    };

    fn material(rate: f64, cut_rate: f64) -> MaterialGradeParams {
        MaterialGradeParams {
            material_type: "Aluminum".into(),
            material_grade: "5052-H32".into(),
            material_base: 3.0,
            material_rate: rate,
            cut_count_rate: cut_rate,
            quality: FitQuality {
                r2: 0.98,
                rmse: 0.4,
                mae: 0.3,
                mape: 2.5,
            },
            data_count: 40,
        }
    }

    fn finish(name: &str, rate: f64, metric: SurfaceMetric) -> FinishParams {
        FinishParams {
            finish: name.into(),
            finish_base: 0.5,
            surface_rate: rate,
            surface_metric: metric,
            quality: FitQuality {
                r2: 0.95,
                rmse: 0.2,
                mae: 0.15,
                mape: 4.0,
            },
            data_count: 25,
        }
    }

    fn snapshot() -> ParameterSet {
        ParameterSet::new(
            FinishConfig::default(),
            vec![material(2.0, 0.5)],
            vec![
                finish("Matte Black Powder Coat", 0.1, SurfaceMetric::MeasuredArea),
                finish("Deburred", 0.05, SurfaceMetric::BilledArea),
            ],
        )
    }

    fn part(finish: &str) -> QuoteFeatures<'_> {
        QuoteFeatures {
            material_type: "Aluminum",
            material_grade: "5052-H32",
            finish,
            mat_use_area: 10.0,
            thickness: 0.125,
            num_cuts: 3,
            surface_area: 20.5,
        }
    }

    #[test]
    fn baseline_finish_costs_nothing_for_surface() {
        let breakdown = evaluate(&snapshot(), &part("No Deburring")).unwrap();
        assert!((breakdown.surface_cost).abs() < 1e-12);
        assert!((breakdown.effective_surface_area).abs() < 1e-12);
        assert_eq!(breakdown.finish_fit, FitQuality::EXACT);
        // material 2.0·10·0.125 + cuts 0.5·3
        assert!((breakdown.total - 4.0).abs() < 1e-12);
    }

    #[test]
    fn worked_example_prices_to_four_dollars() {
        let breakdown = evaluate(&snapshot(), &part("No Deburring")).unwrap();
        assert!((breakdown.material_cost - 2.5).abs() < 1e-12);
        assert!((breakdown.cut_count_cost - 1.5).abs() < 1e-12);
        assert!((breakdown.total - 4.0).abs() < 1e-12);
    }

    #[test]
    fn measured_area_finish_bills_surface_area() {
        let breakdown = evaluate(&snapshot(), &part("Matte Black Powder Coat")).unwrap();
        assert!((breakdown.effective_surface_area - 20.5).abs() < 1e-12);
        assert!((breakdown.surface_cost - 2.05).abs() < 1e-12);
        assert!(!breakdown.used_default_finish);
    }

    #[test]
    fn billed_area_finish_bills_material_area() {
        let breakdown = evaluate(&snapshot(), &part("Deburred")).unwrap();
        assert!((breakdown.effective_surface_area - 10.0).abs() < 1e-12);
        assert!((breakdown.surface_cost - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unknown_finish_falls_back_to_default_loudly() {
        let breakdown = evaluate(&snapshot(), &part("Anodized Blue")).unwrap();
        assert!(breakdown.used_default_finish);
        // Default finish rate, measured-area metric for the requested name.
        assert!((breakdown.surface_cost - 0.1 * 20.5).abs() < 1e-12);
    }

    #[test]
    fn missing_material_parameters_are_a_hard_failure() {
        let mut features = part("No Deburring");
        features.material_grade = "7075-T6";
        let err = evaluate(&snapshot(), &features).unwrap_err();
        assert!(matches!(err, PricingError::MissingParameters { .. }));
    }

    #[test]
    fn missing_default_finish_is_a_hard_failure() {
        let set = ParameterSet::new(FinishConfig::default(), vec![material(2.0, 0.5)], vec![]);
        let err = evaluate(&set, &part("Anodized Blue")).unwrap_err();
        assert!(matches!(err, PricingError::MissingDefaultFinish { .. }));
    }
}
