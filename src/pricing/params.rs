use serde::{Deserialize, Serialize};

/// Goodness-of-fit metrics persisted alongside every parameter row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// Coefficient of determination.
    pub r2: f64,
    /// Root-mean-square error, in dollars.
    pub rmse: f64,
    /// Mean absolute error, in dollars.
    pub mae: f64,
    /// Mean absolute percentage error, over nonzero observations.
    pub mape: f64,
}

impl FitQuality {
    /// Quality echoed for the implicit zero-cost baseline finish.
    pub const EXACT: Self = Self {
        r2: 1.0,
        rmse: 0.0,
        mae: 0.0,
        mape: 0.0,
    };
}

/// Which area measure a finish's surface cost is billed against.
///
/// A calibration-time configuration, never inferred from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMetric {
    /// The billed material rectangle (length × width).
    BilledArea,
    /// The measured total surface area.
    MeasuredArea,
}

/// Calibrated rates for one (material type, material grade) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGradeParams {
    pub material_type: String,
    pub material_grade: String,
    /// Fitted intercept. Persisted for diagnostics; excluded from the
    /// evaluated price.
    pub material_base: f64,
    /// Dollars per cubic inch of billed material (area × thickness).
    pub material_rate: f64,
    /// Dollars per cutting operation.
    pub cut_count_rate: f64,
    pub quality: FitQuality,
    /// Number of historical records behind the fit.
    pub data_count: usize,
}

/// Calibrated surface rate for one non-baseline finish.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishParams {
    pub finish: String,
    /// Fitted intercept. Persisted for diagnostics; excluded from the
    /// evaluated price.
    pub finish_base: f64,
    /// Dollars per square inch of effective surface area.
    pub surface_rate: f64,
    /// Area measure the rate was fit against.
    pub surface_metric: SurfaceMetric,
    pub quality: FitQuality,
    /// Number of matched finish/baseline record pairs behind the fit.
    pub data_count: usize,
}

/// Finish configuration shared by calibration and evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishConfig {
    /// The reference finish with zero additional processing cost. It never
    /// has a parameter-table entry.
    pub baseline: String,
    /// Finish whose parameters stand in for an unconfigured finish.
    pub default_finish: String,
    /// Finishes billed against material area instead of measured surface
    /// area.
    pub billed_area_finishes: Vec<String>,
}

impl Default for FinishConfig {
    fn default() -> Self {
        Self {
            baseline: "No Deburring".into(),
            default_finish: "Matte Black Powder Coat".into(),
            billed_area_finishes: vec!["Deburred".into()],
        }
    }
}

impl FinishConfig {
    /// Whether `finish` is the zero-cost baseline.
    #[must_use]
    pub fn is_baseline(&self, finish: &str) -> bool {
        self.baseline == finish
    }

    /// The area measure configured for `finish`.
    #[must_use]
    pub fn surface_metric(&self, finish: &str) -> SurfaceMetric {
        if self.billed_area_finishes.iter().any(|f| f == finish) {
            SurfaceMetric::BilledArea
        } else {
            SurfaceMetric::MeasuredArea
        }
    }
}

/// Immutable snapshot of both calibrated parameter tables.
///
/// Built once by calibration or a table load, then only read. Reloads
/// publish a fresh snapshot through
/// [`ParameterStore`](crate::pricing::store::ParameterStore) instead of
/// mutating an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    config: FinishConfig,
    materials: Vec<MaterialGradeParams>,
    finishes: Vec<FinishParams>,
}

impl ParameterSet {
    /// Assembles a snapshot from calibrated rows.
    #[must_use]
    pub fn new(
        config: FinishConfig,
        materials: Vec<MaterialGradeParams>,
        finishes: Vec<FinishParams>,
    ) -> Self {
        Self {
            config,
            materials,
            finishes,
        }
    }

    /// The finish configuration this snapshot was calibrated under.
    #[must_use]
    pub fn config(&self) -> &FinishConfig {
        &self.config
    }

    /// Looks up the parameters for a material-grade combination.
    #[must_use]
    pub fn material(&self, material_type: &str, material_grade: &str) -> Option<&MaterialGradeParams> {
        self.materials
            .iter()
            .find(|m| m.material_type == material_type && m.material_grade == material_grade)
    }

    /// Looks up the parameters for a non-baseline finish.
    #[must_use]
    pub fn finish(&self, finish: &str) -> Option<&FinishParams> {
        self.finishes.iter().find(|f| f.finish == finish)
    }

    /// All material-grade rows, in calibration order.
    #[must_use]
    pub fn materials(&self) -> &[MaterialGradeParams] {
        &self.materials
    }

    /// All finish rows, in calibration order.
    #[must_use]
    pub fn finishes(&self) -> &[FinishParams] {
        &self.finishes
    }
}
