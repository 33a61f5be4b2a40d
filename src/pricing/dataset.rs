use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// One historical priced part, as exported from the quoting service.
///
/// Column names follow the export format of the pricing dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingObservation {
    /// Part identity, used to join finish records to their baseline
    /// counterpart.
    pub part_number: String,
    pub material_type: String,
    pub material_grade: String,
    /// Material thickness, in inches.
    pub material_thickness: f64,
    pub finish: String,
    /// Billed material rectangle, in square inches.
    pub mat_use_sqin: f64,
    /// Number of cutting operations.
    pub num_cuts: f64,
    /// Measured total surface area, in square inches.
    pub surf_area_sqin: f64,
    /// Observed price, in dollars.
    pub price_per_part: f64,
}

/// Reads the historical dataset from a CSV export.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row fails to parse.
pub fn read_observations(path: &Path) -> Result<Vec<PricingObservation>> {
    let mut reader = csv::Reader::from_path(path).map_err(DatasetError::from)?;
    let mut observations = Vec::new();
    for row in reader.deserialize() {
        observations.push(row.map_err(DatasetError::from)?);
    }
    Ok(observations)
}
