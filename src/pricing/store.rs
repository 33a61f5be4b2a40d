use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::pricing::params::{
    FinishConfig, FinishParams, FitQuality, MaterialGradeParams, ParameterSet, SurfaceMetric,
};

/// File name of the material-grade parameter table.
pub const MATERIAL_TABLE: &str = "material_parameters.csv";

/// File name of the finish parameter table.
pub const FINISH_TABLE: &str = "finish_parameters.csv";

// Flat CSV row shapes. The csv crate cannot serialize nested structs, so
// the fit-quality columns are spelled out here and folded back on read.

#[derive(Debug, Serialize, Deserialize)]
struct MaterialRow {
    material_type: String,
    material_grade: String,
    material_base: f64,
    material_rate: f64,
    cut_count_rate: f64,
    r2: f64,
    rmse: f64,
    mae: f64,
    mape: f64,
    data_count: usize,
}

impl From<&MaterialGradeParams> for MaterialRow {
    fn from(params: &MaterialGradeParams) -> Self {
        Self {
            material_type: params.material_type.clone(),
            material_grade: params.material_grade.clone(),
            material_base: params.material_base,
            material_rate: params.material_rate,
            cut_count_rate: params.cut_count_rate,
            r2: params.quality.r2,
            rmse: params.quality.rmse,
            mae: params.quality.mae,
            mape: params.quality.mape,
            data_count: params.data_count,
        }
    }
}

impl From<MaterialRow> for MaterialGradeParams {
    fn from(row: MaterialRow) -> Self {
        Self {
            material_type: row.material_type,
            material_grade: row.material_grade,
            material_base: row.material_base,
            material_rate: row.material_rate,
            cut_count_rate: row.cut_count_rate,
            quality: FitQuality {
                r2: row.r2,
                rmse: row.rmse,
                mae: row.mae,
                mape: row.mape,
            },
            data_count: row.data_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FinishRow {
    finish: String,
    finish_base: f64,
    surface_rate: f64,
    surface_metric: SurfaceMetric,
    r2: f64,
    rmse: f64,
    mae: f64,
    mape: f64,
    data_count: usize,
}

impl From<&FinishParams> for FinishRow {
    fn from(params: &FinishParams) -> Self {
        Self {
            finish: params.finish.clone(),
            finish_base: params.finish_base,
            surface_rate: params.surface_rate,
            surface_metric: params.surface_metric,
            r2: params.quality.r2,
            rmse: params.quality.rmse,
            mae: params.quality.mae,
            mape: params.quality.mape,
            data_count: params.data_count,
        }
    }
}

impl From<FinishRow> for FinishParams {
    fn from(row: FinishRow) -> Self {
        Self {
            finish: row.finish,
            finish_base: row.finish_base,
            surface_rate: row.surface_rate,
            surface_metric: row.surface_metric,
            quality: FitQuality {
                r2: row.r2,
                rmse: row.rmse,
                mae: row.mae,
                mape: row.mape,
            },
            data_count: row.data_count,
        }
    }
}

/// Writes both parameter tables into `dir`.
///
/// # Errors
///
/// Returns an error if either table cannot be written.
pub fn write_tables(set: &ParameterSet, dir: &Path) -> Result<()> {
    let mut materials = csv::Writer::from_path(dir.join(MATERIAL_TABLE)).map_err(DatasetError::from)?;
    for params in set.materials() {
        materials
            .serialize(MaterialRow::from(params))
            .map_err(DatasetError::from)?;
    }
    materials.flush().map_err(DatasetError::from)?;

    let mut finishes = csv::Writer::from_path(dir.join(FINISH_TABLE)).map_err(DatasetError::from)?;
    for params in set.finishes() {
        finishes
            .serialize(FinishRow::from(params))
            .map_err(DatasetError::from)?;
    }
    finishes.flush().map_err(DatasetError::from)?;

    Ok(())
}

/// Reads both parameter tables from `dir` into a fresh snapshot.
///
/// # Errors
///
/// Returns an error if either table cannot be read or parsed.
pub fn read_tables(dir: &Path, config: FinishConfig) -> Result<ParameterSet> {
    let mut materials = Vec::new();
    let mut reader = csv::Reader::from_path(dir.join(MATERIAL_TABLE)).map_err(DatasetError::from)?;
    for row in reader.deserialize::<MaterialRow>() {
        materials.push(row.map_err(DatasetError::from)?.into());
    }

    let mut finishes = Vec::new();
    let mut reader = csv::Reader::from_path(dir.join(FINISH_TABLE)).map_err(DatasetError::from)?;
    for row in reader.deserialize::<FinishRow>() {
        finishes.push(row.map_err(DatasetError::from)?.into());
    }

    Ok(ParameterSet::new(config, materials, finishes))
}

/// Shared handle publishing calibrated parameters to concurrent readers.
///
/// Readers take a cheap `Arc` clone of the current snapshot; a reload swaps
/// the snapshot wholesale, so an in-flight evaluation keeps the consistent
/// tables it started with and never observes a partial update.
#[derive(Debug)]
pub struct ParameterStore {
    current: RwLock<Arc<ParameterSet>>,
}

impl ParameterStore {
    /// Creates a store publishing the given snapshot.
    #[must_use]
    pub fn new(set: ParameterSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    /// Creates a store from tables on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be read.
    pub fn load(dir: &Path, config: FinishConfig) -> Result<Self> {
        Ok(Self::new(read_tables(dir, config)?))
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ParameterSet> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publishes a new snapshot, replacing the current one atomically.
    pub fn publish(&self, set: ParameterSet) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(set);
    }

    /// Re-reads the tables from disk and publishes them as a new snapshot,
    /// keeping the current finish configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be read; the current snapshot
    /// stays published in that case.
    pub fn reload(&self, dir: &Path) -> Result<()> {
        let config = self.snapshot().config().clone();
        let set = read_tables(dir, config)?;
        self.publish(set);
        Ok(())
    }
}
