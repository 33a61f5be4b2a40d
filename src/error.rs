use thiserror::Error;

/// Top-level error type for the Fabriq quoting engine.
#[derive(Debug, Error)]
pub enum FabriqError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Errors related to topology record lookups.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to the persisted body record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to serialize body record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors related to tabular dataset and parameter-table I/O.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read or write tabular data: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to price evaluation.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Pricing cannot proceed without calibrated material parameters.
    #[error("no calibrated parameters for material '{material_type}' grade '{material_grade}'")]
    MissingParameters {
        material_type: String,
        material_grade: String,
    },

    /// The requested finish is unconfigured and the designated default
    /// finish has no parameters either.
    #[error("finish '{finish}' is unconfigured and no default finish '{default_finish}' is calibrated")]
    MissingDefaultFinish {
        finish: String,
        default_finish: String,
    },
}

/// Convenience type alias for results using [`FabriqError`].
pub type Result<T> = std::result::Result<T, FabriqError>;
