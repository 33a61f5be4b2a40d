pub mod calibrate;
pub mod dataset;
pub mod evaluate;
pub mod params;
pub mod store;

pub use calibrate::Calibrator;
pub use dataset::PricingObservation;
pub use evaluate::{evaluate, PriceBreakdown, QuoteFeatures};
pub use params::{
    FinishConfig, FinishParams, FitQuality, MaterialGradeParams, ParameterSet, SurfaceMetric,
};
pub use store::ParameterStore;
