pub mod holes;
pub mod metrics;
pub mod shape;
pub mod wires;

pub use holes::{merge_opposite_holes, Hole, HoleCandidate};
pub use metrics::{AnalyzeBody, BodyAnalysis, BodyMetrics};
pub use shape::HoleShape;
pub use wires::{partition_face_wires, WirePartition};
