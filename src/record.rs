use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{BodyAnalysis, BodyMetrics, Hole, HoleShape};
use crate::error::{RecordError, Result};
use crate::topology::SolidRecord;

/// Persisted record for one analyzed body: the aggregated metrics plus the
/// finalized hole inventory. Serialized once per parsed body and handed to
/// the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRecord {
    #[serde(flatten)]
    pub metrics: BodyMetrics,
    pub hole_data: Vec<HoleRecord>,
}

/// One hole in the persisted record. Face references are resolved to
/// ordinals within the solid's face list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoleRecord {
    pub id: String,
    pub shape: HoleShape,
    pub equivalent_diameter: f64,
    pub perimeter: f64,
    pub location: [f64; 3],
    pub has_backside: bool,
    pub face_ids: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<[String; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl BodyRecord {
    /// Builds the persisted record from a finished analysis.
    #[must_use]
    pub fn from_analysis(solid: &SolidRecord, analysis: &BodyAnalysis) -> Self {
        let ordinals: HashMap<_, _> = solid
            .faces
            .iter()
            .enumerate()
            .map(|(ordinal, &face)| (face, ordinal))
            .collect();

        let hole_data = analysis
            .holes
            .iter()
            .map(|hole| hole_record(hole, &ordinals))
            .collect();

        Self {
            metrics: analysis.metrics.clone(),
            hole_data,
        }
    }

    /// Serializes the record as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self).map_err(RecordError::from)?)
    }
}

fn hole_record(
    hole: &Hole,
    ordinals: &HashMap<crate::topology::FaceId, usize>,
) -> HoleRecord {
    HoleRecord {
        id: hole.id.clone(),
        shape: hole.shape,
        equivalent_diameter: hole.diameter,
        perimeter: hole.perimeter,
        location: [hole.location.x, hole.location.y, hole.location.z],
        has_backside: hole.has_backside,
        face_ids: hole
            .faces
            .iter()
            .filter_map(|face| ordinals.get(face).copied())
            .collect(),
        merged_from: hole.merged_from.clone(),
        thickness: hole.thickness,
    }
}
