//! Vertex assembly from decoded attribute streams.

use cgmath::{Vector2, Vector3};

use crate::data_structures::model::ModelVertex;
use crate::resources::report::{LoadReport, LoadWarning};

/// Merge position/normal/uv streams into the unified vertex list.
///
/// Malformed assets can disagree about the vertex count between attributes;
/// the shortest stream wins and the excess of the longer ones is dropped
/// with a report entry. Vertex color defaults to opaque white, the format in
/// scope carries no per-vertex color.
pub fn assemble_vertices(
    mesh: usize,
    positions: &[Vector3<f32>],
    normals: &[Vector3<f32>],
    uvs: &[Vector2<f32>],
    report: &mut LoadReport,
) -> Vec<ModelVertex> {
    let count = positions.len().min(normals.len()).min(uvs.len());
    if positions.len() != normals.len() || positions.len() != uvs.len() {
        report.warn(LoadWarning::MismatchedAttributeCounts {
            mesh,
            positions: positions.len(),
            normals: normals.len(),
            uvs: uvs.len(),
        });
    }
    (0..count)
        .map(|i| ModelVertex {
            position: positions[i].into(),
            normal: normals[i].into(),
            color: [1.0, 1.0, 1.0],
            uv: uvs[i].into(),
        })
        .collect()
}
