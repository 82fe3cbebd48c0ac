//! The `triangle.json` point document.

use serde::Deserialize;

use crate::error::{Result, VizError};

#[derive(Debug, Deserialize)]
struct TriangleDocument {
    points: Vec<Vec<f32>>,
}

/// Validated, flattened vertex positions ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    dims: usize,
    positions: Vec<f32>,
}

impl Geometry {
    /// Parses and validates a `{ "points": number[][] }` document.
    ///
    /// Points must be non-empty and share one dimension in `2..=4` (a GL
    /// vertex attribute holds at most four components).
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: TriangleDocument =
            serde_json::from_str(text).map_err(|e| VizError::Geometry(e.to_string()))?;

        let dims = doc
            .points
            .first()
            .map(Vec::len)
            .ok_or_else(|| VizError::Geometry("points must not be empty".into()))?;

        if !(2..=4).contains(&dims) {
            return Err(VizError::Geometry(format!(
                "points must have 2 to 4 components, got {dims}"
            )));
        }

        if let Some((i, p)) = doc.points.iter().enumerate().find(|(_, p)| p.len() != dims) {
            return Err(VizError::Geometry(format!(
                "point {i} has {} components, expected {dims}",
                p.len()
            )));
        }

        Ok(Self {
            dims,
            positions: doc.points.into_iter().flatten().collect(),
        })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / self.dims
    }
}

/// Column-major 2x2 rotation by `angle` radians.
pub fn rotation_matrix(angle: f32) -> [f32; 4] {
    let (s, c) = angle.sin_cos();
    [c, s, -s, c]
}
