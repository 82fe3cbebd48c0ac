//! Frequency magnitudes to triangle-strip vertices.
//!
//! Every bin becomes a degenerate pair of points, `(x, magnitude)` then
//! `(x, 0)`, so consecutive bins stitch into a bar-chart silhouette when drawn
//! as a `TRIANGLE_STRIP`. Positions are in unit space; the vertex shader maps
//! them to clip space.

/// Floats written per bin: two 2D points.
pub const FLOATS_PER_BIN: usize = 4;

/// Floats per vertex (x, y).
pub const FLOATS_PER_VERTEX: usize = 2;

/// How much of the analyser output gets mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Span {
    #[default]
    Full,
    /// Only the lower half of the bins.
    Half,
}

impl Span {
    pub fn effective_len(self, bins: usize) -> usize {
        match self {
            Span::Full => bins,
            Span::Half => bins / 2,
        }
    }
}

/// Maps `data` into `vertices`, allocating only when there is no buffer yet.
///
/// A buffer of the wrong length (the bin count changed) is resized so the
/// output length always equals `4 * span.effective_len(data.len())`.
pub fn update_vertices(vertices: Option<Vec<f32>>, data: &[f32], span: Span) -> Vec<f32> {
    let n = span.effective_len(data.len());
    let mut vertices = vertices.unwrap_or_else(|| vec![0.0; n * FLOATS_PER_BIN]);
    vertices.resize(n * FLOATS_PER_BIN, 0.0);

    for (i, (quad, &magnitude)) in vertices
        .chunks_exact_mut(FLOATS_PER_BIN)
        .zip(&data[..n])
        .enumerate()
    {
        let x = i as f32 / n as f32;
        quad[0] = x;
        quad[1] = magnitude;
        quad[2] = x;
        quad[3] = 0.0;
    }

    vertices
}

/// Owns the scratch vertex buffer reused across frames.
#[derive(Debug, Default)]
pub struct VertexMapper {
    span: Span,
    vertices: Option<Vec<f32>>,
}

impl VertexMapper {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            vertices: None,
        }
    }

    /// Remaps `data` and returns the refreshed vertices.
    pub fn map(&mut self, data: &[f32]) -> &[f32] {
        let vertices = update_vertices(self.vertices.take(), data, self.span);
        self.vertices.insert(vertices).as_slice()
    }

    /// Vertex count of the last mapped frame.
    pub fn vertex_count(&self) -> usize {
        self.vertices
            .as_ref()
            .map_or(0, |v| v.len() / FLOATS_PER_VERTEX)
    }
}
