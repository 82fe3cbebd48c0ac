//! Per-frame pipelines: read the analyser, shape the data, draw once.
//!
//! Sources and targets are traits so the browser-backed analysers and
//! renderers in `wasm` plug in, and tests can swap in plain structs.

use crate::error::Result;
use crate::geometry::rotation_matrix;
use crate::vertices::VertexMapper;

/// Normalized float magnitudes, refreshed on every call.
pub trait FrequencySource {
    fn frequency_data(&mut self) -> &[f32];
}

/// Raw byte magnitudes (0-255), refreshed on every call.
pub trait ByteFrequencySource {
    fn byte_frequency_data(&mut self) -> &[u8];
}

pub trait StripTarget {
    fn draw_strip(&mut self, vertices: &[f32], vertex_count: usize) -> Result<()>;
}

pub trait LuminanceTarget {
    fn draw_luminance(&mut self, data: &[u8]) -> Result<()>;
}

pub trait RotationTarget {
    fn draw_rotated(&mut self, rotation: [f32; 4]) -> Result<()>;
}

/// One animation frame's worth of work.
pub trait Scene {
    fn tick(&mut self, timestamp_ms: f64) -> Result<()>;
}

pub struct StripScene<S, T> {
    source: S,
    target: T,
    mapper: VertexMapper,
}

impl<S: FrequencySource, T: StripTarget> StripScene<S, T> {
    pub fn new(source: S, target: T, mapper: VertexMapper) -> Self {
        Self {
            source,
            target,
            mapper,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}

impl<S: FrequencySource, T: StripTarget> Scene for StripScene<S, T> {
    fn tick(&mut self, _timestamp_ms: f64) -> Result<()> {
        let data = self.source.frequency_data();
        let vertices = self.mapper.map(data);
        let count = vertices.len() / crate::vertices::FLOATS_PER_VERTEX;
        self.target.draw_strip(vertices, count)
    }
}

pub struct TextureScene<S, T> {
    source: S,
    target: T,
}

impl<S: ByteFrequencySource, T: LuminanceTarget> TextureScene<S, T> {
    pub fn new(source: S, target: T) -> Self {
        Self { source, target }
    }
}

impl<S: ByteFrequencySource, T: LuminanceTarget> Scene for TextureScene<S, T> {
    fn tick(&mut self, _timestamp_ms: f64) -> Result<()> {
        let data = self.source.byte_frequency_data();
        self.target.draw_luminance(data)
    }
}

pub struct TriangleScene<T> {
    target: T,
    /// Radians per second.
    spin: f32,
}

impl<T: RotationTarget> TriangleScene<T> {
    pub fn new(target: T, spin: f32) -> Self {
        Self { target, spin }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn angle_at(&self, timestamp_ms: f64) -> f32 {
        let angle = (timestamp_ms / 1000.0 * self.spin as f64) % std::f64::consts::TAU;
        angle as f32
    }
}

impl<T: RotationTarget> Scene for TriangleScene<T> {
    fn tick(&mut self, timestamp_ms: f64) -> Result<()> {
        let angle = self.angle_at(timestamp_ms);
        self.target.draw_rotated(rotation_matrix(angle))
    }
}

impl<S: Scene + ?Sized> Scene for Box<S> {
    fn tick(&mut self, timestamp_ms: f64) -> Result<()> {
        (**self).tick(timestamp_ms)
    }
}
