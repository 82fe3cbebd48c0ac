/// Decibel floor and ceiling of an analyser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecibelRange {
    pub min: f32,
    pub max: f32,
}

impl DecibelRange {
    /// Browser defaults for a fresh `AnalyserNode`.
    pub const DEFAULT: Self = Self {
        min: -100.0,
        max: -30.0,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn normalize(&self, db: f32) -> f32 {
        // silence is reported as -Infinity
        if !db.is_finite() {
            return 0.0;
        }
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (db - self.min) / range
    }

    pub fn normalize_in_place(&self, data: &mut [f32]) {
        for v in data.iter_mut() {
            *v = self.normalize(*v);
        }
    }
}

impl Default for DecibelRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of bins an analyser of `fft_size` produces.
#[inline]
pub fn bin_count(fft_size: u32) -> usize {
    (fft_size / 2) as usize
}
