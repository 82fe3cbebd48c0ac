use std::str::FromStr;

use crate::vertices::Span;

/// Which demo the page runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    /// Dropped file, float analyser, vertex strip.
    File,
    /// Microphone, float analyser, vertex strip with fetched shaders.
    Mic,
    /// Dropped file, byte analyser, luminance texture strip.
    Texture,
    /// Fetched triangle document, rotating.
    Triangle,
    /// File input and play button, no visuals.
    Player,
}

impl DemoKind {
    pub fn default_fft_size(self) -> u32 {
        match self {
            DemoKind::Mic => 512,
            _ => 2048,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DemoKind::File => "file",
            DemoKind::Mic => "mic",
            DemoKind::Texture => "texture",
            DemoKind::Triangle => "triangle",
            DemoKind::Player => "player",
        }
    }
}

impl FromStr for DemoKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(DemoKind::File),
            "mic" => Ok(DemoKind::Mic),
            "texture" => Ok(DemoKind::Texture),
            "triangle" => Ok(DemoKind::Triangle),
            "player" => Ok(DemoKind::Player),
            _ => Err(()),
        }
    }
}

/// Analyser FFT size limits (`AnalyserNode.fftSize`).
pub const MIN_FFT_SIZE: u32 = 32;
pub const MAX_FFT_SIZE: u32 = 32_768;

const MAX_SPIN: f32 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub demo: DemoKind,
    pub fft_size: u32,
    pub span: Span,
    /// Triangle rotation, radians per second.
    pub spin: f32,
    pub autostart: bool,
}

impl Config {
    pub fn defaults(demo: DemoKind) -> Self {
        Self {
            demo,
            fft_size: demo.default_fft_size(),
            span: Span::Full,
            spin: 1.0,
            autostart: true,
        }
    }

    /// Builds a config from already decoded query pairs, in page order.
    ///
    /// Defaults come from the `demo` key, other keys override, and the result
    /// is clamped rather than rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();

        let demo = pairs
            .iter()
            .rev()
            .find(|(k, _)| k.as_ref() == "demo")
            .and_then(|(_, v)| {
                let v = v.as_ref();
                let parsed = v.parse().ok();
                if parsed.is_none() {
                    log::warn!("unknown demo {v:?}, using file");
                }
                parsed
            })
            .unwrap_or(DemoKind::File);

        let mut cfg = Self::defaults(demo);
        for (key, value) in &pairs {
            cfg.apply(key.as_ref(), value.as_ref());
        }
        cfg.sanitize();
        cfg
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "demo" => {}
            "fft" => match value.parse() {
                Ok(v) => self.fft_size = v,
                Err(_) => log::warn!("ignoring fft={value:?}"),
            },
            "span" => match value {
                "full" => self.span = Span::Full,
                "half" => self.span = Span::Half,
                _ => log::warn!("ignoring span={value:?}"),
            },
            "spin" => match value.parse::<f32>() {
                Ok(v) if v.is_finite() => self.spin = v,
                _ => log::warn!("ignoring spin={value:?}"),
            },
            "autostart" => match value {
                "1" | "true" => self.autostart = true,
                "0" | "false" => self.autostart = false,
                _ => log::warn!("ignoring autostart={value:?}"),
            },
            _ => log::warn!("ignoring unknown key {key:?}"),
        }
    }

    fn sanitize(&mut self) {
        // clamp instead of failing
        self.fft_size = self
            .fft_size
            .clamp(MIN_FFT_SIZE, MAX_FFT_SIZE)
            .next_power_of_two();
        self.spin = self.spin.clamp(-MAX_SPIN, MAX_SPIN);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults(DemoKind::File)
    }
}
