use js_sys::ArrayBuffer;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AnalyserNode, AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, AudioNode,
    MediaStream, MediaStreamAudioSourceNode, MediaStreamConstraints,
};

use super::dom::{self, describe};
use crate::error::{Result, VizError};
use crate::scene::{ByteFrequencySource, FrequencySource};
use crate::spectrum::{bin_count, DecibelRange};

fn setup_err(value: JsValue) -> VizError {
    VizError::AudioSetup(describe(&value))
}

/// One demo run's audio graph. Cloning shares the same context.
#[derive(Clone)]
pub struct AudioSession {
    ctx: AudioContext,
}

impl AudioSession {
    pub fn new() -> Result<Self> {
        let ctx = AudioContext::new().map_err(setup_err)?;
        Ok(Self { ctx })
    }

    /// Decodes a whole encoded file.
    pub async fn decode(&self, data: &ArrayBuffer) -> Result<AudioBuffer> {
        let decode_err = |e: JsValue| VizError::Decode(describe(&e));
        let promise = self.ctx.decode_audio_data(data).map_err(decode_err)?;
        JsFuture::from(promise)
            .await
            .map_err(decode_err)?
            .dyn_into::<AudioBuffer>()
            .map_err(|_| VizError::Decode("decoder did not return an AudioBuffer".into()))
    }

    pub fn analyser(&self, fft_size: u32) -> Result<AnalyserNode> {
        let node = self.ctx.create_analyser().map_err(setup_err)?;
        node.set_fft_size(fft_size);
        Ok(node)
    }

    /// Starts `buffer` playing to the speakers, optionally tapped by `through`.
    pub fn play(
        &self,
        buffer: &AudioBuffer,
        through: Option<&AudioNode>,
    ) -> Result<AudioBufferSourceNode> {
        let source = self.ctx.create_buffer_source().map_err(setup_err)?;
        source.set_buffer(Some(buffer));

        let destination = self.ctx.destination();
        match through {
            Some(node) => {
                source
                    .connect_with_audio_node(node)
                    .and_then(|n| n.connect_with_audio_node(&destination))
                    .map_err(setup_err)?;
            }
            None => {
                source
                    .connect_with_audio_node(&destination)
                    .map_err(setup_err)?;
            }
        }

        source.start().map_err(setup_err)?;
        log::info!(
            "playing {:.1}s of audio at {} Hz",
            buffer.duration(),
            buffer.sample_rate()
        );
        Ok(source)
    }

    /// Asks for microphone access and wraps the stream as a source node.
    pub async fn microphone(&self) -> Result<MediaStreamAudioSourceNode> {
        let devices = dom::window()?
            .navigator()
            .media_devices()
            .map_err(setup_err)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(setup_err)?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(setup_err)?
            .dyn_into::<MediaStream>()
            .map_err(setup_err)?;

        self.ctx.create_media_stream_source(&stream).map_err(setup_err)
    }

    pub fn close(&self) {
        if let Err(err) = self.ctx.close() {
            log::warn!("could not close audio context: {}", describe(&err));
        }
    }

    /// Passes `result` through, closing the context first if it is an error.
    pub fn close_on_err<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            log::warn!("closing audio context after error: {err}");
            self.close();
        }
        result
    }

    pub fn state(&self) -> AudioContextState {
        self.ctx.state()
    }
}

/// Float analyser output remapped from decibels to `[0, 1]`.
pub struct FloatAnalyser {
    node: AnalyserNode,
    range: DecibelRange,
    data: Vec<f32>,
}

impl FloatAnalyser {
    /// Wraps `node`; its `fftSize` must already be set.
    pub fn new(node: AnalyserNode) -> Self {
        let range = DecibelRange::new(node.min_decibels() as f32, node.max_decibels() as f32);
        let data = vec![0.0; bin_count(node.fft_size())];
        Self { node, range, data }
    }
}

impl FrequencySource for FloatAnalyser {
    fn frequency_data(&mut self) -> &[f32] {
        self.node.get_float_frequency_data(&mut self.data);
        self.range.normalize_in_place(&mut self.data);
        &self.data
    }
}

/// Raw byte analyser output.
pub struct ByteAnalyser {
    node: AnalyserNode,
    data: Vec<u8>,
}

impl ByteAnalyser {
    pub fn new(node: AnalyserNode) -> Self {
        let data = vec![0; bin_count(node.fft_size())];
        Self { node, data }
    }
}

impl ByteFrequencySource for ByteAnalyser {
    fn byte_frequency_data(&mut self) -> &[u8] {
        self.node.get_byte_frequency_data(&mut self.data);
        &self.data
    }
}
