use js_sys::ArrayBuffer;
use wasm_bindgen::prelude::*;
use web_sys::{AnalyserNode, AudioNode, HtmlButtonElement, HtmlCanvasElement};

use super::audio::{AudioSession, ByteAnalyser, FloatAnalyser};
use super::dom::{self, Listener};
use super::fetch::fetch_texts;
use super::file_prompt::{read_file, FilePrompt, DROP_CONTAINER_ID};
use super::gl;
use super::render::{
    self, StripRenderer, TextureRenderer, TriangleRenderer, STRIP_FRAG, STRIP_VERT,
};
use crate::config::{Config, DemoKind};
use crate::error::{Result, VizError};
use crate::frame::CancelToken;
use crate::geometry::Geometry;
use crate::scene::{Scene, StripScene, TextureScene, TriangleScene};
use crate::vertices::VertexMapper;

pub const CANVAS_ID: &str = "c";
pub const PLAY_BUTTON_ID: &str = "play-button";
pub const INIT_AUDIO_BUTTON_ID: &str = "init-audio-button";

/// A running demo. `stop` ends the frame loop, closes the audio context and
/// removes the demo's page listeners.
#[wasm_bindgen]
pub struct DemoHandle {
    token: CancelToken,
    session: Option<AudioSession>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl DemoHandle {
    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(session) = self.session.take() {
            session.close();
        }
        self.listeners.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

fn start<S: Scene + 'static>(
    scene: S,
    session: Option<AudioSession>,
    listeners: Vec<Listener>,
) -> Result<DemoHandle> {
    let token = CancelToken::new();
    let started = render::run_frames(scene, token.clone());
    match &session {
        Some(session) => session.close_on_err(started)?,
        None => started?,
    }
    Ok(DemoHandle {
        token,
        session,
        listeners,
    })
}

fn canvas_context() -> Result<(web_sys::WebGl2RenderingContext, Listener)> {
    let canvas: HtmlCanvasElement = dom::element_by_id(CANVAS_ID)?;
    let gl = gl::context(&canvas)?;
    let resize = gl::auto_resize(&canvas, &gl)?;
    Ok((gl, resize))
}

pub async fn run_demo(config: &Config) -> Result<DemoHandle> {
    log::info!("starting {} demo (fft size {})", config.demo.as_str(), config.fft_size);
    match config.demo {
        DemoKind::File => file_strip(config).await,
        DemoKind::Mic => mic_strip(config).await,
        DemoKind::Texture => file_texture(config).await,
        DemoKind::Triangle => triangle(config).await,
        DemoKind::Player => player().await,
    }
}

/// Decodes `data` and plays it through a new analyser. The session is closed
/// again if any step after its creation fails.
async fn play_analysed(data: &ArrayBuffer, fft_size: u32) -> Result<(AudioSession, AnalyserNode)> {
    let session = AudioSession::new()?;
    let playing = async {
        let buffer = session.decode(data).await?;
        let node = session.analyser(fft_size)?;
        let tap: &AudioNode = &node;
        session.play(&buffer, Some(tap))?;
        Ok::<_, VizError>(node)
    };
    let node = session.close_on_err(playing.await)?;
    Ok((session, node))
}

async fn file_strip(config: &Config) -> Result<DemoHandle> {
    let prompt = FilePrompt::find()?;
    let (gl, resize) = canvas_context()?;
    let renderer = StripRenderer::new(gl, STRIP_VERT, STRIP_FRAG)?;

    let data = prompt.wait_for_file_data().await?;
    let (session, node) = play_analysed(&data, config.fft_size).await?;

    let mapper = VertexMapper::new(config.span);
    let scene = StripScene::new(FloatAnalyser::new(node), renderer, mapper);
    start(scene, Some(session), vec![resize])
}

async fn mic_strip(config: &Config) -> Result<DemoHandle> {
    dom::hide_by_id(DROP_CONTAINER_ID)?;
    let button: HtmlButtonElement = dom::element_by_id(INIT_AUDIO_BUTTON_ID)?;
    let (gl, resize) = canvas_context()?;

    let shaders = fetch_texts(&["./fft.vert", "./fft.frag"]).await?;
    let renderer = StripRenderer::new(gl, &shaders[0], &shaders[1])?;

    // audio contexts only start from a user gesture
    button.set_disabled(false);
    dom::next_event(&button, "click").await?;
    button.set_disabled(true);

    let session = AudioSession::new()?;
    let listening = async {
        let mic = session.microphone().await?;
        let node = session.analyser(config.fft_size)?;
        mic.connect_with_audio_node(&node).map_err(dom::js_err)?;
        Ok::<_, VizError>(node)
    };
    let node = session.close_on_err(listening.await)?;

    let mapper = VertexMapper::new(config.span);
    let scene = StripScene::new(FloatAnalyser::new(node), renderer, mapper);
    start(scene, Some(session), vec![resize])
}

async fn file_texture(config: &Config) -> Result<DemoHandle> {
    let prompt = FilePrompt::find()?;
    let (gl, resize) = canvas_context()?;
    let renderer = TextureRenderer::new(gl)?;

    let data = prompt.wait_for_file_data().await?;
    let (session, node) = play_analysed(&data, config.fft_size).await?;

    let scene = TextureScene::new(ByteAnalyser::new(node), renderer);
    start(scene, Some(session), vec![resize])
}

/// Builds the rotating-triangle scene. The document is validated before a GL
/// context is requested, so a bad document leaves the canvas untouched.
pub fn triangle_scene(
    canvas: &HtmlCanvasElement,
    vert: &str,
    frag: &str,
    document: &str,
    spin: f32,
) -> Result<(TriangleScene<TriangleRenderer>, Listener)> {
    let geometry = Geometry::from_json(document)?;

    let gl = gl::context(canvas)?;
    let resize = gl::auto_resize(canvas, &gl)?;
    let renderer = TriangleRenderer::new(gl, vert, frag, &geometry)?;
    Ok((TriangleScene::new(renderer, spin), resize))
}

async fn triangle(config: &Config) -> Result<DemoHandle> {
    dom::hide_by_id(DROP_CONTAINER_ID)?;
    let canvas: HtmlCanvasElement = dom::element_by_id(CANVAS_ID)?;
    let texts = fetch_texts(&["./triangle.vert", "./triangle.frag", "./triangle.json"]).await?;

    let (scene, resize) = triangle_scene(&canvas, &texts[0], &texts[1], &texts[2], config.spin)?;
    start(scene, None, vec![resize])
}

/// Plain playback: pick a file, then press play.
async fn player() -> Result<DemoHandle> {
    let prompt = FilePrompt::find()?;
    let button: HtmlButtonElement = dom::element_by_id(PLAY_BUTTON_ID)?;
    button.set_disabled(true);

    let file = prompt.wait_for_file().await?;
    let data = read_file(&file).await?;
    button.set_disabled(false);

    dom::next_event(&button, "click").await?;
    let session = AudioSession::new()?;
    let playing = async {
        let buffer = session.decode(&data).await?;
        session.play(&buffer, None)
    };
    session.close_on_err(playing.await)?;

    Ok(DemoHandle {
        token: CancelToken::new(),
        session: Some(session),
        listeners: Vec::new(),
    })
}
