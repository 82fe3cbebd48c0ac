use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Float32Array;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlTexture, WebGlUniformLocation,
};

use super::dom::{self, js_err};
use super::gl::{attrib_location, compile_program};
use crate::error::{Result, VizError};
use crate::frame::{CancelToken, FrameAction, FrameDriver};
use crate::geometry::Geometry;
use crate::scene::{LuminanceTarget, RotationTarget, Scene, StripTarget};

pub const STRIP_VERT: &str = r#"
attribute vec2 a_position;
varying float v_g;

void main() {
  gl_Position = vec4((a_position * 2.0) - 1.0, 0.0, 1.0);
  v_g = a_position.y;
}
"#;

pub const STRIP_FRAG: &str = r#"precision mediump float;
varying float v_g;

void main() {
  gl_FragColor = vec4(1.0, v_g, 0.5, 1.0);
}
"#;

const TEXTURE_VERT: &str = r#"
attribute vec2 a_position;
attribute vec2 a_texcoord;
varying vec2 v_texcoord;

void main() {
  gl_Position = vec4(a_position, 0.0, 1.0);
  v_texcoord = a_texcoord;
}
"#;

const TEXTURE_FRAG: &str = r#"
precision mediump float;
varying vec2 v_texcoord;
uniform sampler2D u_texture;

void main() {
  gl_FragColor = texture2D(u_texture, v_texcoord);
}
"#;

const QUAD_POSITIONS: [f32; 8] = [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0];
const QUAD_TEXCOORDS: [f32; 8] = [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0];

fn create_buffer(gl: &GL) -> Result<WebGlBuffer> {
    gl.create_buffer()
        .ok_or_else(|| VizError::Js("could not create GL buffer".into()))
}

/// Binds a fresh buffer holding `data` to attribute `name`.
fn static_attribute(
    gl: &GL,
    program: &WebGlProgram,
    name: &str,
    data: &[f32],
    size: i32,
) -> Result<WebGlBuffer> {
    let loc = attrib_location(gl, program, name)?;
    let buffer = create_buffer(gl)?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_array_buffer_view(
        GL::ARRAY_BUFFER,
        &Float32Array::from(data),
        GL::STATIC_DRAW,
    );
    gl.enable_vertex_attrib_array(loc);
    gl.vertex_attrib_pointer_with_i32(loc, size, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

/// Spectrum bars as one dynamic triangle strip.
pub struct StripRenderer {
    gl: GL,
    _program: WebGlProgram,
    _buffer: WebGlBuffer,
    // JS-side copy of the vertices, reused while the length holds
    upload: Float32Array,
}

impl StripRenderer {
    pub fn new(gl: GL, vert: &str, frag: &str) -> Result<Self> {
        let program = compile_program(&gl, vert, frag)?;
        let position = attrib_location(&gl, &program, "a_position")?;
        let buffer = create_buffer(&gl)?;

        gl.use_program(Some(&program));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.enable_vertex_attrib_array(position);
        gl.vertex_attrib_pointer_with_i32(position, 2, GL::FLOAT, false, 0, 0);

        Ok(Self {
            gl,
            _program: program,
            _buffer: buffer,
            upload: Float32Array::new_with_length(0),
        })
    }
}

impl StripTarget for StripRenderer {
    fn draw_strip(&mut self, vertices: &[f32], vertex_count: usize) -> Result<()> {
        if self.upload.length() as usize != vertices.len() {
            self.upload = Float32Array::new_with_length(vertices.len() as u32);
        }
        self.upload.copy_from(vertices);

        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &self.upload, GL::DYNAMIC_DRAW);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, vertex_count as i32);
        Ok(())
    }
}

/// Byte spectrum as a 1-pixel-high luminance texture on a full-screen quad.
pub struct TextureRenderer {
    gl: GL,
    _program: WebGlProgram,
    _buffers: [WebGlBuffer; 2],
    _texture: WebGlTexture,
}

impl TextureRenderer {
    pub fn new(gl: GL) -> Result<Self> {
        let program = compile_program(&gl, TEXTURE_VERT, TEXTURE_FRAG)?;
        gl.use_program(Some(&program));

        let positions = static_attribute(&gl, &program, "a_position", &QUAD_POSITIONS, 2)?;
        let texcoords = static_attribute(&gl, &program, "a_texcoord", &QUAD_TEXCOORDS, 2)?;

        let texture = gl
            .create_texture()
            .ok_or_else(|| VizError::Js("could not create GL texture".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        let sampler = gl.get_uniform_location(&program, "u_texture");
        gl.uniform1i(sampler.as_ref(), 0);

        Ok(Self {
            gl,
            _program: program,
            _buffers: [positions, texcoords],
            _texture: texture,
        })
    }
}

impl LuminanceTarget for TextureRenderer {
    fn draw_luminance(&mut self, data: &[u8]) -> Result<()> {
        self.gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                GL::TEXTURE_2D,
                0,
                GL::LUMINANCE as i32,
                data.len() as i32,
                1,
                0,
                GL::LUMINANCE,
                GL::UNSIGNED_BYTE,
                Some(data),
            )
            .map_err(js_err)?;

        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        Ok(())
    }
}

/// Static point set turned by a `u_rotation` mat2 each frame.
pub struct TriangleRenderer {
    gl: GL,
    _program: WebGlProgram,
    _buffer: WebGlBuffer,
    rotation: Option<WebGlUniformLocation>,
    vertex_count: i32,
}

impl TriangleRenderer {
    pub fn new(gl: GL, vert: &str, frag: &str, geometry: &Geometry) -> Result<Self> {
        let program = compile_program(&gl, vert, frag)?;
        gl.use_program(Some(&program));

        let buffer = static_attribute(
            &gl,
            &program,
            "a_position",
            geometry.positions(),
            geometry.dims() as i32,
        )?;
        let rotation = gl.get_uniform_location(&program, "u_rotation");
        if rotation.is_none() {
            log::warn!("u_rotation not found; triangle will not turn");
        }

        Ok(Self {
            gl,
            _program: program,
            _buffer: buffer,
            rotation,
            vertex_count: geometry.vertex_count() as i32,
        })
    }
}

impl RotationTarget for TriangleRenderer {
    fn draw_rotated(&mut self, rotation: [f32; 4]) -> Result<()> {
        self.gl
            .uniform_matrix2fv_with_f32_array(self.rotation.as_ref(), false, &rotation);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, self.vertex_count);
        Ok(())
    }
}

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(f: &FrameClosure) -> Result<()> {
    let slot = f.borrow();
    if let Some(callback) = slot.as_ref() {
        dom::window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(js_err)?;
    }
    Ok(())
}

/// Runs `scene` once per animation frame until `token` is cancelled or a tick
/// fails.
pub fn run_frames<S: Scene + 'static>(mut scene: S, token: CancelToken) -> Result<()> {
    let mut driver = FrameDriver::new(token);
    if !driver.schedule() {
        return Ok(());
    }

    // `f` holds the animation-frame closure so it can request itself again.
    // Taking it out of the slot drops the closure once the current call
    // returns, which is how the loop ends.
    let f: FrameClosure = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        if driver.on_frame() == FrameAction::Stop {
            log::info!("frame loop stopped after {} frames", driver.frames());
            let _ = f.borrow_mut().take();
            return;
        }

        let scheduled = scene.tick(timestamp).and_then(|()| request_frame(&f));
        if let Err(err) = scheduled {
            log::error!("{err}");
            driver.fail();
            let _ = f.borrow_mut().take();
        }
    }));

    request_frame(&g).map_err(|err| {
        log::error!("could not start frame loop: {err}");
        let _ = g.borrow_mut().take();
        err
    })
}

