use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader};

use super::dom::{self, Listener};
use crate::error::{Result, VizError};
use crate::viewport::backing_size;

pub fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
    canvas
        .get_context("webgl2")
        .map_err(|_| VizError::WebGlUnavailable)?
        .ok_or(VizError::WebGlUnavailable)?
        .dyn_into::<GL>()
        .map_err(|_| VizError::WebGlUnavailable)
}

pub fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| VizError::ShaderCompile("could not create shader object".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(VizError::ShaderCompile(log))
    }
}

/// Compiles and links a vertex/fragment pair. Errors carry the driver's info
/// log as-is.
pub fn compile_program(gl: &GL, vert: &str, frag: &str) -> Result<WebGlProgram> {
    let vert_shader = compile_shader(gl, GL::VERTEX_SHADER, vert)?;
    let frag_shader = compile_shader(gl, GL::FRAGMENT_SHADER, frag)?;
    let program = gl
        .create_program()
        .ok_or_else(|| VizError::ProgramLink("could not create program object".into()))?;

    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(VizError::ProgramLink(log))
    }
}

pub fn attrib_location(gl: &GL, program: &WebGlProgram, name: &str) -> Result<u32> {
    let loc = gl.get_attrib_location(program, name);
    u32::try_from(loc).map_err(|_| VizError::ProgramLink(format!("attribute {name} not found")))
}

/// Keeps the canvas backing store and viewport in step with its CSS size
/// for as long as the returned listener lives.
pub fn auto_resize(canvas: &HtmlCanvasElement, gl: &GL) -> Result<Listener> {
    let window = dom::window()?;
    let resize = {
        let canvas = canvas.clone();
        let gl = gl.clone();
        let window = window.clone();
        move || {
            let (w, h) = backing_size(
                canvas.client_width(),
                canvas.client_height(),
                window.device_pixel_ratio(),
            );
            canvas.set_width(w);
            canvas.set_height(h);
            gl.viewport(0, 0, w as i32, h as i32);
        }
    };
    resize();
    Listener::new(&window, "resize", move |_| resize())
}
