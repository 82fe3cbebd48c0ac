#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Audio spectrum demos on a WebGL canvas.
//!
//! The modules at the crate root are plain Rust and build on any target; the
//! browser bindings in [`wasm`] only exist on `wasm32`.

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod scene;
pub mod spectrum;
pub mod vertices;
pub mod viewport;

pub use config::{Config, DemoKind};
pub use error::VizError;
pub use frame::CancelToken;
pub use vertices::{update_vertices, Span, VertexMapper};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod audio;
    pub mod demo;
    pub mod dom;
    pub mod fetch;
    pub mod file_prompt;
    pub mod gl;
    pub mod query;
    pub mod render;

    pub use demo::DemoHandle;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = dom::window()?;
        let config = query::config_from_query(&window.location().search()?)?;
        if config.autostart {
            wasm_bindgen_futures::spawn_local(async move {
                match demo::run_demo(&config).await {
                    // kept on `window.demo` so the page can stop it
                    Ok(handle) => {
                        let _ = js_sys::Reflect::set(&window, &"demo".into(), &handle.into());
                    }
                    Err(err) => log::error!("{err}"),
                }
            });
        }
        Ok(())
    }

    /// Starts a demo from a query string such as `demo=mic&fft=1024`.
    #[wasm_bindgen]
    pub async fn run(search: String) -> Result<DemoHandle, JsValue> {
        let config = query::config_from_query(&search)?;
        Ok(demo::run_demo(&config).await?)
    }
}
