//! Drag-and-drop / file picker prompt.

use js_sys::{ArrayBuffer, Function};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File, HtmlElement, HtmlInputElement};

use super::dom::{self, describe, first_file, js_err, Listener, Pending};
use crate::error::{Result, VizError};

pub const DROP_CONTAINER_ID: &str = "file-drop-container";
pub const FILE_INPUT_ID: &str = "file-input";

/// Elements of the prompt, looked up up front so a broken page fails early.
pub struct FilePrompt {
    container: HtmlElement,
    input: HtmlInputElement,
}

impl FilePrompt {
    pub fn find() -> Result<Self> {
        Ok(Self {
            container: dom::element_by_id(DROP_CONTAINER_ID)?,
            input: dom::element_by_id(FILE_INPUT_ID)?,
        })
    }

    /// Waits for a dropped or picked file, hides the prompt and reads the
    /// file's bytes.
    pub async fn wait_for_file_data(&self) -> Result<ArrayBuffer> {
        let file = self.wait_for_file().await?;
        log::info!("reading {} ({} bytes)", file.name(), file.size());
        read_file(&file).await
    }

    /// Shows the prompt and waits for a dropped or picked file. Clicking the
    /// container opens the hidden file input. Listeners are removed once a
    /// file arrives, so the prompt can run again.
    pub async fn wait_for_file(&self) -> Result<File> {
        dom::show(&self.container);
        self.input.set_value("");

        Pending::new(|resolve| self.register(resolve))?
            .wait()
            .await?
            .dyn_into::<File>()
            .map_err(js_err)
    }

    fn register(&self, resolve: Function) -> Result<Vec<Listener>> {
        let input = self.input.clone();
        let click = Listener::new(&self.container, "click", move |_| input.click())?;

        let dragover = Listener::new(&self.container, "dragover", |e| e.prevent_default())?;

        let container = self.container.clone();
        let on_drop = resolve.clone();
        let drop = Listener::new(&self.container, "drop", move |e| {
            e.prevent_default();
            let file = e
                .dyn_ref::<DragEvent>()
                .and_then(DragEvent::data_transfer)
                .and_then(|dt| first_file(dt.files()));
            if let Some(file) = file {
                accept(&container, &on_drop, &file);
            }
        })?;

        let container = self.container.clone();
        let input = self.input.clone();
        let change = Listener::new(&self.input, "change", move |_| {
            if let Some(file) = first_file(input.files()) {
                accept(&container, &resolve, &file);
            }
        })?;

        Ok(vec![click, dragover, drop, change])
    }
}

fn accept(container: &HtmlElement, resolve: &Function, file: &File) {
    dom::hide(container);
    let _ = resolve.call1(&JsValue::NULL, file);
}

pub async fn read_file(file: &File) -> Result<ArrayBuffer> {
    JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| VizError::FileRead(describe(&e)))?
        .dyn_into::<ArrayBuffer>()
        .map_err(|e| VizError::FileRead(describe(&e)))
}
