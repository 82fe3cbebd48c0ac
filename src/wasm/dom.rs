use js_sys::{Function, Promise};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event, EventTarget, File, FileList, HtmlElement, Window};

use crate::error::{Result, VizError};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| VizError::Js("no window".into()))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| VizError::Js("no document".into()))
}

/// Looks up `#id` and checks it is a `T`.
pub fn element_by_id<T: JsCast>(id: &str) -> Result<T> {
    document()?
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| VizError::MissingElement {
            kind: short_type_name::<T>(),
            id: id.to_owned(),
        })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Best-effort text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

pub fn js_err(value: JsValue) -> VizError {
    VizError::Js(describe(&value))
}

/// An event listener that is removed again when dropped.
pub struct Listener {
    target: EventTarget,
    event: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        Ok(Self {
            target: target.clone(),
            event: event.to_owned(),
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.closure.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(&self.event, callback);
    }
}

/// A promise plus the listeners that settle it. Awaiting it removes them.
pub struct Pending {
    promise: Promise,
    listeners: Vec<Listener>,
}

impl Pending {
    /// `register` receives the resolve function and returns the listeners
    /// that may call it.
    pub fn new<R>(register: R) -> Result<Self>
    where
        R: FnOnce(Function) -> Result<Vec<Listener>>,
    {
        let mut register = Some(register);
        let mut registered = Ok(Vec::new());
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            if let Some(register) = register.take() {
                registered = register(resolve);
            }
        });
        Ok(Self {
            promise,
            listeners: registered?,
        })
    }

    pub async fn wait(self) -> Result<JsValue> {
        let Self { promise, listeners } = self;
        let settled = JsFuture::from(promise).await.map_err(js_err);
        drop(listeners);
        settled
    }
}

/// Resolves with the next `event` fired on `target`.
pub async fn next_event(target: &EventTarget, event: &str) -> Result<Event> {
    Pending::new(|resolve| {
        let listener = Listener::new(target, event, move |e| {
            let _ = resolve.call1(&JsValue::NULL, &e);
        })?;
        Ok(vec![listener])
    })?
    .wait()
    .await?
    .dyn_into::<Event>()
    .map_err(js_err)
}

pub fn first_file(files: Option<FileList>) -> Option<File> {
    files.and_then(|list| list.get(0))
}

pub fn hide(element: &HtmlElement) {
    if let Err(err) = element.style().set_property("display", "none") {
        log::warn!("could not hide element: {}", describe(&err));
    }
}

/// Undoes [`hide`], falling back to the stylesheet's display.
pub fn show(element: &HtmlElement) {
    if let Err(err) = element.style().remove_property("display") {
        log::warn!("could not show element: {}", describe(&err));
    }
}

/// Hides `#id` if the page has it.
pub fn hide_by_id(id: &str) -> Result<()> {
    if let Some(el) = document()?.get_element_by_id(id) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            hide(el);
        }
    }
    Ok(())
}
