#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Array, ArrayBuffer, Promise};
use spectrum_viz_wasm::scene::Scene;
use spectrum_viz_wasm::wasm::audio::AudioSession;
use spectrum_viz_wasm::wasm::demo::{self, PLAY_BUTTON_ID};
use spectrum_viz_wasm::wasm::fetch::fetch_texts;
use spectrum_viz_wasm::wasm::file_prompt::{FilePrompt, DROP_CONTAINER_ID, FILE_INPUT_ID};
use spectrum_viz_wasm::wasm::{dom, gl, query, render};
use spectrum_viz_wasm::{CancelToken, Config, DemoKind, VizError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use wasm_bindgen_test::*;
use web_sys::{
    AudioContextState, DataTransfer, Event, File, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlInputElement, WebGl2RenderingContext as GL,
};

wasm_bindgen_test_configure!(run_in_browser);

fn add_element(tag: &str, id: &str) -> web_sys::Element {
    let document = dom::document().unwrap();
    let el = document.create_element(tag).unwrap();
    el.set_id(id);
    document.body().unwrap().append_child(&el).unwrap();
    el
}

/// Returns `#id`, creating it if an earlier test has not.
fn ensure_element(tag: &str, id: &str) -> web_sys::Element {
    match dom::document().unwrap().get_element_by_id(id) {
        Some(el) => el,
        None => add_element(tag, id),
    }
}

fn prompt_elements() -> (HtmlElement, HtmlInputElement) {
    let container = ensure_element("div", DROP_CONTAINER_ID).dyn_into().unwrap();
    let input: HtmlInputElement = ensure_element("input", FILE_INPUT_ID).dyn_into().unwrap();
    input.set_type("file");
    (container, input)
}

/// Puts a one-file selection on `input` and fires `change`, as the picker does.
fn choose_file(input: &HtmlInputElement, name: &str) {
    let file = File::new_with_str_sequence(&Array::of1(&"RIFF".into()), name).unwrap();
    let transfer = DataTransfer::new().unwrap();
    transfer.items().add_with_file(&file).unwrap();
    input.set_files(transfer.files().as_ref());
    input.dispatch_event(&Event::new("change").unwrap()).unwrap();
}

fn is_hidden(el: &HtmlElement) -> bool {
    el.style().get_property_value("display").unwrap() == "none"
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        dom::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn next_frame() {
    let promise = Promise::new(&mut |resolve, _reject| {
        dom::window().unwrap().request_animation_frame(&resolve).unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

/// Polls `done` for up to a second.
async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        sleep(10).await;
    }
}

struct CountingScene(Rc<Cell<u32>>);

impl Scene for CountingScene {
    fn tick(&mut self, _timestamp_ms: f64) -> spectrum_viz_wasm::error::Result<()> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

#[wasm_bindgen_test]
fn missing_element_is_reported_by_type_and_id() {
    let err = dom::element_by_id::<HtmlCanvasElement>("no-such-canvas").unwrap_err();
    assert_eq!(
        err,
        VizError::MissingElement {
            kind: "HtmlCanvasElement",
            id: "no-such-canvas".into()
        }
    );
    assert_eq!(
        err.to_string(),
        r#"could not find HtmlCanvasElement by id "no-such-canvas""#
    );
}

#[wasm_bindgen_test]
fn wrong_element_type_is_rejected() {
    add_element("div", "not-a-canvas");
    assert!(dom::element_by_id::<HtmlCanvasElement>("not-a-canvas").is_err());
}

#[wasm_bindgen_test]
fn canvas_is_found() {
    add_element("canvas", "test-canvas");
    let canvas = dom::element_by_id::<HtmlCanvasElement>("test-canvas").unwrap();
    assert!(canvas.dyn_ref::<web_sys::Element>().is_some());
}

#[wasm_bindgen_test]
fn shader_errors_carry_the_info_log() {
    let canvas: HtmlCanvasElement = add_element("canvas", "shader-canvas").dyn_into().unwrap();
    let Ok(context) = gl::context(&canvas) else {
        // headless runner without WebGL2
        return;
    };

    let err = gl::compile_shader(&context, GL::VERTEX_SHADER, "void main() { nope }").unwrap_err();
    match err {
        VizError::ShaderCompile(log) => assert!(!log.is_empty()),
        other => panic!("unexpected {other:?}"),
    }

    let err = gl::compile_program(&context, "void main() {}", "also broken").unwrap_err();
    assert!(err.to_string().starts_with("could not compile shader:\n"));
}

#[wasm_bindgen_test]
async fn missing_fetch_reports_the_http_status() {
    let err = fetch_texts(&["./definitely-missing.txt"]).await.unwrap_err();
    assert_eq!(
        err,
        VizError::Fetch {
            path: "./definitely-missing.txt".into(),
            reason: "HTTP 404".into()
        }
    );
}

#[wasm_bindgen_test]
async fn cancelled_loop_runs_no_more_ticks_and_drops_its_closure() {
    let ticks = Rc::new(Cell::new(0));
    let token = CancelToken::new();
    render::run_frames(CountingScene(ticks.clone()), token.clone()).unwrap();

    next_frame().await;
    next_frame().await;
    assert!(ticks.get() > 0);

    let at_cancel = ticks.get();
    token.cancel();
    next_frame().await;
    next_frame().await;
    assert_eq!(ticks.get(), at_cancel);
    // the scene lived in the loop closure
    assert_eq!(Rc::strong_count(&ticks), 1);
}

#[wasm_bindgen_test]
fn bad_triangle_document_is_rejected_before_gl() {
    let canvas: HtmlCanvasElement = add_element("canvas", "triangle-canvas").dyn_into().unwrap();
    let result = demo::triangle_scene(&canvas, "", "", r#"{"points": []}"#, 1.0);
    assert!(matches!(result, Err(VizError::Geometry(_))));

    // a canvas that already handed out a webgl2 context refuses "2d"
    assert!(canvas.get_context("2d").unwrap().is_some());
}

#[wasm_bindgen_test]
fn query_values_are_percent_decoded() {
    let cfg = query::config_from_query("?demo=mic&spin=%2D3").unwrap();
    assert_eq!(cfg.demo, DemoKind::Mic);
    assert_eq!(cfg.spin, -3.0);

    assert_eq!(
        query::query_pairs("a+b=c%20d").unwrap(),
        vec![("a b".to_string(), "c d".to_string())]
    );
}

#[wasm_bindgen_test]
async fn failed_decode_closes_the_session() {
    let session = AudioSession::new().unwrap();
    assert_eq!(session.close_on_err(Ok::<_, VizError>(7)), Ok(7));
    assert_ne!(session.state(), AudioContextState::Closed);

    let decoded = session.decode(&ArrayBuffer::new(8)).await;
    let err = session.close_on_err(decoded).unwrap_err();
    assert!(matches!(err, VizError::Decode(_)));

    wait_until(|| session.state() == AudioContextState::Closed).await;
    assert_eq!(session.state(), AudioContextState::Closed);
}

#[wasm_bindgen_test]
async fn picking_a_file_enables_the_play_button() {
    let (container, input) = prompt_elements();
    let button: HtmlButtonElement = ensure_element("button", PLAY_BUTTON_ID).dyn_into().unwrap();

    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let _on_click = dom::Listener::new(&input, "click", move |_| counter.set(counter.get() + 1));

    let config = Config::from_pairs([("demo", "player")]);
    spawn_local(async move {
        let _ = demo::run_demo(&config).await;
    });
    sleep(20).await;
    assert!(button.disabled());
    assert!(!is_hidden(&container));

    // the input is hidden on the page; the container opens it
    container.click();
    assert_eq!(clicks.get(), 1);

    choose_file(&input, "tone.wav");
    wait_until(|| !button.disabled()).await;
    assert!(!button.disabled());
    assert!(is_hidden(&container));
}

#[wasm_bindgen_test]
async fn file_prompt_can_run_again() {
    let (container, input) = prompt_elements();
    let prompt = FilePrompt::find().unwrap();

    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let _on_click = dom::Listener::new(&input, "click", move |_| counter.set(counter.get() + 1));

    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = picked.clone();
    spawn_local(async move {
        for _ in 0..2 {
            if let Ok(file) = prompt.wait_for_file().await {
                sink.borrow_mut().push(file.name());
            }
        }
    });

    for (round, name) in ["first.wav", "second.wav"].into_iter().enumerate() {
        sleep(20).await;
        assert!(!is_hidden(&container), "prompt hidden in round {round}");

        clicks.set(0);
        container.click();
        assert_eq!(clicks.get(), 1, "one forwarded click in round {round}");

        choose_file(&input, name);
        wait_until(|| picked.borrow().len() == round + 1).await;
        assert!(is_hidden(&container));
    }
    assert_eq!(*picked.borrow(), ["first.wav", "second.wav"]);

    // both rounds removed their listeners
    clicks.set(0);
    container.click();
    assert_eq!(clicks.get(), 0);
}
