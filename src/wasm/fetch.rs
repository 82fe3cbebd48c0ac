use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::dom::{self, describe};
use crate::error::{Result, VizError};

fn fetch_err(path: &str, reason: impl Into<String>) -> VizError {
    VizError::Fetch {
        path: path.to_owned(),
        reason: reason.into(),
    }
}

async fn response_text(path: &str, request: Promise) -> Result<String> {
    let response = JsFuture::from(request)
        .await
        .map_err(|e| fetch_err(path, describe(&e)))?
        .dyn_into::<Response>()
        .map_err(|_| fetch_err(path, "not a Response"))?;

    if !response.ok() {
        return Err(fetch_err(path, format!("HTTP {}", response.status())));
    }

    let body = response.text().map_err(|e| fetch_err(path, describe(&e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| fetch_err(path, describe(&e)))?
        .as_string()
        .ok_or_else(|| fetch_err(path, "body is not text"))
}

/// Fetches every path as text. All requests are in flight before the first
/// one is awaited.
pub async fn fetch_texts(paths: &[&str]) -> Result<Vec<String>> {
    let window = dom::window()?;
    let requests: Vec<Promise> = paths.iter().map(|p| window.fetch_with_str(p)).collect();

    let mut texts = Vec::with_capacity(paths.len());
    for (path, request) in paths.iter().zip(requests) {
        texts.push(response_text(path, request).await?);
    }
    Ok(texts)
}
