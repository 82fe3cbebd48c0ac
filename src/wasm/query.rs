//! Query strings go through `URLSearchParams`, so keys and values reach
//! [`Config::from_pairs`] percent-decoded.

use js_sys::Array;
use wasm_bindgen::JsCast;
use web_sys::UrlSearchParams;

use super::dom::js_err;
use crate::config::Config;
use crate::error::{Result, VizError};

/// Decoded `(key, value)` pairs in page order. A leading `?` is allowed.
pub fn query_pairs(query: &str) -> Result<Vec<(String, String)>> {
    let params = UrlSearchParams::new_with_str(query).map_err(js_err)?;
    let entries = js_sys::try_iter(&params)
        .map_err(js_err)?
        .ok_or_else(|| VizError::Js("URLSearchParams is not iterable".into()))?;

    entries
        .map(|entry| {
            let pair: Array = entry.map_err(js_err)?.dyn_into().map_err(js_err)?;
            let key = pair.get(0).as_string().unwrap_or_default();
            let value = pair.get(1).as_string().unwrap_or_default();
            Ok((key, value))
        })
        .collect()
}

pub fn config_from_query(query: &str) -> Result<Config> {
    Ok(Config::from_pairs(query_pairs(query)?))
}
