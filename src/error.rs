use thiserror::Error;

/// Everything that can stop a demo. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VizError {
    #[error("could not find {kind} by id \"{id}\"")]
    MissingElement { kind: &'static str, id: String },

    #[error("could not create WebGL context")]
    WebGlUnavailable,

    #[error("could not compile shader:\n{0}")]
    ShaderCompile(String),

    #[error("could not compile program:\n{0}")]
    ProgramLink(String),

    #[error("could not decode audio: {0}")]
    Decode(String),

    #[error("invalid triangle document: {0}")]
    Geometry(String),

    #[error("file reader failed to read file contents:\n\n{0}")]
    FileRead(String),

    #[error("could not fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("audio setup failed: {0}")]
    AudioSetup(String),

    #[error("{0}")]
    Js(String),
}

pub type Result<T, E = VizError> = std::result::Result<T, E>;

#[cfg(target_arch = "wasm32")]
impl From<VizError> for wasm_bindgen::JsValue {
    fn from(err: VizError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
