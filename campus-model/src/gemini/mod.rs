mod client;
pub mod models;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TTS_MODEL, GeminiConfig, GeminiError, GeminiModel,
    from_wire_response, to_wire_request,
};
