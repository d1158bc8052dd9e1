//! # campus-model
//!
//! Implementations of [`campus_core::Llm`]:
//!
//! - [`GeminiModel`] calls the Gemini `generateContent` REST endpoint.
//! - [`MockLlm`] replays a scripted sequence of responses, for tests.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiConfig, GeminiError, GeminiModel};
pub use mock::MockLlm;
