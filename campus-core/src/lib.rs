//! # campus-core
//!
//! Core traits and types shared by every campus assistant crate.
//!
//! - [`Llm`] is the single outbound contract to the generative model.
//! - [`Content`] / [`Part`] describe conversation payloads.
//! - [`Schema`] declares and validates the shape of flow and tool payloads.
//! - [`Tool`] is a host-side function the model may call mid-generation.
//! - [`CampusError`] is the error taxonomy every invocation reports through.

pub mod error;
pub mod history;
pub mod model;
pub mod schema;
pub mod tool;
pub mod types;

pub use error::{CampusError, ErrorKind, Result};
pub use history::{ConversationHistory, DEFAULT_MAX_TURNS, Turn, TurnText, trim_turns};
pub use model::{
    FinishReason, FunctionDeclaration, GenerateContentConfig, Llm, LlmRequest, LlmResponse,
    ResponseModality, UsageMetadata,
};
pub use schema::{
    ArraySchema, Constraint, EnumSchema, Field, NumberSchema, ObjectSchema, Schema, StringSchema,
    Violation,
};
pub use tool::{Tool, ToolOutcome};
pub use types::{Content, FunctionResponseData, Part, Role};
