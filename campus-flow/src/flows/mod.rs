//! The campus assistant flows.

pub mod campus_guide;
pub mod recommendations;
pub mod reviews;
pub mod study_buddy;
pub mod tts;
pub mod tutor;
pub mod wellness;

use campus_core::{Result, Schema, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output shared by the chat flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOutput {
    pub response: String,
}

/// Schema of one `{role, content: [{text}]}` history turn.
pub(crate) fn history_schema() -> Schema {
    let turn = Schema::object()
        .required("role", Schema::enumeration(["user", "model"]))
        .required(
            "content",
            Schema::array(Schema::object().required("text", Schema::string())).min_items(1),
        );
    Schema::array(turn).describe("The conversation history.").into()
}

pub(crate) fn chat_output_schema(description: &str) -> Schema {
    Schema::object().required("response", Schema::string().describe(description)).into()
}

/// Deserialize already-validated input into the flow's typed form.
pub(crate) fn typed<T: serde::de::DeserializeOwned>(input: &Value) -> Result<T> {
    serde_json::from_value(input.clone())
        .map_err(|e| campus_core::CampusError::Config(format!("validated input did not deserialize: {e}")))
}

pub(crate) fn history_from(value: &Value) -> Result<Vec<Turn>> {
    match value.get("history") {
        Some(h) => typed(h),
        None => Ok(Vec::new()),
    }
}
