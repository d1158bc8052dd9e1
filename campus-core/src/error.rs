use crate::schema::Violation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CampusError>;

/// Every failure a flow invocation can report. None of them is fatal to the
/// process; each is scoped to the invocation that raised it.
#[derive(Debug, Error)]
pub enum CampusError {
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<Violation>),

    #[error("model service error: {0}")]
    Model(String),

    #[error("malformed model output: {message}")]
    MalformedModelOutput { message: String, violations: Vec<Violation> },

    #[error("tool '{name}' failed: {message}")]
    Tool { name: String, message: String },

    #[error("model exceeded the limit of {0} tool-call rounds")]
    ToolRoundsExceeded(usize),

    #[error("template error: {0}")]
    Template(String),

    #[error("unknown flow '{0}'")]
    UnknownFlow(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Machine-readable classification of a [`CampusError`], surfaced on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    ModelServiceError,
    MalformedModelOutput,
    ToolFailure,
    ToolRoundsExceeded,
    UnknownFlow,
    Internal,
}

impl CampusError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedModelOutput { message: message.into(), violations: Vec::new() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Model(_) => ErrorKind::ModelServiceError,
            Self::MalformedModelOutput { .. } => ErrorKind::MalformedModelOutput,
            Self::Tool { .. } => ErrorKind::ToolFailure,
            Self::ToolRoundsExceeded(_) => ErrorKind::ToolRoundsExceeded,
            Self::UnknownFlow(_) => ErrorKind::UnknownFlow,
            Self::Template(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Field-level detail attached to the error, if any.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidInput(v) => v,
            Self::MalformedModelOutput { violations, .. } => violations,
            _ => &[],
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::ModelServiceError => "ModelServiceError",
            ErrorKind::MalformedModelOutput => "MalformedModelOutput",
            ErrorKind::ToolFailure => "ToolFailure",
            ErrorKind::ToolRoundsExceeded => "ToolRoundsExceeded",
            ErrorKind::UnknownFlow => "UnknownFlow",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(s)
    }
}

fn summarize(violations: &[Violation]) -> String {
    match violations {
        [] => "no detail".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}
