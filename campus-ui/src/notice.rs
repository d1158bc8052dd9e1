use campus_core::CampusError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    #[default]
    Info,
    Success,
    Destructive,
}

/// A short message for the user, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>, variant: NoticeVariant) -> Self {
        Self { title: title.into(), description: description.into(), variant }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NoticeVariant::Destructive)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NoticeVariant::Success)
    }

    /// The generic notice for a failed flow call.
    pub(crate) fn failure(description: &str) -> Self {
        Self::error("An error occurred.", description)
    }
}

#[derive(Debug, Error)]
pub enum UiError {
    /// Local validation refused the action; no flow was called.
    #[error("{}", .0.description)]
    Rejected(Notice),

    /// The flow call failed and local state was rolled back.
    #[error("{}: {source}", .notice.description)]
    Failed { notice: Notice, source: CampusError },
}

impl UiError {
    pub fn notice(&self) -> &Notice {
        match self {
            UiError::Rejected(notice) | UiError::Failed { notice, .. } => notice,
        }
    }

    pub(crate) fn rejected(title: &str, description: &str) -> Self {
        UiError::Rejected(Notice::error(title, description))
    }
}

pub type UiResult<T> = std::result::Result<T, UiError>;
