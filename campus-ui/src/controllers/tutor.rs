use super::chat::ChatSession;
use crate::invoker::FlowInvoker;
use crate::notice::{UiError, UiResult};
use campus_core::Turn;
use campus_flow::flows::tutor::NAME;
use serde_json::json;

const FAILURE: &str = "Sorry, I couldn't get a response at this time. Please try again later.";

#[derive(Debug, Clone, Default)]
pub struct TutorController {
    subject: Option<String>,
    chat: ChatSession,
}

impl TutorController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Switching subject starts a fresh conversation.
    pub fn select_subject(&mut self, subject: impl Into<String>) {
        self.subject = Some(subject.into());
        self.chat.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        self.chat.turns()
    }

    pub fn is_loading(&self) -> bool {
        self.chat.is_loading()
    }

    /// Ask the tutor and return its answer.
    pub async fn ask(&mut self, invoker: &dyn FlowInvoker, query: &str) -> UiResult<String> {
        let Some(subject) = self.subject.clone() else {
            return Err(UiError::rejected(
                "No subject selected",
                "Please select a subject before asking a question.",
            ));
        };
        let output = self
            .chat
            .send(invoker, NAME, query, FAILURE, |history| {
                json!({ "subject": subject, "query": query, "history": history })
            })
            .await?;
        Ok(output["response"].as_str().unwrap_or_default().to_string())
    }
}
