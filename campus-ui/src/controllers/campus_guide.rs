use super::chat::ChatSession;
use crate::invoker::FlowInvoker;
use crate::notice::{Notice, UiError, UiResult};
use campus_core::{CampusError, Turn};
use campus_flow::flows::campus_guide::{CampusGuideOutput, NAME};
use serde_json::json;

const FAILURE: &str = "Sorry, I couldn't get a response at this time. Please try again later.";

/// Campus map chat. Each question is sent on its own, without prior turns.
#[derive(Debug, Clone, Default)]
pub struct CampusGuideController {
    chat: ChatSession,
    last: Option<CampusGuideOutput>,
}

impl CampusGuideController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        self.chat.turns()
    }

    pub fn is_loading(&self) -> bool {
        self.chat.is_loading()
    }

    /// The most recent answer, including any location record it found.
    pub fn last_answer(&self) -> Option<&CampusGuideOutput> {
        self.last.as_ref()
    }

    pub async fn ask(&mut self, invoker: &dyn FlowInvoker, query: &str) -> UiResult<CampusGuideOutput> {
        let output = self.chat.send(invoker, NAME, query, FAILURE, |_| json!({ "query": query })).await?;
        let answer: CampusGuideOutput = serde_json::from_value(output).map_err(|e| UiError::Failed {
            notice: Notice::failure(FAILURE),
            source: CampusError::malformed(format!("{NAME} reply did not decode: {e}")),
        })?;
        self.last = Some(answer.clone());
        Ok(answer)
    }
}
