use crate::invoker::FlowInvoker;
use crate::notice::{Notice, UiError, UiResult};
use campus_core::{ConversationHistory, Turn};
use campus_flow::ChatOutput;
use serde_json::Value;
use tracing::warn;

pub(crate) const EMPTY_QUERY: &str = "Please enter a question.";

/// Turn list plus loading flag shared by the chat screens.
///
/// Sending appends the user turn first. On success the model turn follows
/// it; on failure the turns go back to exactly what they were before the
/// send, including any pair the cap trimmed to make room.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: ConversationHistory,
    loading: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: ConversationHistory) -> Self {
        Self { history, loading: false }
    }

    pub fn turns(&self) -> &[Turn] {
        self.history.turns()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub(crate) fn history_mut(&mut self) -> &mut ConversationHistory {
        &mut self.history
    }

    pub(crate) fn snapshot(&self) -> ConversationHistory {
        self.history.clone()
    }

    pub(crate) fn restore(&mut self, snapshot: ConversationHistory) {
        self.history = snapshot;
    }

    /// Send `query` through `flow`. `input` receives the turns that came
    /// before this query and builds the flow input from them.
    pub(crate) async fn send(
        &mut self,
        invoker: &dyn FlowInvoker,
        flow: &str,
        query: &str,
        failure: &str,
        input: impl FnOnce(&[Turn]) -> Value,
    ) -> UiResult<Value> {
        if query.trim().is_empty() {
            return Err(UiError::rejected("Invalid question", EMPTY_QUERY));
        }
        let input = input(self.history.turns());
        let snapshot = self.snapshot();
        self.history.push(Turn::user(query));
        self.loading = true;
        let result = invoker.invoke(flow, input).await;
        self.loading = false;

        let output = result.and_then(|output| {
            let reply: ChatOutput = serde_json::from_value(output.clone()).map_err(|e| {
                campus_core::CampusError::malformed(format!("{flow} reply did not decode: {e}"))
            })?;
            Ok((reply.response, output))
        });
        match output {
            Ok((response, output)) => {
                self.history.push(Turn::model(response));
                Ok(output)
            }
            Err(source) => {
                warn!(flow, error = %source, "chat turn failed");
                self.restore(snapshot);
                Err(UiError::Failed { notice: Notice::failure(failure), source })
            }
        }
    }
}
