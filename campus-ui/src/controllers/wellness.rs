use super::chat::ChatSession;
use crate::invoker::{FlowInvoker, call};
use crate::notice::{Notice, UiError, UiResult};
use campus_core::Turn;
use campus_flow::flows::tts::{self, TtsInput, TtsOutput};
use campus_flow::flows::wellness;
use serde_json::json;
use tracing::warn;

const FAILURE: &str = "Sorry, I couldn't get a response at this time.";

pub const BREATHING_EXERCISE_TEXT: &str = "Let's do a simple breathing exercise. I'll guide you. Find a comfortable position. Close your eyes if you'd like. Now, breathe in slowly through your nose for four counts. One... two... three... four. Hold your breath for four counts. One... two... three... four. Now, exhale slowly through your mouth for six counts. One... two... three... four... five... six. Let's repeat that two more times.";

pub const BREATHING_REQUEST: &str = "Let's do a breathing exercise.";
pub const BREATHING_REPLY: &str =
    "Of course. Click the 'Listen' badge above to start the audio when it's ready.";

/// Wellness chat with an optional guided breathing clip.
#[derive(Debug, Clone, Default)]
pub struct WellnessController {
    chat: ChatSession,
    audio: Option<String>,
    synthesizing: bool,
}

impl WellnessController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        self.chat.turns()
    }

    pub fn is_loading(&self) -> bool {
        self.chat.is_loading()
    }

    pub fn is_synthesizing(&self) -> bool {
        self.synthesizing
    }

    /// Data URI of the last generated exercise, if any.
    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }

    pub async fn send(&mut self, invoker: &dyn FlowInvoker, query: &str) -> UiResult<String> {
        let output = self
            .chat
            .send(invoker, wellness::NAME, query, FAILURE, |history| {
                json!({ "query": query, "history": history })
            })
            .await?;
        Ok(output["response"].as_str().unwrap_or_default().to_string())
    }

    /// Append the request and the canned reply, then synthesize the exercise.
    /// On failure the turns are restored to what they were before.
    pub async fn breathing_exercise(&mut self, invoker: &dyn FlowInvoker) -> UiResult<String> {
        self.audio = None;
        self.synthesizing = true;
        let snapshot = self.chat.snapshot();
        let history = self.chat.history_mut();
        history.push(Turn::user(BREATHING_REQUEST));
        history.push(Turn::model(BREATHING_REPLY));

        let input = TtsInput { text: BREATHING_EXERCISE_TEXT.to_string() };
        let result: campus_core::Result<TtsOutput> = call(invoker, tts::NAME, &input).await;
        self.synthesizing = false;

        match result {
            Ok(output) => {
                self.audio = Some(output.media.clone());
                Ok(output.media)
            }
            Err(source) => {
                warn!(error = %source, "breathing exercise synthesis failed");
                self.chat.restore(snapshot);
                Err(UiError::Failed {
                    notice: Notice::error(
                        "Audio Error",
                        "Couldn't generate the audio exercise. Please try again.",
                    ),
                    source,
                })
            }
        }
    }
}
