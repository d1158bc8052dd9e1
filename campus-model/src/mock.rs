use async_trait::async_trait;
use campus_core::{
    CampusError, Content, Llm, LlmRequest, LlmResponse, Part, Result, Role,
};
use std::collections::VecDeque;
use std::sync::Mutex;

enum Scripted {
    Response(LlmResponse),
    Error(String),
}

/// A model that replays a fixed script of responses and records every request.
///
/// Each call consumes one scripted step; calling past the end of the script
/// is a `Model` error.
pub struct MockLlm {
    name: String,
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlm {
    pub fn new() -> Self {
        Self {
            name: "mock-model".to_string(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_response(self, response: LlmResponse) -> Self {
        self.push(Scripted::Response(response));
        self
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.then_response(LlmResponse::new(Content::model(text)))
    }

    /// Structured output arrives as a JSON text part.
    pub fn then_json(self, value: serde_json::Value) -> Self {
        self.then_text(value.to_string())
    }

    pub fn then_function_call(self, name: impl Into<String>, args: serde_json::Value) -> Self {
        let content = Content::new(Role::Model).with_part(Part::function_call(name, args));
        self.then_response(LlmResponse::new(content))
    }

    pub fn then_inline_data(self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        let content = Content::new(Role::Model)
            .with_part(Part::InlineData { mime_type: mime_type.into(), data });
        self.then_response(LlmResponse::new(content))
    }

    /// A response with no content at all.
    pub fn then_empty(self) -> Self {
        self.then_response(LlmResponse::default())
    }

    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Error(message.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }

    fn push(&self, step: Scripted) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req);
        }
        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error(message)) => Err(CampusError::Model(message)),
            None => Err(CampusError::Model("mock script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_script_in_order() {
        let model = MockLlm::new().then_text("first").then_error("boom");

        let first = model.generate_content(LlmRequest::new(vec![Content::user("a")])).await.unwrap();
        assert_eq!(first.text().as_deref(), Some("first"));

        let second = model.generate_content(LlmRequest::new(vec![Content::user("b")])).await;
        assert!(matches!(second, Err(CampusError::Model(ref m)) if m == "boom"));

        let third = model.generate_content(LlmRequest::default()).await;
        assert!(third.is_err());
        assert_eq!(model.call_count(), 3);
        assert_eq!(model.requests()[1].contents[0].text().as_deref(), Some("b"));
    }
}
