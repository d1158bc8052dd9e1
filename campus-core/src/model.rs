use crate::{
    Result,
    types::{Content, Part},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The outbound contract to a generative model service.
///
/// One call is one round trip; implementations must not retry internally.
#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_content(&self, req: LlmRequest) -> Result<LlmResponse>;
}

/// A function the model may call, as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Overrides the model the client was built for (e.g. a speech model).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FunctionDeclaration>,
    pub config: Option<GenerateContentConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Text,
    Audio,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<i32>,
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<ResponseModality>,
    /// Prebuilt voice used when audio output is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Option<Content>,
    pub usage_metadata: Option<UsageMetadata>,
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_token_count: i32,
    pub candidates_token_count: i32,
    pub total_token_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

impl LlmRequest {
    pub fn new(contents: Vec<Content>) -> Self {
        Self { contents, ..Default::default() }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<FunctionDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the response schema for structured output.
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        let config = self.config.get_or_insert_with(GenerateContentConfig::default);
        config.response_schema = Some(schema);
        config.response_mime_type = Some("application/json".to_string());
        self
    }

    /// Ask for spoken audio instead of text.
    pub fn with_audio_response(mut self, voice_name: impl Into<String>) -> Self {
        let config = self.config.get_or_insert_with(GenerateContentConfig::default);
        config.response_modalities = vec![ResponseModality::Audio];
        config.voice_name = Some(voice_name.into());
        self
    }

    /// Set the generation config.
    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl LlmResponse {
    pub fn new(content: Content) -> Self {
        Self { content: Some(content), usage_metadata: None, finish_reason: Some(FinishReason::Stop) }
    }

    pub fn text(&self) -> Option<String> {
        self.content.as_ref().and_then(Content::text)
    }

    /// Function calls proposed by the model, in the order it emitted them.
    pub fn function_calls(&self) -> Vec<(&str, &serde_json::Value)> {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| match p {
                Part::FunctionCall { name, args } => Some((name.as_str(), args)),
                _ => None,
            })
            .collect()
    }

    /// First inline-data part, as `(mime_type, bytes)`.
    pub fn inline_data(&self) -> Option<(&str, &[u8])> {
        self.content.iter().flat_map(|c| c.parts.iter()).find_map(|p| match p {
            Part::InlineData { mime_type, data } => Some((mime_type.as_str(), data.as_slice())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_llm_request_with_response_schema() {
        let schema = serde_json::json!({
            "type": "OBJECT",
            "properties": { "summary": { "type": "STRING" } }
        });
        let req = LlmRequest::new(vec![]).with_response_schema(schema.clone());

        let config = req.config.unwrap();
        assert_eq!(config.response_schema, Some(schema));
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_llm_request_with_audio_response() {
        let req = LlmRequest::new(vec![Content::user("breathe")]).with_audio_response("Algenib");
        let config = req.config.unwrap();
        assert_eq!(config.response_modalities, vec![ResponseModality::Audio]);
        assert_eq!(config.voice_name.as_deref(), Some("Algenib"));
    }

    #[test]
    fn test_llm_response_function_calls() {
        let content = Content::new(Role::Model)
            .with_text("Let me check.")
            .with_part(Part::function_call(
                "getLocationInfo",
                serde_json::json!({"locationName": "Main Library"}),
            ));
        let resp = LlmResponse::new(content);

        let calls = resp.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "getLocationInfo");
        assert_eq!(calls[0].1["locationName"], "Main Library");
        assert_eq!(resp.text().as_deref(), Some("Let me check."));
    }

    #[test]
    fn test_llm_response_empty() {
        let resp = LlmResponse::default();
        assert!(resp.text().is_none());
        assert!(resp.function_calls().is_empty());
        assert!(resp.inline_data().is_none());
    }
}
