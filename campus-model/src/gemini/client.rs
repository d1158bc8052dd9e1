use super::models::{
    Blob, Content as WireContent, FunctionCall, FunctionResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part as WirePart, PrebuiltVoiceConfig,
    SpeechConfig, Tool as WireTool, VoiceConfig,
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use campus_core::{
    CampusError, Content, FinishReason, Llm, LlmRequest, LlmResponse, Part, ResponseModality,
    Role, UsageMetadata,
};
use reqwest::{
    Client, ClientBuilder, Response,
    header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue},
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("invalid api key header value")]
    InvalidApiKey(#[from] InvalidHeaderValue),

    #[error("failed to construct URL (suffix: {suffix})")]
    ConstructUrl {
        suffix: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client")]
    BuildClient(#[source] reqwest::Error),

    #[error("failed to perform request to '{url}'")]
    PerformRequest {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("bad response from server; code {code}; description: {}", description.as_deref().unwrap_or("none"))]
    BadResponse { code: u16, description: Option<String> },

    #[error("failed to decode response body")]
    DecodeResponse(#[source] reqwest::Error),

    #[error("inline data is not valid base64")]
    DecodeInlineData(#[from] base64::DecodeError),

    #[error("prompt was blocked: {0}")]
    Blocked(String),
}

impl From<GeminiError> for CampusError {
    fn from(e: GeminiError) -> Self {
        CampusError::Model(e.to_string())
    }
}

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client somewhere else (a proxy, or a mock server in tests).
    pub fn with_base_url(mut self, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("unreachable error: failed to parse default base URL")
}

/// [`Llm`] implementation over the Gemini `generateContent` REST endpoint.
#[derive(Debug)]
pub struct GeminiModel {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let headers = HeaderMap::from_iter([(
            HeaderName::from_static("x-goog-api-key"),
            HeaderValue::from_str(&config.api_key)?,
        )]);

        let http_client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(GeminiError::BuildClient)?;

        Ok(Self { http_client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_url(&self, model: &str, endpoint: &str) -> Result<Url, GeminiError> {
        let suffix = format!("models/{}:{}", model.trim_start_matches("models/"), endpoint);
        self.config
            .base_url
            .join(&suffix)
            .map_err(|source| GeminiError::ConstructUrl { suffix, source })
    }

    async fn post_generate(
        &self,
        url: Url,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .http_client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| GeminiError::PerformRequest { url, source })?;
        let response = check_response(response).await?;
        response.json().await.map_err(GeminiError::DecodeResponse)
    }
}

async fn check_response(response: Response) -> Result<Response, GeminiError> {
    let status = response.status();
    if !status.is_success() {
        let description = response.text().await.ok();
        Err(GeminiError::BadResponse { code: status.as_u16(), description })
    } else {
        Ok(response)
    }
}

/// Map a model-agnostic request onto the Gemini wire format.
pub fn to_wire_request(req: LlmRequest) -> GenerateContentRequest {
    let contents = req.contents.into_iter().map(to_wire_content).collect();

    let system_instruction = req.system_instruction.map(|text| WireContent {
        role: None,
        parts: vec![WirePart { text: Some(text), ..Default::default() }],
    });

    let tools = if req.tools.is_empty() {
        Vec::new()
    } else {
        vec![WireTool { function_declarations: req.tools }]
    };

    let generation_config = req.config.map(|config| GenerationConfig {
        temperature: config.temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        max_output_tokens: config.max_output_tokens,
        response_mime_type: config.response_mime_type,
        response_schema: config.response_schema,
        response_modalities: config
            .response_modalities
            .iter()
            .map(|m| match m {
                ResponseModality::Text => "TEXT".to_string(),
                ResponseModality::Audio => "AUDIO".to_string(),
            })
            .collect(),
        speech_config: config.voice_name.map(|voice_name| SpeechConfig {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig { voice_name },
            },
        }),
    });

    GenerateContentRequest { contents, system_instruction, tools, generation_config }
}

fn to_wire_content(content: Content) -> WireContent {
    let parts = content
        .parts
        .into_iter()
        .map(|part| match part {
            Part::Text { text } => WirePart { text: Some(text), ..Default::default() },
            Part::InlineData { mime_type, data } => WirePart {
                inline_data: Some(Blob { mime_type, data: STANDARD.encode(data) }),
                ..Default::default()
            },
            Part::FunctionCall { name, args } => {
                WirePart { function_call: Some(FunctionCall { name, args }), ..Default::default() }
            }
            Part::FunctionResponse { function_response } => WirePart {
                function_response: Some(FunctionResponse {
                    name: function_response.name,
                    response: function_response.response,
                }),
                ..Default::default()
            },
        })
        .collect();
    WireContent { role: Some(content.role.as_str().to_string()), parts }
}

/// Map the first candidate of a Gemini response back to an [`LlmResponse`].
pub fn from_wire_response(resp: GenerateContentResponse) -> Result<LlmResponse, GeminiError> {
    let GenerateContentResponse { candidates, usage_metadata, prompt_feedback } = resp;

    let usage_metadata = usage_metadata.map(|u| UsageMetadata {
        prompt_token_count: u.prompt_token_count,
        candidates_token_count: u.candidates_token_count,
        total_token_count: u.total_token_count,
    });

    let Some(candidate) = candidates.into_iter().next() else {
        if let Some(reason) = prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::Blocked(reason));
        }
        return Ok(LlmResponse { content: None, usage_metadata, finish_reason: None });
    };

    let mut parts = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(text) = part.text {
            parts.push(Part::Text { text });
        } else if let Some(blob) = part.inline_data {
            let data = STANDARD.decode(blob.data.as_bytes())?;
            parts.push(Part::InlineData { mime_type: blob.mime_type, data });
        } else if let Some(call) = part.function_call {
            parts.push(Part::FunctionCall { name: call.name, args: call.args });
        }
    }

    let content = (!parts.is_empty()).then(|| Content { role: Role::Model, parts });

    let finish_reason = candidate.finish_reason.as_deref().map(|r| match r {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        _ => FinishReason::Other,
    });

    Ok(LlmResponse { content, usage_metadata, finish_reason })
}

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    #[instrument(
        name = "call_llm",
        skip(self, req),
        fields(
            model.name = %req.model.as_deref().unwrap_or(&self.config.model),
            request.contents_count = req.contents.len(),
            request.tools_count = req.tools.len()
        )
    )]
    async fn generate_content(&self, req: LlmRequest) -> campus_core::Result<LlmResponse> {
        let model = req.model.clone().unwrap_or_else(|| self.config.model.clone());
        let url = self.build_url(&model, "generateContent")?;
        let body = to_wire_request(req);

        let response = self.post_generate(url, &body).await.inspect_err(|e| {
            warn!(error = %e, "generateContent failed");
        })?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                candidate_tokens = usage.candidates_token_count,
                "generateContent usage"
            );
        }
        Ok(from_wire_response(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::models::{Candidate, PromptFeedback};
    use campus_core::FunctionDeclaration;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let req = LlmRequest::new(vec![Content::user("Where is the library?")])
            .with_system_instruction("You are a guide.")
            .with_tools(vec![FunctionDeclaration {
                name: "getLocationInfo".into(),
                description: "Look up a location".into(),
                parameters: json!({"type": "OBJECT"}),
            }])
            .with_response_schema(json!({"type": "OBJECT"}));

        let wire = serde_json::to_value(to_wire_request(req)).unwrap();
        assert_eq!(wire["contents"][0]["role"], "user");
        assert_eq!(wire["contents"][0]["parts"][0]["text"], "Where is the library?");
        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "You are a guide.");
        assert_eq!(wire["tools"][0]["functionDeclarations"][0]["name"], "getLocationInfo");
        assert_eq!(wire["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_audio_config_wire_shape() {
        let req = LlmRequest::new(vec![Content::user("Breathe in")]).with_audio_response("Algenib");
        let wire = serde_json::to_value(to_wire_request(req)).unwrap();
        let config = &wire["generationConfig"];
        assert_eq!(config["responseModalities"], json!(["AUDIO"]));
        assert_eq!(
            config["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Algenib"
        );
    }

    #[test]
    fn test_function_response_round_trip_to_wire() {
        let content = Content::new(Role::User)
            .with_part(Part::function_response("getLocationInfo", json!({"status": "found"})));
        let wire = serde_json::to_value(to_wire_content(content)).unwrap();
        assert_eq!(wire["parts"][0]["functionResponse"]["name"], "getLocationInfo");
        assert!(wire["parts"][0].get("text").is_none());
    }

    #[test]
    fn test_response_skips_thoughts_and_decodes_audio() {
        let resp = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(WireContent {
                    role: Some("model".into()),
                    parts: vec![
                        WirePart { text: Some("thinking".into()), thought: Some(true), ..Default::default() },
                        WirePart {
                            inline_data: Some(Blob {
                                mime_type: "audio/L16;codec=pcm;rate=24000".into(),
                                data: STANDARD.encode([1u8, 2, 3, 4]),
                            }),
                            ..Default::default()
                        },
                    ],
                }),
                finish_reason: Some("STOP".into()),
            }],
            ..Default::default()
        };

        let converted = from_wire_response(resp).unwrap();
        assert!(converted.text().is_none());
        let (mime, data) = converted.inline_data().unwrap();
        assert!(mime.starts_with("audio/L16"));
        assert_eq!(data, &[1, 2, 3, 4]);
        assert_eq!(converted.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_blocked_prompt_is_error() {
        let resp = GenerateContentResponse {
            prompt_feedback: Some(PromptFeedback { block_reason: Some("SAFETY".into()) }),
            ..Default::default()
        };
        assert!(matches!(from_wire_response(resp), Err(GeminiError::Blocked(_))));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = GeminiConfig::new("key").with_base_url(Url::parse("http://localhost:9000/v1beta").unwrap());
        assert_eq!(config.base_url.as_str(), "http://localhost:9000/v1beta/");
    }
}
