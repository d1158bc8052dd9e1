use crate::flow::{Flow, FlowPlan, OutputMode, RawOutput, ToolTrace};
use crate::wav::{self, DEFAULT_BITS_PER_SAMPLE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use campus_core::{CampusError, Result, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const NAME: &str = "textToSpeech";

pub const VOICE: &str = "Algenib";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsOutput {
    /// `data:audio/wav;base64,...`
    pub media: String,
}

/// Reads text aloud, returning a WAV data URI.
pub struct TextToSpeechFlow {
    model: Option<String>,
    input_schema: Schema,
    output_schema: Schema,
}

impl TextToSpeechFlow {
    /// `model` overrides the client's default model for this flow only.
    pub fn new(model: Option<String>) -> Self {
        Self {
            model,
            input_schema: Schema::object()
                .required("text", Schema::string().non_empty().describe("The text to speak."))
                .into(),
            output_schema: Schema::object()
                .required(
                    "media",
                    Schema::string()
                        .min_len("data:audio/wav;base64,".len() + 1)
                        .describe("The spoken audio as a WAV data URI."),
                )
                .into(),
        }
    }
}

impl Flow for TextToSpeechFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Converts text into spoken audio."
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn plan(&self, input: &Value) -> Result<FlowPlan> {
        let text = input["text"].as_str().unwrap_or_default();
        Ok(FlowPlan::new(text, OutputMode::Audio { voice: VOICE }).with_model(self.model.clone()))
    }

    fn finalize(&self, _input: &Value, raw: RawOutput, _trace: &ToolTrace) -> Result<Value> {
        let RawOutput::Audio { mime_type, data } = raw else {
            return Err(CampusError::malformed("expected an audio response"));
        };
        let wav = if mime_type.contains("wav") {
            data
        } else {
            let rate = wav::sample_rate_from_mime(&mime_type).unwrap_or(DEFAULT_SAMPLE_RATE);
            wav::pcm_to_wav(&data, DEFAULT_CHANNELS, rate, DEFAULT_BITS_PER_SAMPLE)
        };
        Ok(json!({ "media": format!("data:audio/wav;base64,{}", STANDARD.encode(wav)) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_is_wrapped_as_wav_data_uri() {
        let flow = TextToSpeechFlow::new(None);
        let raw = RawOutput::Audio {
            mime_type: "audio/L16;codec=pcm;rate=24000".into(),
            data: vec![0; 8],
        };
        let out = flow.finalize(&json!({"text": "hi"}), raw, &ToolTrace::default()).unwrap();
        let media = out["media"].as_str().unwrap();
        let b64 = media.strip_prefix("data:audio/wav;base64,").unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes.len(), 44 + 8);
    }

    #[test]
    fn test_plan_requests_voice_and_model() {
        let flow = TextToSpeechFlow::new(Some("tts-model".into()));
        let plan = flow.plan(&json!({"text": "Breathe in."})).unwrap();
        assert_eq!(plan.prompt, "Breathe in.");
        assert_eq!(plan.output, OutputMode::Audio { voice: VOICE });
        assert_eq!(plan.model.as_deref(), Some("tts-model"));
    }
}
