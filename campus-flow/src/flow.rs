use campus_core::{CampusError, Result, Schema, ToolOutcome, Turn};
use serde_json::Value;

/// How the model's final answer becomes the flow output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain text, placed under `field` of an object.
    Text { field: &'static str },
    /// A JSON object matching the output schema.
    Structured,
    /// Spoken audio from a prebuilt voice.
    Audio { voice: &'static str },
}

/// Everything the executor needs to call the model for one invocation.
#[derive(Debug, Clone)]
pub struct FlowPlan {
    pub system_instruction: Option<String>,
    pub prompt: String,
    /// Prior turns, oldest first; the rendered prompt follows them.
    pub history: Vec<Turn>,
    /// Names of registry tools the model may call.
    pub tools: Vec<String>,
    pub output: OutputMode,
    /// Model override, e.g. a speech model.
    pub model: Option<String>,
}

impl FlowPlan {
    pub fn new(prompt: impl Into<String>, output: OutputMode) -> Self {
        Self {
            system_instruction: None,
            prompt: prompt.into(),
            history: Vec::new(),
            tools: Vec::new(),
            output,
            model: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_tool(mut self, name: impl Into<String>) -> Self {
        self.tools.push(name.into());
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// The model's final answer before the flow shapes it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Json(Value),
    Audio { mime_type: String, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    pub name: String,
    pub args: Value,
    pub outcome: ToolOutcome,
}

/// Tool calls dispatched during one invocation, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTrace {
    calls: Vec<ToolCallRecord>,
}

impl ToolTrace {
    pub fn record(&mut self, name: impl Into<String>, args: Value, outcome: ToolOutcome) {
        self.calls.push(ToolCallRecord { name: name.into(), args, outcome });
    }

    pub fn calls(&self) -> &[ToolCallRecord] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Outcome of the most recent call to `name`, if it was called at all.
    pub fn last_outcome(&self, name: &str) -> Option<&ToolOutcome> {
        self.calls.iter().rev().find(|c| c.name == name).map(|c| &c.outcome)
    }
}

/// A named, schema-typed operation backed by one model conversation.
pub trait Flow: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn input_schema(&self) -> &Schema;
    fn output_schema(&self) -> &Schema;

    /// Build the model request from validated, normalized input.
    fn plan(&self, input: &Value) -> Result<FlowPlan>;

    /// Shape the model's answer into the output value. The result is still
    /// checked against the output schema afterwards.
    fn finalize(&self, _input: &Value, raw: RawOutput, _trace: &ToolTrace) -> Result<Value> {
        match raw {
            RawOutput::Json(value) => Ok(value),
            RawOutput::Audio { .. } => Err(CampusError::malformed("unexpected audio response")),
        }
    }
}
