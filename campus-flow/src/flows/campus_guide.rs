use crate::flow::{Flow, FlowPlan, OutputMode, RawOutput, ToolTrace};
use crate::prompt::PromptTemplate;
use campus_core::{CampusError, Result, Schema, ToolOutcome};
use campus_data::CampusLocation;
use campus_tool::{GET_LOCATION_INFO, location_schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "campusGuide";

const PROMPT: &str = "You are a friendly and helpful campus tour guide AI.
A student is asking a question about the campus.
Use the available tools to answer their question.
If you don't know the answer, say that you don't have that information.

Question: {{{query}}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusGuideInput {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusGuideOutput {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<CampusLocation>,
}

/// Answers location questions, looking places up through `getLocationInfo`.
pub struct CampusGuideFlow {
    prompt: PromptTemplate,
    input_schema: Schema,
    output_schema: Schema,
}

impl CampusGuideFlow {
    pub fn new() -> Result<Self> {
        Ok(Self {
            prompt: PromptTemplate::new("campusGuidePrompt", PROMPT)?,
            input_schema: Schema::object()
                .required(
                    "query",
                    Schema::string()
                        .non_empty()
                        .describe("The user question about a campus location."),
                )
                .into(),
            output_schema: Schema::object()
                .required(
                    "response",
                    Schema::string().describe("The AI guide's answer to the user query."),
                )
                .optional("location", location_schema())
                .into(),
        })
    }
}

impl Flow for CampusGuideFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Answers questions about campus locations."
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn plan(&self, input: &Value) -> Result<FlowPlan> {
        Ok(FlowPlan::new(self.prompt.render(input)?, OutputMode::Text { field: "response" })
            .with_tool(GET_LOCATION_INFO))
    }

    fn finalize(&self, _input: &Value, raw: RawOutput, trace: &ToolTrace) -> Result<Value> {
        let RawOutput::Json(mut output) = raw else {
            return Err(CampusError::malformed("unexpected audio response"));
        };
        // The record the tool last returned; a not-found lookup clears it.
        if let Some(ToolOutcome::Found(record)) = trace.last_outcome(GET_LOCATION_INFO) {
            if let Some(object) = output.as_object_mut() {
                object.insert("location".to_string(), record.clone());
            }
        }
        Ok(output)
    }
}
