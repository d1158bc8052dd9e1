use super::{chat_output_schema, history_from, history_schema};
use crate::flow::{Flow, FlowPlan, OutputMode};
use crate::prompt::PromptTemplate;
use campus_core::{Result, Schema, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const NAME: &str = "aiTutor";

const SYSTEM_PROMPT: &str = "You are an expert AI Tutor. Your persona is encouraging, patient, and knowledgeable.
You are tutoring a student in: {{{subject}}}.

Your goal is not to just give the answer, but to explain the underlying concepts and guide the student to understanding.
Break down complex topics into smaller, easy-to-digest pieces. Use examples and analogies where helpful.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorInput {
    pub subject: String,
    pub query: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

/// Multi-turn tutoring chat on one subject.
pub struct TutorFlow {
    system: PromptTemplate,
    input_schema: Schema,
    output_schema: Schema,
}

impl TutorFlow {
    pub fn new() -> Result<Self> {
        Ok(Self {
            system: PromptTemplate::new("tutorSystem", SYSTEM_PROMPT)?,
            input_schema: Schema::object()
                .required(
                    "subject",
                    Schema::string().non_empty().describe("The academic subject of the question."),
                )
                .required("query", Schema::string().non_empty().describe("The user's question."))
                .with_default("history", history_schema(), json!([]))
                .into(),
            output_schema: chat_output_schema("The AI tutor's answer to the user query."),
        })
    }
}

impl Flow for TutorFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Answers a student's question about a subject, keeping the conversation going."
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn plan(&self, input: &Value) -> Result<FlowPlan> {
        let query = input["query"].as_str().unwrap_or_default();
        Ok(FlowPlan::new(query, OutputMode::Text { field: "response" })
            .with_system_instruction(self.system.render(input)?)
            .with_history(history_from(input)?))
    }
}
