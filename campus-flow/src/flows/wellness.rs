use super::{chat_output_schema, history_from, history_schema};
use crate::flow::{Flow, FlowPlan, OutputMode};
use campus_core::{Result, Schema, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const NAME: &str = "wellnessCoach";

/// Contact line the coach must give on any sign of crisis.
pub const CRISIS_RESOURCES: &str =
    "Campus Counseling Services at (555) 123-4567 or the National Crisis and Suicide Lifeline at 988.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessInput {
    pub query: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

pub struct WellnessCoachFlow {
    system_prompt: String,
    input_schema: Schema,
    output_schema: Schema,
}

impl Default for WellnessCoachFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl WellnessCoachFlow {
    pub fn new() -> Self {
        let system_prompt = format!(
            "You are an AI Wellness Coach for college students. Your persona is calm, empathetic, and supportive.
Your primary goal is to provide helpful, actionable advice and mindfulness exercises.
You are not a therapist. If a user expresses severe distress, thoughts of self-harm, or a mental health crisis, you MUST gently guide them to real-world resources and provide the following contact information: \"{CRISIS_RESOURCES}\" Do not attempt to handle the crisis yourself.
For general stress, anxiety, or questions, provide practical tips, encouragement, or guided exercises (like breathing or grounding techniques).
Keep your responses concise and easy to understand."
        );
        Self {
            system_prompt,
            input_schema: Schema::object()
                .required(
                    "query",
                    Schema::string()
                        .non_empty()
                        .describe("The user's question or statement about their well-being."),
                )
                .with_default("history", history_schema(), json!([]))
                .into(),
            output_schema: chat_output_schema("The AI coach's response."),
        }
    }
}

impl Flow for WellnessCoachFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Supportive wellness chat with a mandatory crisis referral."
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
            .with_system_instruction(self.system_prompt.clone())
            .with_history(history_from(input)?))
    }
}
