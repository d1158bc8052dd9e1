use crate::flow::{Flow, FlowPlan, OutputMode};
use crate::prompt::PromptTemplate;
use campus_core::{Result, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "recommendGroups";

const PROMPT: &str = "You are a campus life expert who provides personalized recommendations for campus groups and activities based on student interests.

Student Interests: {{{interests}}}
Available Campus Groups: {{{campusGroups}}}
Available Campus Activities: {{{campusActivities}}}

Based on the student's interests, recommend relevant campus groups and activities. Provide the recommendations as comma-separated lists.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    pub interests: String,
    pub campus_groups: String,
    pub campus_activities: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutput {
    pub recommended_groups: String,
    pub recommended_activities: String,
}

/// Suggests campus groups and activities from a student's interests.
pub struct RecommendGroupsFlow {
    prompt: PromptTemplate,
    input_schema: Schema,
    output_schema: Schema,
}

impl RecommendGroupsFlow {
    pub fn new() -> Result<Self> {
        Ok(Self {
            prompt: PromptTemplate::new("groupRecommendationPrompt", PROMPT)?,
            input_schema: Schema::object()
                .required(
                    "interests",
                    Schema::string()
                        .non_empty()
                        .describe("A comma-separated list of the user's interests."),
                )
                .required(
                    "campusGroups",
                    Schema::string().describe("A comma-separated list of available campus groups."),
                )
                .required(
                    "campusActivities",
                    Schema::string()
                        .describe("A comma-separated list of available campus activities."),
                )
                .into(),
            output_schema: Schema::object()
                .required(
                    "recommendedGroups",
                    Schema::string().describe("A comma-separated list of recommended campus groups."),
                )
                .required(
                    "recommendedActivities",
                    Schema::string()
                        .describe("A comma-separated list of recommended campus activities."),
                )
                .into(),
        })
    }
}

impl Flow for RecommendGroupsFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn plan(&self, input: &Value) -> Result<FlowPlan> {
        Ok(FlowPlan::new(self.prompt.render(input)?, OutputMode::Structured))
    }
}
