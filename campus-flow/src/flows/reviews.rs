use crate::flow::{Flow, FlowPlan, OutputMode};
use crate::prompt::PromptTemplate;
use campus_core::{Result, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "summarizeReviews";

const PROMPT: &str = "You are an academic advisor AI. Your task is to summarize student feedback for a college course to help other students make an informed decision.

Course Name: {{{courseName}}}

Please read the following reviews and provide a concise, balanced summary. Mention both positive and negative points if they exist. Do not use bullet points.

Reviews:
{{#each reviews}}
- \"{{{this}}}\"
{{/each}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummaryInput {
    pub course_name: String,
    pub reviews: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummaryOutput {
    pub summary: String,
}

pub struct ReviewSummaryFlow {
    prompt: PromptTemplate,
    input_schema: Schema,
    output_schema: Schema,
}

impl ReviewSummaryFlow {
    pub fn new() -> Result<Self> {
        Ok(Self {
            prompt: PromptTemplate::new("summarizeReviewsPrompt", PROMPT)?,
            input_schema: Schema::object()
                .required("courseName", Schema::string().non_empty())
                .required(
                    "reviews",
                    Schema::array(Schema::string())
                        .min_items(1)
                        .describe("A list of student reviews for the course."),
                )
                .into(),
            output_schema: Schema::object()
                .required(
                    "summary",
                    Schema::string()
                        .non_empty()
                        .describe("A brief, neutral summary of the key points from the reviews."),
                )
                .into(),
        })
    }
}

impl Flow for ReviewSummaryFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Summarizes student reviews of a course."
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_quotes_each_review() {
        let flow = ReviewSummaryFlow::new().unwrap();
        let plan = flow
            .plan(&json!({"courseName": "Intro to CS", "reviews": ["Great labs.", "Too much homework."]}))
            .unwrap();
        assert!(plan.prompt.contains("Course Name: Intro to CS"));
        assert!(plan.prompt.contains("- \"Great labs.\""));
        assert!(plan.prompt.contains("- \"Too much homework.\""));
    }

    #[test]
    fn test_empty_review_list_is_invalid() {
        let flow = ReviewSummaryFlow::new().unwrap();
        let err = flow.input_schema().validate(&json!({"courseName": "X", "reviews": []})).unwrap_err();
        assert_eq!(err[0].path, "reviews");
    }
}
