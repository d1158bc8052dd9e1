use crate::flow::{Flow, FlowPlan, OutputMode, RawOutput, ToolTrace};
use crate::prompt::PromptTemplate;
use campus_core::{CampusError, Result, Schema};
use campus_data::StudentProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "findStudyBuddy";

pub const MAX_MATCHES: usize = 3;

const PROMPT: &str = "You are an AI that helps college students find compatible study buddies.
Your goal is to find the best matches for a student based on their major, courses, and study style.

The current user is:
Name: {{{currentUser.name}}}
Major: {{{currentUser.major}}}
Courses: {{#each currentUser.courses}}{{{this}}}{{#unless @last}}, {{/unless}}{{/each}}
Study Style: {{{currentUser.studyStyle}}}

Here is a list of potential study buddies:
{{#each potentialBuddies}}
- Name: {{{name}}}
  Major: {{{major}}}
  Courses: {{#each courses}}{{{this}}}{{#unless @last}}, {{/unless}}{{/each}}
  Study Style: {{{studyStyle}}}
{{/each}}

Analyze the list and find up to 3 of the most compatible study buddies for the current user.
A good match is someone who:
1. Is taking at least one of the same courses. This is the most important factor.
2. Has a similar major.
3. Has a compatible study style (e.g., 'Quiet' and 'Focused' are compatible, 'Group' and 'Collaborative' are compatible).

For each match, provide a compatibility score from 0-100, a brief reason for the match, and a list of the courses you have in common.
Do not match the user with themselves.
If no good matches are found, return an empty array for \"matches\".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyBuddyInput {
    pub current_user: StudentProfile,
    pub potential_buddies: Vec<StudentProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyMatch {
    pub name: String,
    pub similarity_score: f64,
    pub reason: String,
    pub matched_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyBuddyOutput {
    pub matches: Vec<BuddyMatch>,
}

fn profile_schema() -> Schema {
    Schema::object()
        .required("name", Schema::string())
        .required("major", Schema::string())
        .required("courses", Schema::array(Schema::string()))
        .required("studyStyle", Schema::string())
        .into()
}

/// Ranks other students as study partners for the current user.
pub struct StudyBuddyFlow {
    prompt: PromptTemplate,
    input_schema: Schema,
    output_schema: Schema,
}

impl StudyBuddyFlow {
    pub fn new() -> Result<Self> {
        let buddy = Schema::object()
            .required("name", Schema::string().describe("The name of the matched study buddy."))
            .required(
                "similarityScore",
                Schema::number()
                    .range(0.0, 100.0)
                    .describe("A score from 0 to 100 indicating compatibility."),
            )
            .required(
                "reason",
                Schema::string().describe("A brief explanation for why this is a good match."),
            )
            .required("matchedCourses", Schema::array(Schema::string()));

        Ok(Self {
            prompt: PromptTemplate::new("findStudyBuddyPrompt", PROMPT)?,
            input_schema: Schema::object()
                .required("currentUser", profile_schema())
                .required("potentialBuddies", Schema::array(profile_schema()))
                .into(),
            output_schema: Schema::object()
                .required("matches", Schema::array(buddy).max_items(MAX_MATCHES))
                .into(),
        })
    }
}

impl Flow for StudyBuddyFlow {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Finds up to three compatible study buddies."
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn plan(&self, input: &Value) -> Result<FlowPlan> {
        let mut input: StudyBuddyInput = super::typed(input)?;
        let me = input.current_user.name.clone();
        input.potential_buddies.retain(|buddy| buddy.name != me);
        Ok(FlowPlan::new(self.prompt.render(&input)?, OutputMode::Structured))
    }

    fn finalize(&self, input: &Value, raw: RawOutput, _trace: &ToolTrace) -> Result<Value> {
        let RawOutput::Json(mut output) = raw else {
            return Err(CampusError::malformed("unexpected audio response"));
        };
        let me = input["currentUser"]["name"].as_str().unwrap_or_default();
        if let Some(matches) = output.get_mut("matches").and_then(Value::as_array_mut) {
            matches.retain(|m| m["name"].as_str() != Some(me));
            matches.truncate(MAX_MATCHES);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> Value {
        json!({
            "currentUser": {"name": "Alex Doe", "major": "Computer Science", "courses": ["CS101", "MATH300"], "studyStyle": "Quiet"},
            "potentialBuddies": [
                {"name": "Alex Doe", "major": "Computer Science", "courses": ["CS101"], "studyStyle": "Quiet"},
                {"name": "Priya Patel", "major": "Physics", "courses": ["PHYS201", "MATH300"], "studyStyle": "Focused"}
            ]
        })
    }

    #[test]
    fn test_prompt_excludes_current_user_from_candidates() {
        let flow = StudyBuddyFlow::new().unwrap();
        let plan = flow.plan(&input()).unwrap();

        assert!(plan.prompt.contains("Courses: CS101, MATH300"));
        assert!(plan.prompt.contains("- Name: Priya Patel"));
        assert!(!plan.prompt.contains("- Name: Alex Doe"));
        assert_eq!(plan.output, OutputMode::Structured);
    }

    #[test]
    fn test_finalize_drops_self_match_and_caps_length() {
        let flow = StudyBuddyFlow::new().unwrap();
        let m = |name: &str| json!({"name": name, "similarityScore": 50, "reason": "r", "matchedCourses": []});
        let raw = RawOutput::Json(json!({
            "matches": [m("Alex Doe"), m("A"), m("B"), m("C"), m("D")]
        }));

        let out = flow.finalize(&input(), raw, &ToolTrace::default()).unwrap();
        let names: Vec<_> = out["matches"].as_array().unwrap().iter().map(|m| m["name"].clone()).collect();
        assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);
    }
}
