//! Serialized flow outputs always validate against their own output schema.

use campus_data::CampusLocation;
use campus_flow::FlowRegistry;
use campus_flow::flows::campus_guide::CampusGuideOutput;
use campus_flow::flows::recommendations::RecommendationOutput;
use campus_flow::flows::reviews::ReviewSummaryOutput;
use campus_flow::flows::study_buddy::{BuddyMatch, StudyBuddyOutput};
use campus_flow::flows::ChatOutput;
use proptest::prelude::*;
use serde::Serialize;

fn assert_valid<T: Serialize>(registry: &FlowRegistry, flow: &str, output: &T) {
    let value = serde_json::to_value(output).unwrap();
    let schema = registry.get(flow).unwrap();
    if let Err(violations) = schema.output_schema().validate(&value) {
        panic!("{flow} output {value} failed validation: {violations:?}");
    }
}

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.'!?]{1,60}"
}

fn buddy() -> impl Strategy<Value = BuddyMatch> {
    (text(), 0u8..=100, text(), prop::collection::vec("[A-Z]{2,4}[0-9]{3}", 0..4)).prop_map(
        |(name, score, reason, matched_courses)| BuddyMatch {
            name,
            similarity_score: f64::from(score),
            reason,
            matched_courses,
        },
    )
}

proptest! {
    #[test]
    fn chat_outputs_revalidate(response in text()) {
        let registry = FlowRegistry::builtin(None).unwrap();
        for flow in ["aiTutor", "wellnessCoach"] {
            assert_valid(&registry, flow, &ChatOutput { response: response.clone() });
        }
    }

    #[test]
    fn campus_guide_output_revalidates(response in text(), hours in proptest::option::of(text())) {
        let registry = FlowRegistry::builtin(None).unwrap();
        let location = hours.map(|hours| {
            serde_json::from_value::<CampusLocation>(serde_json::json!({
                "name": "Main Library",
                "type": "Academic",
                "hours": hours,
                "description": "Books and quiet study rooms."
            }))
            .unwrap()
        });
        assert_valid(&registry, "campusGuide", &CampusGuideOutput { response, location });
    }

    #[test]
    fn study_buddy_output_revalidates(matches in prop::collection::vec(buddy(), 0..=3)) {
        let registry = FlowRegistry::builtin(None).unwrap();
        assert_valid(&registry, "findStudyBuddy", &StudyBuddyOutput { matches });
    }

    #[test]
    fn structured_outputs_revalidate(a in text(), b in text()) {
        let registry = FlowRegistry::builtin(None).unwrap();
        assert_valid(&registry, "summarizeReviews", &ReviewSummaryOutput { summary: a.clone() });
        assert_valid(
            &registry,
            "recommendGroups",
            &RecommendationOutput { recommended_groups: a, recommended_activities: b },
        );
    }
}
