use crate::invoker::{FlowInvoker, call};
use crate::notice::{Notice, UiError, UiResult};
use campus_data::Catalog;
use campus_flow::flows::recommendations::{NAME, RecommendationInput, RecommendationOutput};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MIN_INTEREST_CHARS: usize = 10;

const FAILURE: &str = "Sorry, we couldn't get recommendations at this time. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub groups: Vec<String>,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RecommendationsController {
    groups: Vec<String>,
    activities: Vec<String>,
    result: Option<Recommendations>,
    loading: bool,
}

impl RecommendationsController {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            groups: catalog.campus_groups().to_vec(),
            activities: catalog.campus_activities().to_vec(),
            result: None,
            loading: false,
        }
    }

    pub fn result(&self) -> Option<&Recommendations> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn recommend(&mut self, invoker: &dyn FlowInvoker, interests: &str) -> UiResult<&Recommendations> {
        if interests.chars().count() < MIN_INTEREST_CHARS {
            return Err(UiError::rejected(
                "Invalid interests",
                "Please tell us a bit more about your interests.",
            ));
        }
        self.result = None;
        let input = RecommendationInput {
            interests: interests.to_string(),
            campus_groups: self.groups.join(", "),
            campus_activities: self.activities.join(", "),
        };

        self.loading = true;
        let result: campus_core::Result<RecommendationOutput> = call(invoker, NAME, &input).await;
        self.loading = false;

        match result {
            Ok(output) => Ok(&*self.result.insert(Recommendations {
                groups: split_list(&output.recommended_groups),
                activities: split_list(&output.recommended_activities),
            })),
            Err(source) => {
                warn!(error = %source, "recommendations failed");
                Err(UiError::Failed { notice: Notice::failure(FAILURE), source })
            }
        }
    }
}

/// Split a comma-separated answer into trimmed, non-empty items.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}
