use crate::flow::Flow;
use crate::flows::{
    campus_guide::CampusGuideFlow, recommendations::RecommendGroupsFlow,
    reviews::ReviewSummaryFlow, study_buddy::StudyBuddyFlow, tts::TextToSpeechFlow,
    tutor::TutorFlow, wellness::WellnessCoachFlow,
};
use campus_core::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Public description of a flow, with schemas in the model-facing format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

/// Flows addressable by name. Built once at startup.
#[derive(Clone, Default)]
pub struct FlowRegistry {
    flows: HashMap<String, Arc<dyn Flow>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every campus flow. `tts_model` overrides the model used for speech.
    pub fn builtin(tts_model: Option<String>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(TutorFlow::new()?));
        registry.register(Arc::new(WellnessCoachFlow::new()));
        registry.register(Arc::new(CampusGuideFlow::new()?));
        registry.register(Arc::new(StudyBuddyFlow::new()?));
        registry.register(Arc::new(ReviewSummaryFlow::new()?));
        registry.register(Arc::new(TextToSpeechFlow::new(tts_model)));
        registry.register(Arc::new(RecommendGroupsFlow::new()?));
        Ok(registry)
    }

    pub fn register(&mut self, flow: Arc<dyn Flow>) -> Option<Arc<dyn Flow>> {
        self.flows.insert(flow.name().to_string(), flow)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Flow>> {
        self.flows.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.flows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Descriptors for every flow, sorted by name.
    pub fn describe(&self) -> Vec<FlowDescriptor> {
        self.names()
            .into_iter()
            .filter_map(|name| self.flows.get(name))
            .map(|flow| FlowDescriptor {
                name: flow.name().to_string(),
                description: flow.description().to_string(),
                input_schema: flow.input_schema().to_model_schema(),
                output_schema: flow.output_schema().to_model_schema(),
            })
            .collect()
    }
}

impl std::fmt::Debug for FlowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowRegistry").field("flows", &self.names()).finish()
    }
}
