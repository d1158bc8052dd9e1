use crate::executor::FlowExecutor;
use crate::registry::{FlowDescriptor, FlowRegistry};
use campus_core::{CampusError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Invokes registered flows by name.
#[derive(Clone)]
pub struct FlowRuntime {
    executor: FlowExecutor,
    flows: Arc<FlowRegistry>,
}

impl FlowRuntime {
    pub fn new(executor: FlowExecutor, flows: Arc<FlowRegistry>) -> Self {
        Self { executor, flows }
    }

    pub fn flows(&self) -> &FlowRegistry {
        &self.flows
    }

    pub fn describe(&self) -> Vec<FlowDescriptor> {
        self.flows.describe()
    }

    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value> {
        let flow = self.flows.get(name).ok_or_else(|| CampusError::UnknownFlow(name.to_string()))?;
        self.executor.run(flow.as_ref(), input).await
    }
}
