use async_trait::async_trait;
use campus_core::{CampusError, Result};
use campus_flow::FlowRuntime;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Whatever can run a flow by name: the in-process runtime, or an HTTP client.
#[async_trait]
pub trait FlowInvoker: Send + Sync {
    async fn invoke(&self, flow: &str, input: Value) -> Result<Value>;
}

#[async_trait]
impl FlowInvoker for FlowRuntime {
    async fn invoke(&self, flow: &str, input: Value) -> Result<Value> {
        FlowRuntime::invoke(self, flow, input).await
    }
}

/// Call `flow` with typed input and decode its typed output.
pub async fn call<I, O>(invoker: &dyn FlowInvoker, flow: &str, input: &I) -> Result<O>
where
    I: Serialize + Sync,
    O: DeserializeOwned,
{
    let input = serde_json::to_value(input)
        .map_err(|e| CampusError::Config(format!("failed to encode {flow} input: {e}")))?;
    let output = invoker.invoke(flow, input).await?;
    serde_json::from_value(output)
        .map_err(|e| CampusError::malformed(format!("{flow} output did not decode: {e}")))
}
