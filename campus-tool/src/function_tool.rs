use async_trait::async_trait;
use campus_core::{Result, Schema, Tool, ToolOutcome};
use futures::future::BoxFuture;
use serde_json::Value;
use std::future::Future;

type Handler = Box<dyn Fn(Value) -> BoxFuture<'static, Result<ToolOutcome>> + Send + Sync>;

/// A tool backed by an async closure.
pub struct FunctionTool {
    name: String,
    description: String,
    input_schema: Schema,
    output_schema: Schema,
    handler: Handler,
}

impl FunctionTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: impl Into<Schema>,
        output_schema: impl Into<Schema>,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema.into(),
            output_schema: output_schema.into(),
            handler: Box::new(move |args| Box::pin(handler(args))),
        }
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool").field("name", &self.name).finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    async fn execute(&self, args: Value) -> Result<ToolOutcome> {
        (self.handler)(args).await
    }
}
