use campus_core::{CampusError, FunctionDeclaration, Result, Tool, ToolOutcome};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Named, schema-typed functions the model may call.
///
/// Populated once at startup and then shared read-only. Lookup is by exact name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `tool` under its name. A later registration with the same name
    /// replaces the earlier one; the replaced tool is returned.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let previous = self.tools.insert(name.clone(), tool);
        if previous.is_some() {
            debug!(tool = %name, "replaced existing tool registration");
        }
        previous
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function declarations for the named tools, in the order given.
    pub fn declarations<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<FunctionDeclaration>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.tools
                    .get(name)
                    .map(|t| t.declaration())
                    .ok_or_else(|| CampusError::Config(format!("tool '{name}' is not registered")))
            })
            .collect()
    }

    /// Validate `args`, run the handler, and validate a found result.
    ///
    /// Argument violations come back as `InvalidInput`; a handler error or a
    /// result that breaks the tool's own output schema is a `Tool` failure.
    /// A not-found outcome is returned as-is.
    pub async fn invoke(&self, name: &str, args: &Value) -> Result<ToolOutcome> {
        let tool = self.get(name).ok_or_else(|| CampusError::Tool {
            name: name.to_string(),
            message: "no such tool".to_string(),
        })?;

        let args = tool.input_schema().validate(args).map_err(CampusError::InvalidInput)?;
        debug!(tool = %name, %args, "invoking tool");

        let outcome = tool.execute(args).await.map_err(|e| match e {
            CampusError::Tool { .. } => e,
            other => CampusError::Tool { name: name.to_string(), message: other.to_string() },
        })?;

        match outcome {
            ToolOutcome::Found(result) => {
                let result = tool.output_schema().validate(&result).map_err(|violations| {
                    warn!(tool = %name, ?violations, "tool result violates its output schema");
                    CampusError::Tool {
                        name: name.to_string(),
                        message: format!("result violates output schema ({} violations)", violations.len()),
                    }
                })?;
                Ok(ToolOutcome::Found(result))
            }
            ToolOutcome::NotFound(message) => {
                debug!(tool = %name, %message, "tool found nothing");
                Ok(ToolOutcome::NotFound(message))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FunctionTool;
    use campus_core::{ErrorKind, Schema};
    use serde_json::json;

    fn echo(name: &str, tag: &'static str) -> Arc<dyn Tool> {
        Arc::new(FunctionTool::new(
            name,
            "Echo",
            Schema::object().required("text", Schema::string()),
            Schema::object().required("text", Schema::string()).required("tag", Schema::string()),
            move |args| async move {
                Ok(ToolOutcome::Found(json!({"text": args["text"], "tag": tag})))
            },
        ))
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(echo("echo", "first")).is_none());
        assert!(registry.register(echo("echo", "second")).is_some());
        assert_eq!(registry.len(), 1);

        let outcome = registry.invoke("echo", &json!({"text": "hi"})).await.unwrap();
        assert_eq!(outcome.found().unwrap()["tag"], "second");
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let registry = ToolRegistry::new().with_tool(echo("echo", "t"));
        assert!(registry.contains("echo"));
        assert!(!registry.contains("Echo"));
        let err = registry.invoke("Echo", &json!({"text": "hi"})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ToolFailure);
    }

    #[tokio::test]
    async fn test_invalid_args_are_rejected_before_handler() {
        let registry = ToolRegistry::new().with_tool(echo("echo", "t"));
        let err = registry.invoke("echo", &json!({"text": 7})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.violations()[0].path, "text");
    }

    #[tokio::test]
    async fn test_result_violating_output_schema_is_tool_failure() {
        let bad: Arc<dyn Tool> = Arc::new(FunctionTool::new(
            "bad",
            "Returns the wrong shape",
            Schema::object(),
            Schema::object().required("name", Schema::string()),
            |_| async { Ok(ToolOutcome::Found(json!({"name": 42}))) },
        ));
        let registry = ToolRegistry::new().with_tool(bad);
        let err = registry.invoke("bad", &json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ToolFailure);
    }

    #[tokio::test]
    async fn test_handler_error_is_tool_failure() {
        let failing: Arc<dyn Tool> = Arc::new(FunctionTool::new(
            "failing",
            "Always fails",
            Schema::object(),
            Schema::object(),
            |_| async { Err(CampusError::Config("backend offline".into())) },
        ));
        let registry = ToolRegistry::new().with_tool(failing);
        let err = registry.invoke("failing", &json!({})).await.unwrap_err();
        assert!(matches!(err, CampusError::Tool { ref name, .. } if name == "failing"));
    }

    #[test]
    fn test_declarations_for_unknown_tool() {
        let registry = ToolRegistry::new().with_tool(echo("echo", "t"));
        let decls = registry.declarations(&["echo"]).unwrap();
        assert_eq!(decls[0].name, "echo");
        assert!(registry.declarations(&["missing"]).is_err());
    }
}
