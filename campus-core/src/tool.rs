use crate::{Result, model::FunctionDeclaration, schema::Schema};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Result of a tool handler.
///
/// `NotFound` is a negative answer, not a failure: it is fed back to the
/// model so it can tell the user what is available.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Found(Value),
    NotFound(String),
}

impl ToolOutcome {
    /// The payload sent back to the model as the function response.
    pub fn to_response(&self) -> Value {
        match self {
            ToolOutcome::Found(result) => json!({ "status": "found", "result": result }),
            ToolOutcome::NotFound(message) => json!({ "status": "not_found", "message": message }),
        }
    }

    pub fn found(&self) -> Option<&Value> {
        match self {
            ToolOutcome::Found(v) => Some(v),
            ToolOutcome::NotFound(_) => None,
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> &Schema;
    fn output_schema(&self) -> &Schema;

    /// Run the handler on already-validated arguments.
    async fn execute(&self, args: Value) -> Result<ToolOutcome>;

    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.input_schema().to_model_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool {
        input: Schema,
        output: Schema,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input"
        }

        fn input_schema(&self) -> &Schema {
            &self.input
        }

        fn output_schema(&self) -> &Schema {
            &self.output
        }

        async fn execute(&self, args: Value) -> Result<ToolOutcome> {
            Ok(ToolOutcome::Found(args))
        }
    }

    #[tokio::test]
    async fn test_declaration_uses_input_schema() {
        let input: Schema = Schema::object().required("text", Schema::string()).into();
        let tool = EchoTool { input: input.clone(), output: input };

        let decl = tool.declaration();
        assert_eq!(decl.name, "echo");
        assert_eq!(decl.parameters["properties"]["text"]["type"], "STRING");

        let outcome = tool.execute(json!({"text": "hi"})).await.unwrap();
        assert_eq!(outcome.found(), Some(&json!({"text": "hi"})));
    }

    #[test]
    fn test_outcome_response_shape() {
        let found = ToolOutcome::Found(json!({"name": "Main Library"}));
        assert_eq!(found.to_response()["status"], "found");
        assert_eq!(found.to_response()["result"]["name"], "Main Library");

        let missing = ToolOutcome::NotFound("nothing here".into());
        assert_eq!(missing.to_response(), json!({"status": "not_found", "message": "nothing here"}));
        assert!(missing.found().is_none());
    }
}
