use async_trait::async_trait;
use campus_core::{CampusError, Result, Schema, Tool, ToolOutcome};
use campus_data::Catalog;
use serde_json::Value;
use std::sync::Arc;

pub const GET_LOCATION_INFO: &str = "getLocationInfo";

/// Looks up a campus location by name (case-insensitive).
pub struct LocationInfoTool {
    catalog: Arc<Catalog>,
    input_schema: Schema,
    output_schema: Schema,
}

impl LocationInfoTool {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let input_schema = Schema::object()
            .required(
                "locationName",
                Schema::string().describe(
                    "The name of the location to get information for. e.g. \"Main Library\", \"Student Union\"",
                ),
            )
            .into();
        Self { catalog, input_schema, output_schema: location_schema() }
    }
}

/// Shape of a location record as returned by the tool.
pub fn location_schema() -> Schema {
    Schema::object()
        .required("name", Schema::string())
        .required("type", Schema::string())
        .required("hours", Schema::string())
        .required("description", Schema::string())
        .into()
}

#[async_trait]
impl Tool for LocationInfoTool {
    fn name(&self) -> &str {
        GET_LOCATION_INFO
    }

    fn description(&self) -> &str {
        "Get information about a specific location on campus, like its hours or purpose."
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    async fn execute(&self, args: Value) -> Result<ToolOutcome> {
        let requested = args["locationName"].as_str().unwrap_or_default();
        match self.catalog.find_location(requested) {
            Some(location) => {
                let record = serde_json::to_value(location).map_err(|e| CampusError::Tool {
                    name: GET_LOCATION_INFO.to_string(),
                    message: e.to_string(),
                })?;
                Ok(ToolOutcome::Found(record))
            }
            None => Ok(ToolOutcome::NotFound(format!(
                "Information for \"{requested}\" could not be found. Available locations are: {}",
                self.catalog.location_names().join(", ")
            ))),
        }
    }
}
