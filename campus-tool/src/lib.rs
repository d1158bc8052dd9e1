//! # campus-tool
//!
//! The [`ToolRegistry`] the flow executor dispatches model function calls
//! through, plus the built-in campus tools.

mod function_tool;
pub mod location;
mod registry;

pub use function_tool::FunctionTool;
pub use location::{GET_LOCATION_INFO, LocationInfoTool, location_schema};
pub use registry::ToolRegistry;

use campus_data::Catalog;
use std::sync::Arc;

/// A registry holding every built-in tool.
pub fn builtin_registry(catalog: Arc<Catalog>) -> ToolRegistry {
    ToolRegistry::new().with_tool(Arc::new(LocationInfoTool::new(catalog)))
}
