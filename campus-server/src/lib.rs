//! # campus-server
//!
//! REST surface of the campus assistant: one POST route per flow, plus the
//! read-only catalog the screens render.

pub mod config;
pub mod error;
pub mod rest;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorPayload};
pub use rest::build_router;

use campus_core::Llm;
use campus_data::Catalog;
use campus_flow::{FlowExecutor, FlowRegistry, FlowRuntime};
use campus_tool::builtin_registry;
use std::sync::Arc;

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub runtime: FlowRuntime,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Wire the catalog, tools, and flows around `model`.
    pub fn new(
        model: Arc<dyn Llm>,
        catalog: Arc<Catalog>,
        tts_model: Option<String>,
        max_tool_rounds: usize,
    ) -> campus_core::Result<Self> {
        let tools = Arc::new(builtin_registry(catalog.clone()));
        let executor = FlowExecutor::new(model, tools).with_max_tool_rounds(max_tool_rounds);
        let flows = Arc::new(FlowRegistry::builtin(tts_model)?);
        Ok(Self { runtime: FlowRuntime::new(executor, flows), catalog })
    }
}
