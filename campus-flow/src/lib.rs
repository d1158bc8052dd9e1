//! # campus-flow
//!
//! Schema-typed flows over a generative model.
//!
//! A [`Flow`] declares its input and output [`Schema`](campus_core::Schema)s
//! and turns validated input into a [`FlowPlan`]. The [`FlowExecutor`] runs
//! the plan against an [`Llm`](campus_core::Llm), dispatching any tool calls
//! through the [`ToolRegistry`](campus_tool::ToolRegistry), and validates the
//! answer before returning it.
//!
//! ```rust,ignore
//! let runtime = FlowRuntime::new(
//!     FlowExecutor::new(model, Arc::new(builtin_registry(catalog))),
//!     Arc::new(FlowRegistry::builtin(None)?),
//! );
//! let out = runtime.invoke("campusGuide", json!({"query": "When is the library open?"})).await?;
//! ```

pub mod executor;
pub mod flow;
pub mod flows;
pub mod prompt;
pub mod registry;
pub mod runtime;
pub mod wav;

pub use executor::{DEFAULT_MAX_TOOL_ROUNDS, FlowExecutor, FlowState};
pub use flow::{Flow, FlowPlan, OutputMode, RawOutput, ToolCallRecord, ToolTrace};
pub use flows::ChatOutput;
pub use prompt::PromptTemplate;
pub use registry::{FlowDescriptor, FlowRegistry};
pub use runtime::FlowRuntime;
