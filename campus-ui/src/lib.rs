//! # campus-ui
//!
//! Headless controllers behind each assistant screen. A controller owns the
//! screen's local state (chat turns, review lists, last results), checks
//! input before calling a flow, and turns failures into a user-facing
//! [`Notice`].
//!
//! Controllers reach flows through [`FlowInvoker`], implemented for the
//! in-process [`FlowRuntime`](campus_flow::FlowRuntime).

pub mod controllers;
mod invoker;
mod notice;

pub use controllers::*;
pub use invoker::{FlowInvoker, call};
pub use notice::{Notice, NoticeVariant, UiError, UiResult};
