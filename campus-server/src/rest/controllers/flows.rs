use crate::AppState;
use crate::error::ApiError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use campus_flow::FlowDescriptor;
use serde_json::Value;
use tracing::Instrument;

/// GET /api/flows
pub async fn list_flows(State(state): State<AppState>) -> Json<Vec<FlowDescriptor>> {
    Json(state.runtime.describe())
}

/// POST /api/flows/{name}
pub async fn invoke_flow(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let span = tracing::info_span!("invoke_flow", flow = %name);
    let output = state.runtime.invoke(&name, input).instrument(span).await?;
    Ok(Json(output))
}
