use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_core::{CampusError, ErrorKind, Violation};
use serde::Serialize;

/// Error body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Flow(#[from] CampusError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Flow(e) => match e.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::UnknownFlow => StatusCode::NOT_FOUND,
                ErrorKind::ModelServiceError
                | ErrorKind::MalformedModelOutput
                | ErrorKind::ToolRoundsExceeded => StatusCode::BAD_GATEWAY,
                ErrorKind::ToolFailure | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn payload(&self) -> ErrorPayload {
        match self {
            Self::BadRequest(message) => ErrorPayload {
                error: ErrorKind::InvalidInput,
                message: message.clone(),
                violations: Vec::new(),
            },
            Self::Flow(e) => {
                let kind = e.kind();
                // Only input problems are described to the caller; upstream detail stays in the logs.
                let (message, violations) = match kind {
                    ErrorKind::InvalidInput => (e.to_string(), e.violations().to_vec()),
                    ErrorKind::UnknownFlow => (e.to_string(), Vec::new()),
                    ErrorKind::ModelServiceError
                    | ErrorKind::MalformedModelOutput
                    | ErrorKind::ToolRoundsExceeded => {
                        ("The assistant could not complete the request. Please try again later.".to_string(), Vec::new())
                    }
                    ErrorKind::ToolFailure | ErrorKind::Internal => {
                        ("Internal server error.".to_string(), Vec::new())
                    }
                };
                ErrorPayload { error: kind, message, violations }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(self.payload())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CampusError::InvalidInput(Vec::new()), StatusCode::BAD_REQUEST),
            (CampusError::UnknownFlow("x".into()), StatusCode::NOT_FOUND),
            (CampusError::Model("timeout".into()), StatusCode::BAD_GATEWAY),
            (CampusError::malformed("bad json"), StatusCode::BAD_GATEWAY),
            (CampusError::ToolRoundsExceeded(5), StatusCode::BAD_GATEWAY),
            (CampusError::Tool { name: "t".into(), message: "m".into() }, StatusCode::INTERNAL_SERVER_ERROR),
            (CampusError::Template("t".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_upstream_detail_is_hidden() {
        let payload = ApiError::from(CampusError::Model("api key leaked in url".into())).payload();
        assert_eq!(payload.error, ErrorKind::ModelServiceError);
        assert!(!payload.message.contains("api key"));
    }
}
