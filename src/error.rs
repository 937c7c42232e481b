use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::gemini::GeminiError;
use crate::models::ToolId;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The call to the generative service failed.
    #[error("transport error: {0}")]
    Transport(#[from] GeminiError),

    /// The service answered, but not with the declared shape.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error("session {0} already has a request in flight")]
    Busy(Uuid),

    #[error("session runs {expected:?}, input is for {got:?}")]
    ToolMismatch { expected: ToolId, got: ToolId },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidInput(_) => "invalid_input",
            ToolError::Transport(_) => "transport_error",
            ToolError::Parse(_) => "parse_error",
            ToolError::NotFound(_) => "not_found",
            ToolError::Busy(_) => "busy",
            ToolError::ToolMismatch { .. } => "tool_mismatch",
            ToolError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ToolError::InvalidInput(_) | ToolError::ToolMismatch { .. } => StatusCode::BAD_REQUEST,
            ToolError::Transport(_) | ToolError::Parse(_) => StatusCode::BAD_GATEWAY,
            ToolError::NotFound(_) => StatusCode::NOT_FOUND,
            ToolError::Busy(_) => StatusCode::CONFLICT,
            ToolError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ToolError {
    fn into_response(self) -> Response {
        let body = json!({ "error": { "kind": self.kind(), "message": self.to_string() } });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_status_codes() {
        assert_eq!(ToolError::Parse("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ToolError::from(GeminiError::Credential).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ToolError::Busy(Uuid::nil()).status(), StatusCode::CONFLICT);
        assert_eq!(ToolError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(ToolError::Internal("panicked".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = ToolError::ToolMismatch { expected: ToolId::AdsWaste, got: ToolId::ReelIdeas };
        assert_eq!(err.to_string(), "session runs AdsWaste, input is for ReelIdeas");
    }
}
