use super::indented_json::IndentedJson;
use crate::album::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything an album route can fail with, mapped to a status code and a
/// small JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("ID provided is invalid")]
    InvalidId(String),

    #[error("Item ID not found")]
    NotFound(String),

    #[error("{0}")]
    MalformedPayload(String),

    #[error("Data provided did not match album schema")]
    InvalidAlbum(#[from] ValidationError),

    #[error("{context}")]
    Storage {
        context: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn storage(context: &'static str, cause: anyhow::Error) -> Self {
        ApiError::Storage { context, cause }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) | ApiError::MalformedPayload(_) | ApiError::InvalidAlbum(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::InvalidId(id) | ApiError::NotFound(id) => {
                json!({ "error": self.to_string(), "id": id })
            }
            ApiError::MalformedPayload(msg) => json!({ "error": msg }),
            ApiError::InvalidAlbum(err) => {
                json!({ "error": self.to_string(), "msg": err.to_string() })
            }
            ApiError::Storage { context, cause } => {
                error!("{}: {:#}", context, cause);
                json!({ "error": context, "msg": format!("{:#}", cause) })
            }
        };
        (status, IndentedJson(body)).into_response()
    }
}
