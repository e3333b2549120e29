//! Error types for gastoweb-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gastoweb_core::{CoreError, ErrorCode, ErrorSeverity};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error.severity() {
            ErrorSeverity::Error => log::error!("{}", error.to_details()),
            ErrorSeverity::Warning => log::warn!("{}", error),
            ErrorSeverity::Info => log::debug!("{}", error),
        }

        match error.code() {
            ErrorCode::ExpenseNotFound => ApiError::NotFound { resource: error.to_string() },
            ErrorCode::ValidationError | ErrorCode::NoPendingAction => {
                ApiError::BadRequest { message: error.to_string() }
            }
            ErrorCode::StoreError | ErrorCode::SerializationError => {
                ApiError::Internal { message: error.to_string() }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::ExpenseNotFound { id: 5 }.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::Store { message: "disk full".to_string() }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = CoreError::NoPendingAction.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
