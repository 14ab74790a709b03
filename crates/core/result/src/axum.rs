use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{Error, ErrorType};

impl ErrorType {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorType::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ErrorType::NoValidData => StatusCode::BAD_REQUEST,
            ErrorType::DuplicateNumber => StatusCode::CONFLICT,

            ErrorType::ImportFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::InsertFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::QueryFailed => StatusCode::INTERNAL_SERVER_ERROR,

            ErrorType::DatabaseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::DuplicateKey => StatusCode::CONFLICT,
            ErrorType::SpreadsheetError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP response builder for Error enum
impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.error_type.status();
        (status, Json(json!({ "error": self.error_type.message() }))).into_response()
    }
}
