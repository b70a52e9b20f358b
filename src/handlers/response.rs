//! JSON response envelope
//!
//! Success: `{"success": true, "data": ...}`.
//! Error: `{"success": false, "error": {"code": ..., "message": ...}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::utils::errors::{ErrorSeverity, FiveMGolfError};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, FiveMGolfError>;

pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse { success: true, data }))
}

/// `201 Created` with the envelope
pub fn created<T: Serialize>(data: T) -> Result<(StatusCode, Json<ApiResponse<T>>), FiveMGolfError> {
    Ok((StatusCode::CREATED, Json(ApiResponse { success: true, data })))
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

/// Attached to error responses so the locale middleware can translate them
#[derive(Debug, Clone, Copy)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message_key: &'static str,
}

impl IntoResponse for FiveMGolfError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.severity() {
            ErrorSeverity::Info => info!(status = status.as_u16(), error = %self, "Request error"),
            ErrorSeverity::Warning => warn!(status = status.as_u16(), error = %self, "Request error"),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(status = status.as_u16(), severity = %self.severity(), error = %self, "Request error")
            }
        }

        let info = ErrorInfo {
            code: self.error_code(),
            message_key: self.message_key(),
        };
        let envelope = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: info.code,
                message: info.message_key.to_string(),
            },
        };

        let mut response = (status, Json(envelope)).into_response();
        response.extensions_mut().insert(info);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_carries_info() {
        let response = FiveMGolfError::not_found("Quotation", "q1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let info = response.extensions().get::<ErrorInfo>().unwrap();
        assert_eq!(info.code, "not_found");
        assert_eq!(info.message_key, "errors.not_found");
    }
}
