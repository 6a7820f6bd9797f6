use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors, mapped onto the stable
/// `{success: false, message, errorKind}` body.
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    #[allow(dead_code)]
    Payload(String),
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Payload(msg) => write!(f, "Bad payload: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::Internal(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::BadRequest(_) | Self::Payload(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            Self::Storage(StorageError::NotFound) | Self::NotFound(_) => "not_found",
            Self::Storage(StorageError::ConstraintViolation(_)) | Self::Conflict(_) => "conflict",
            Self::Storage(_) | Self::Internal(_) => "internal",
            Self::Validation(_) | Self::BadRequest(_) => "validation",
            Self::Payload(_) => "payload",
            Self::Unauthorized | Self::Forbidden(_) => "authorization",
        }
    }

    /// Human-readable reason. Internal errors are logged and replaced with a
    /// generic message so storage detail never leaks to the caller.
    fn message(&self) -> String {
        match self {
            Self::Storage(StorageError::NotFound) => "Resource not found".to_string(),
            Self::Storage(StorageError::ConstraintViolation(msg)) => msg.clone(),
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                "An internal error occurred".to_string()
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                format!("Validation failed: {}", field_errors.join("; "))
            }
            Self::BadRequest(msg) | Self::Payload(msg) => msg.clone(),
            Self::Unauthorized => "Authentication required".to_string(),
            Self::Forbidden(msg) => msg.clone(),
            Self::NotFound(msg) => msg.clone(),
            Self::Conflict(msg) => msg.clone(),
            Self::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let body = json!({
            "success": false,
            "message": self.message(),
            "errorKind": self.error_kind(),
        });

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

/// Replace a storage `NotFound` with a caller-facing message, leaving other
/// storage errors to the default mapping.
pub fn not_found_as(message: &str) -> impl FnOnce(StorageError) -> WebError + '_ {
    move |e| match e {
        StorageError::NotFound => WebError::NotFound(message.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_expected_statuses() {
        assert_eq!(
            WebError::Storage(StorageError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::Storage(StorageError::ConstraintViolation("dup".into())).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn kinds_follow_the_error_taxonomy() {
        assert_eq!(WebError::BadRequest("x".into()).error_kind(), "validation");
        assert_eq!(WebError::Payload("x".into()).error_kind(), "payload");
        assert_eq!(WebError::Forbidden("x".into()).error_kind(), "authorization");
        assert_eq!(WebError::Conflict("x".into()).error_kind(), "conflict");
        assert_eq!(WebError::NotFound("x".into()).error_kind(), "not_found");
        assert_eq!(WebError::Internal("x".into()).error_kind(), "internal");
    }

    #[test]
    fn conflict_message_reaches_the_caller() {
        let err = WebError::Conflict("invalid status transition".into());
        assert_eq!(err.message(), "invalid status transition");
    }

    #[test]
    fn internal_errors_never_leak_detail() {
        let err = WebError::Internal("pool exhausted at 10.0.0.3".into());
        assert_eq!(err.message(), "An internal error occurred");
    }
}
