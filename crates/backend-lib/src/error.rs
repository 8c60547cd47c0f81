// crates/backend-lib/src/error.rs

//! Central error types + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use batcloud_common::LoginResponse;
use thiserror::Error;

/// Why the session gate turned a request away.
///
/// The variants exist for logs only. At the HTTP boundary every one of them
/// becomes the same 401 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no session token presented")]
    MissingToken,

    #[error("malformed session token")]
    Malformed,

    #[error("session token signature mismatch")]
    BadSignature,

    #[error("session token expired")]
    Expired,

    #[error("failed to sign session token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Short label used as a log field and metric tag
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MissingToken => "missing_token",
            AuthError::Malformed => "malformed",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "expired",
            AuthError::Signing(_) => "signing",
        }
    }
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(AuthError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(AuthError::InvalidCredentials) => "AUTH_001",
            AppError::Unauthorized(AuthError::Signing(_)) => "AUTH_003",
            AppError::Unauthorized(_) => "AUTH_002",
            AppError::MethodNotAllowed => "HTTP_405",
            AppError::Internal(_) => "INT_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Io(_) => "IO_001",
            AppError::Multipart(_) => "UPLOAD_001",
            AppError::InvalidInput(_) => "VAL_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Unauthorized(AuthError::InvalidCredentials) => {
                "Invalid credentials".to_string()
            },
            AppError::Unauthorized(AuthError::Signing(_)) => {
                "An internal server error occurred".to_string()
            },
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::MethodNotAllowed => "Method Not Allowed".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            AppError::Io(_) => "Internal server error".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Multipart(_) => "Invalid upload".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Auth rejections look the same to the client whatever the cause.
        if let AppError::Unauthorized(ref reason) = self {
            if status == StatusCode::UNAUTHORIZED {
                let body = LoginResponse::rejected(self.sanitized_message());
                tracing::debug!(reason = reason.kind(), "rejected unauthenticated request");
                return (status, Json(body)).into_response();
            }
        }

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}
