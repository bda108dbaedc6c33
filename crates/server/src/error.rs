// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON error envelope and the mapping from API errors to status codes.

use axum::{
    Json,
    body::to_bytes,
    extract::{Request, multipart::MultipartError},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use ems_api::ApiError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Longest plain-text rejection body carried into an envelope message.
const MAX_REJECTION_TEXT: usize = 1024;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `true`.
    pub error: bool,
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. }
            | ApiError::DomainRuleViolation { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error while handling request");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                };
            }
        };
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            warn!(error = %err, "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<MultipartError> for HttpError {
    fn from(err: MultipartError) -> Self {
        warn!(error = %err, "Malformed multipart body");
        Self {
            status: err.status(),
            message: format!("Malformed upload: {}", err.body_text()),
        }
    }
}

fn is_json(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Middleware that rewrites client errors produced outside the handlers
/// into the JSON envelope.
///
/// Body limit layers and axum's extractor rejections answer in plain text.
/// Their status is kept and their text becomes the message.
pub async fn json_error_envelope(request: Request, next: Next) -> Response {
    let response: Response = next.run(request).await;
    let status: StatusCode = response.status();
    if !status.is_client_error() || is_json(response.headers().get(CONTENT_TYPE)) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let text: String = to_bytes(body, MAX_REJECTION_TEXT)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();
    let message: String = if text.is_empty() {
        status.canonical_reason().unwrap_or("Request rejected").to_string()
    } else {
        text
    };
    debug!(status = status.as_u16(), message = %message, "Wrapping rejection in error envelope");

    let mut wrapped: Response = HttpError { status, message }.into_response();
    for (name, value) in &parts.headers {
        if name != CONTENT_LENGTH && !wrapped.headers().contains_key(name) {
            wrapped.headers_mut().insert(name.clone(), value.clone());
        }
    }
    wrapped
}
