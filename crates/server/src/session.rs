// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer token extraction for protected routes.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use ems_api::{AuthenticatedUser, AuthenticationService};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::HttpError;

/// The caller behind `Authorization: Bearer <token>`.
///
/// Taking this as a handler argument makes the route require a login. The
/// account is reloaded on every request, so deactivating a user locks them
/// out without waiting for their token to expire.
pub struct SessionUser(pub AuthenticatedUser);

/// Pulls the raw token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, SessionError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(SessionError::MissingHeader)?;
    let text: &str = value.to_str().map_err(|_| SessionError::MalformedHeader)?;
    // Auth schemes are case-insensitive.
    let (scheme, token) = text
        .trim_start()
        .split_once(' ')
        .ok_or(SessionError::MalformedHeader)?;
    let token: &str = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(SessionError::MalformedHeader);
    }
    Ok(token)
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token: &str = bearer_token(&parts.headers).inspect_err(|e| {
            debug!(path = %parts.uri.path(), reason = ?e, "No usable bearer token");
        })?;

        let mut persistence = state.persistence.lock().await;
        let user: AuthenticatedUser =
            AuthenticationService::authenticate_token(&mut persistence, &state.tokens, token)
                .map_err(|e| {
                    warn!(error = %e, "Token rejected");
                    SessionError::Rejected(e.to_string())
                })?;

        debug!(user_id = user.user_id, role = %user.role.as_str(), "Session resolved");
        Ok(Self(user))
    }
}

/// Why a protected route answered 401.
#[derive(Debug)]
pub enum SessionError {
    MissingHeader,
    /// Not valid ASCII, a scheme other than `Bearer`, or an empty token.
    MalformedHeader,
    /// The token failed validation or its account is gone or inactive.
    Rejected(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingHeader => String::from("Authorization token is missing"),
            Self::MalformedHeader => {
                String::from("Authorization header must look like 'Bearer <token>'")
            }
            Self::Rejected(reason) => reason,
        };
        HttpError::unauthorized(message).into_response()
    }
}
