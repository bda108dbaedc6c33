// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Logins are verified against bcrypt hashes and answered with an HS256
//! JWT. Tokens are stateless; every request re-loads the user so that
//! deactivated accounts lose access immediately.

use ems_audit::Actor;
use ems_domain::Role;
use ems_persistence::{LoginFailureOutcome, Persistence, UserData, verify_password};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::{ApiError, AuthError};

/// Consecutive failed logins that lock an account.
pub const MAX_FAILED_LOGINS: i32 = 5;

/// How long a locked account stays locked.
pub const LOCKOUT_DURATION: Duration = Duration::minutes(30);

/// Default token lifetime (7 days).
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;

/// Longest token lifetime (one leap year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user id.
    pub sub: String,
    /// The user's role when the token was issued.
    pub role: String,
    /// The linked employee, for employee accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expires at, seconds since the epoch.
    pub exp: i64,
}

/// Token issuance and validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to issue token: {0}")]
    IssueFailed(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        Self::AuthenticationFailed {
            reason: err.to_string(),
        }
    }
}

/// Issues and validates HS256 access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Arguments
    ///
    /// * `secret` - The shared signing secret
    /// * `ttl_hours` - Token lifetime in hours, clamped to
    ///   `1..=MAX_TOKEN_TTL_HOURS`
    #[must_use]
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
        }
    }

    /// Token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String, TokenError> {
        self.issue_at(user, OffsetDateTime::now_utc())
    }

    pub(crate) fn issue_at(
        &self,
        user: &AuthenticatedUser,
        issued_at: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let expires_at: OffsetDateTime = issued_at
            .checked_add(self.ttl)
            .ok_or_else(|| TokenError::IssueFailed(String::from("expiry is out of range")))?;
        let claims: Claims = Claims {
            sub: user.user_id.to_string(),
            role: user.role.as_str().to_string(),
            employee_id: user.employee_id,
            iat: issued_at.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::IssueFailed(e.to_string()))
    }

    /// Verifies the signature and expiry of a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token and
    /// `TokenError::Invalid` for anything else that fails verification.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation: Validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

/// An authenticated user, re-loaded from storage on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

impl AuthenticatedUser {
    /// Builds an authenticated user from a stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored role is not recognised.
    pub fn from_record(user: &UserData) -> Result<Self, AuthError> {
        let role: Role = user
            .role
            .parse()
            .map_err(|_| AuthError::AuthenticationFailed {
                reason: format!("Account has an unknown role: {}", user.role),
            })?;
        Ok(Self {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role,
            employee_id: user.employee_id,
        })
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// The audit actor for changes made by this user.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::user(self.user_id, self.email.clone(), self.role)
    }
}

/// Role-based access checks.
///
/// Admins may do everything. Employees may only read data belonging to
/// their linked employee record.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for non-admin users.
    pub fn require_admin(user: &AuthenticatedUser, action: &str) -> Result<(), AuthError> {
        if user.is_admin() {
            return Ok(());
        }
        warn!(user_id = user.user_id, action, "Admin action refused");
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from(Role::Admin.as_str()),
        })
    }

    /// Requires the admin role or ownership of `employee_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if an employee user reaches for
    /// another employee's data.
    pub fn require_admin_or_self(
        user: &AuthenticatedUser,
        employee_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if user.is_admin() || user.employee_id == Some(employee_id) {
            return Ok(());
        }
        warn!(
            user_id = user.user_id,
            employee_id, action, "Access to another employee refused"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from(Role::Admin.as_str()),
        })
    }
}

/// Password login and token authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials and issues a token.
    ///
    /// Every wrong password counts toward the lockout; the
    /// [`MAX_FAILED_LOGINS`]th consecutive one locks the account for
    /// [`LOCKOUT_DURATION`]. A locked or deactivated account is refused
    /// even with the right password.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `tokens` - The token service
    /// * `email` - The login email, matched case-insensitively
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`token`, `authenticated_user`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` for bad credentials, locked
    /// or inactive accounts, and `ApiError::Internal` for storage failures.
    pub fn login(
        persistence: &mut Persistence,
        tokens: &TokenService,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser), ApiError> {
        let invalid_credentials = || ApiError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let Some(user) = persistence.get_user_by_email(email)? else {
            warn!(email, "Login for unknown account");
            return Err(invalid_credentials());
        };

        if !user.is_active {
            warn!(user_id = user.user_id, "Login for deactivated account");
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Account is deactivated"),
            });
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        if let Some(locked_until) = Self::locked_until(&user)?
            && locked_until > now
        {
            warn!(user_id = user.user_id, "Login for locked account");
            return Err(ApiError::AuthenticationFailed {
                reason: format!(
                    "Account is locked until {}",
                    locked_until.format(&Rfc3339).unwrap_or_default()
                ),
            });
        }

        if !verify_password(password, &user.password_hash)? {
            let lock_until: String = (now + LOCKOUT_DURATION)
                .format(&Rfc3339)
                .map_err(|e| ApiError::Internal {
                    message: e.to_string(),
                })?;
            let outcome: LoginFailureOutcome =
                persistence.record_login_failure(user.user_id, MAX_FAILED_LOGINS, &lock_until)?;
            if outcome.locked {
                return Err(ApiError::AuthenticationFailed {
                    reason: format!(
                        "Too many failed attempts; account locked for {} minutes",
                        LOCKOUT_DURATION.whole_minutes()
                    ),
                });
            }
            warn!(
                user_id = user.user_id,
                failed_attempts = outcome.failed_attempts,
                "Wrong password"
            );
            return Err(invalid_credentials());
        }

        persistence.record_successful_login(user.user_id)?;
        let authenticated: AuthenticatedUser = AuthenticatedUser::from_record(&user)?;
        let token: String = tokens.issue(&authenticated).map_err(AuthError::from)?;

        info!(user_id = user.user_id, role = %authenticated.role, "User logged in");
        Ok((token, authenticated))
    }

    /// Resolves a bearer token to the current state of its user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the token is invalid or
    /// expired, or its user no longer exists or is deactivated.
    pub fn authenticate_token(
        persistence: &mut Persistence,
        tokens: &TokenService,
        token: &str,
    ) -> Result<AuthenticatedUser, ApiError> {
        let claims: Claims = tokens.validate(token).map_err(AuthError::from)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| ApiError::AuthenticationFailed {
                reason: String::from("Invalid token subject"),
            })?;

        let user: UserData =
            persistence
                .get_user_by_id(user_id)?
                .ok_or_else(|| ApiError::AuthenticationFailed {
                    reason: String::from("Account no longer exists"),
                })?;
        if !user.is_active {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Account is deactivated"),
            });
        }

        Ok(AuthenticatedUser::from_record(&user)?)
    }

    fn locked_until(user: &UserData) -> Result<Option<OffsetDateTime>, ApiError> {
        user.locked_until
            .as_deref()
            .map(|value| {
                OffsetDateTime::parse(value, &Rfc3339).map_err(|e| ApiError::Internal {
                    message: format!("Stored lock time '{value}' is unreadable: {e}"),
                })
            })
            .transpose()
    }
}
