// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ems_audit::Target;
use ems_domain::{Role, validate_email, validate_person_name};
use ems_persistence::{NewUser, Persistence, UserData, verify_password};
use tracing::info;

use super::{record_audit, require_employee, snapshot};
use crate::auth::{AuthenticatedUser, AuthenticationService, AuthorizationService, TokenService};
use crate::capabilities::compute_capabilities;
use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ChangePasswordRequest, CurrentUserResponse, LoginRequest, LoginResponse, MessageResponse,
    RegisterUserRequest, RegisterUserResponse, SetUserActiveRequest, UserInfo, UserListResponse,
};

fn load_user(persistence: &mut Persistence, user_id: i64) -> Result<UserData, ApiError> {
    persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })
}

/// Logs in with email and password.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for bad credentials or a
/// locked or deactivated account.
pub fn login(
    persistence: &mut Persistence,
    tokens: &TokenService,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (token, authenticated) =
        AuthenticationService::login(persistence, tokens, &request.email, &request.password)?;
    let user: UserData = load_user(persistence, authenticated.user_id)?;

    Ok(LoginResponse {
        token,
        token_type: String::from("Bearer"),
        expires_in: tokens.ttl().whole_seconds(),
        user: UserInfo::from(&user),
    })
}

/// Registers a login account.
///
/// Employee accounts must link to an existing employee record. The
/// password must satisfy the default [`PasswordPolicy`].
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is invalid,
/// the password breaks policy, or the email is already registered.
pub fn register_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: RegisterUserRequest,
) -> Result<RegisterUserResponse, ApiError> {
    AuthorizationService::require_admin(actor, "register_user")?;

    let email: String = request.email.trim().to_lowercase();
    validate_email(&email)?;
    let name: String = request.name.trim().to_string();
    validate_person_name("name", &name)?;

    let role: Role = match request.role.as_deref().map(str::trim) {
        None | Some("") => Role::Employee,
        Some(value) => value.parse()?,
    };

    if let Some(employee_id) = request.employee_id {
        require_employee(persistence, employee_id)?;
    } else if role == Role::Employee {
        return Err(ApiError::InvalidInput {
            field: String::from("employee_id"),
            message: String::from("Employee accounts must be linked to an employee record"),
        });
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.confirm_password,
        &email,
        &name,
    )?;

    let user: UserData = persistence.create_user(
        &NewUser {
            email,
            password: request.password,
            name,
            role,
            employee_id: request.employee_id,
        },
        actor.to_audit_actor().label(),
    )?;
    let info: UserInfo = UserInfo::from(&user);

    record_audit(
        persistence,
        actor,
        "RegisterUser",
        Some(format!("role {role}")),
        Target::new("user", user.user_id),
        None,
        Some(snapshot(&info)?),
    )?;

    Ok(RegisterUserResponse {
        message: format!("User '{}' registered", user.email),
        user: info,
    })
}

/// Returns the caller's account and capabilities.
///
/// # Errors
///
/// Returns an error if the account cannot be loaded.
pub fn current_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<CurrentUserResponse, ApiError> {
    let user: UserData = load_user(persistence, actor.user_id)?;
    Ok(CurrentUserResponse {
        user: UserInfo::from(&user),
        capabilities: compute_capabilities(actor),
    })
}

/// Acknowledges a logout. Tokens are stateless, so the client simply
/// discards its token.
#[must_use]
pub fn logout(actor: &AuthenticatedUser) -> MessageResponse {
    info!(user_id = actor.user_id, "User logged out");
    MessageResponse {
        message: String::from("Logged out"),
    }
}

/// Changes the caller's password.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the current password is
/// wrong and `ApiError::PasswordPolicyViolation` if the new one breaks
/// policy.
pub fn change_password(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: &ChangePasswordRequest,
) -> Result<MessageResponse, ApiError> {
    let user: UserData = load_user(persistence, actor.user_id)?;
    if !verify_password(&request.current_password, &user.password_hash)? {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.confirm_password,
        &user.email,
        &user.name,
    )?;
    persistence.update_password(user.user_id, &request.new_password)?;

    record_audit(
        persistence,
        actor,
        "ChangePassword",
        None,
        Target::new("user", user.user_id),
        None,
        None,
    )?;

    Ok(MessageResponse {
        message: String::from("Password changed"),
    })
}

/// Lists all accounts.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<UserListResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_users")?;
    let users: Vec<UserInfo> = persistence.list_users()?.iter().map(UserInfo::from).collect();
    Ok(UserListResponse { users })
}

/// Activates or deactivates an account.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, tries to deactivate
/// their own account, or the account does not exist.
pub fn set_user_active(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    user_id: i64,
    request: SetUserActiveRequest,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::require_admin(actor, "set_user_active")?;
    if user_id == actor.user_id && !request.is_active {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("self_deactivation"),
            message: String::from("Admins cannot deactivate their own account"),
        });
    }

    let before: UserInfo = UserInfo::from(&load_user(persistence, user_id)?);
    persistence.set_user_active(user_id, request.is_active)?;
    let after: UserInfo = UserInfo::from(&load_user(persistence, user_id)?);

    let action: &str = if request.is_active {
        "ActivateUser"
    } else {
        "DeactivateUser"
    };
    record_audit(
        persistence,
        actor,
        action,
        None,
        Target::new("user", user_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;

    Ok(after)
}
