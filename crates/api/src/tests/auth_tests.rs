// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for login, lockout, tokens and role checks.

use ems_domain::Role;
use time::{Date, Duration, OffsetDateTime};

use crate::auth::{
    AuthenticatedUser, AuthenticationService, AuthorizationService, MAX_FAILED_LOGINS,
    MAX_TOKEN_TTL_HOURS, TokenError, TokenService,
};
use crate::capabilities::{Capability, compute_capabilities};
use crate::error::{ApiError, AuthError};
use crate::handlers::{current_user, login, register_user, set_user_active};
use crate::request_response::{LoginRequest, RegisterUserRequest, SetUserActiveRequest};
use crate::tests::helpers::{
    create_test_admin, create_test_employee, create_test_employee_user, create_test_persistence,
    create_test_tokens, stored_admin,
};

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn test_login_issues_token_for_valid_credentials() {
    let mut persistence = create_test_persistence();
    let tokens = create_test_tokens();
    let user = stored_admin(&mut persistence, "boss@test.com", "Secret123!");

    let response = login(&mut persistence, &tokens, &login_request("boss@test.com", "Secret123!")).unwrap();

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.user.user_id, user.user_id);
    let resolved =
        AuthenticationService::authenticate_token(&mut persistence, &tokens, &response.token).unwrap();
    assert_eq!(resolved.user_id, user.user_id);
    assert_eq!(resolved.role, Role::Admin);
}

#[test]
fn test_login_rejects_unknown_email_and_wrong_password_alike() {
    let mut persistence = create_test_persistence();
    let tokens = create_test_tokens();
    stored_admin(&mut persistence, "boss@test.com", "Secret123!");

    let unknown = login(&mut persistence, &tokens, &login_request("nobody@test.com", "Secret123!"));
    let wrong = login(&mut persistence, &tokens, &login_request("boss@test.com", "Wrong123!"));

    match (unknown.unwrap_err(), wrong.unwrap_err()) {
        (
            ApiError::AuthenticationFailed { reason: a },
            ApiError::AuthenticationFailed { reason: b },
        ) => assert_eq!(a, b),
        other => panic!("Expected AuthenticationFailed twice, got: {other:?}"),
    }
}

#[test]
fn test_five_wrong_passwords_lock_the_account() {
    let mut persistence = create_test_persistence();
    let tokens = create_test_tokens();
    let user = stored_admin(&mut persistence, "boss@test.com", "Secret123!");

    for _ in 0..MAX_FAILED_LOGINS {
        assert!(login(&mut persistence, &tokens, &login_request("boss@test.com", "Wrong123!")).is_err());
    }

    let stored = persistence.get_user_by_id(user.user_id).unwrap().unwrap();
    assert!(stored.locked_until.is_some());

    // The right password is still refused while locked.
    let result = login(&mut persistence, &tokens, &login_request("boss@test.com", "Secret123!"));
    match result.unwrap_err() {
        ApiError::AuthenticationFailed { reason } => assert!(reason.contains("locked")),
        other => panic!("Expected AuthenticationFailed, got: {other:?}"),
    }
}

#[test]
fn test_successful_login_resets_failure_counter() {
    let mut persistence = create_test_persistence();
    let tokens = create_test_tokens();
    let user = stored_admin(&mut persistence, "boss@test.com", "Secret123!");

    for _ in 0..MAX_FAILED_LOGINS - 1 {
        assert!(login(&mut persistence, &tokens, &login_request("boss@test.com", "Wrong123!")).is_err());
    }
    login(&mut persistence, &tokens, &login_request("boss@test.com", "Secret123!")).unwrap();

    let stored = persistence.get_user_by_id(user.user_id).unwrap().unwrap();
    assert_eq!(stored.failed_login_attempts, 0);
    assert!(stored.last_login_at.is_some());
}

#[test]
fn test_deactivated_account_cannot_log_in_or_use_token() {
    let mut persistence = create_test_persistence();
    let tokens = create_test_tokens();
    let user = stored_admin(&mut persistence, "boss@test.com", "Secret123!");
    let response = login(&mut persistence, &tokens, &login_request("boss@test.com", "Secret123!")).unwrap();

    set_user_active(
        &mut persistence,
        &create_test_admin(),
        user.user_id,
        SetUserActiveRequest { is_active: false },
    )
    .unwrap();

    assert!(login(&mut persistence, &tokens, &login_request("boss@test.com", "Secret123!")).is_err());
    assert!(
        AuthenticationService::authenticate_token(&mut persistence, &tokens, &response.token).is_err()
    );
}

#[test]
fn test_admin_cannot_deactivate_self() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin();

    let result = set_user_active(
        &mut persistence,
        &admin,
        admin.user_id,
        SetUserActiveRequest { is_active: false },
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_token_signed_with_other_secret_is_invalid() {
    let tokens = create_test_tokens();
    let other = TokenService::new("another-secret", 1);
    let token = other.issue(&create_test_admin()).unwrap();

    assert!(matches!(tokens.validate(&token), Err(TokenError::Invalid(_))));
}

#[test]
fn test_expired_token_is_rejected() {
    let tokens = create_test_tokens();
    let issued_at = OffsetDateTime::now_utc() - Duration::hours(2);
    let token = tokens.issue_at(&create_test_admin(), issued_at).unwrap();

    assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
}

#[test]
fn test_token_lifetime_is_clamped() {
    assert_eq!(TokenService::new("s", i64::MAX).ttl(), Duration::hours(MAX_TOKEN_TTL_HOURS));
    assert_eq!(TokenService::new("s", 0).ttl(), Duration::hours(1));
    assert_eq!(TokenService::new("s", 168).ttl(), Duration::days(7));
}

#[test]
fn test_expiry_past_the_calendar_fails_to_issue() {
    let tokens = TokenService::new("s", MAX_TOKEN_TTL_HOURS);
    let issued_at = Date::MAX.midnight().assume_utc();

    let result = tokens.issue_at(&create_test_admin(), issued_at);

    assert!(matches!(result, Err(TokenError::IssueFailed(_))));
}

#[test]
fn test_claims_carry_role_and_employee_link() {
    let tokens = create_test_tokens();
    let token = tokens.issue(&create_test_employee_user(91_510_001)).unwrap();

    let claims = tokens.validate(&token).unwrap();

    assert_eq!(claims.sub, "901");
    assert_eq!(claims.role, "employee");
    assert_eq!(claims.employee_id, Some(91_510_001));
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_employee_may_only_access_own_records() {
    let user: AuthenticatedUser = create_test_employee_user(91_510_001);

    assert!(AuthorizationService::require_admin_or_self(&user, 91_510_001, "read").is_ok());
    match AuthorizationService::require_admin_or_self(&user, 91_510_002, "read") {
        Err(AuthError::Unauthorized { action, .. }) => assert_eq!(action, "read"),
        other => panic!("Expected Unauthorized, got: {other:?}"),
    }
    assert!(AuthorizationService::require_admin(&user, "create_employee").is_err());
    assert!(AuthorizationService::require_admin_or_self(&create_test_admin(), 42, "read").is_ok());
}

#[test]
fn test_capabilities_follow_role() {
    let admin = compute_capabilities(&create_test_admin());
    let employee = compute_capabilities(&create_test_employee_user(91_510_001));

    assert_eq!(admin.can_run_payroll, Capability::Allowed);
    assert_eq!(employee.can_run_payroll, Capability::Denied);
    assert_eq!(employee.can_view_own_records, Capability::Allowed);
}

#[test]
fn test_register_employee_account_requires_linked_employee() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin();

    let unlinked = register_user(
        &mut persistence,
        &admin,
        RegisterUserRequest {
            email: String::from("worker@test.com"),
            password: String::from("Worker123!"),
            confirm_password: String::from("Worker123!"),
            name: String::from("Worker"),
            role: None,
            employee_id: None,
        },
    );
    assert!(matches!(unlinked, Err(ApiError::InvalidInput { .. })));

    let employee = create_test_employee(&mut persistence, "Ravi");
    let response = register_user(
        &mut persistence,
        &admin,
        RegisterUserRequest {
            email: String::from("Worker@Test.com"),
            password: String::from("Worker123!"),
            confirm_password: String::from("Worker123!"),
            name: String::from("Worker"),
            role: Some(String::from("employee")),
            employee_id: Some(employee.employee_id),
        },
    )
    .unwrap();

    assert_eq!(response.user.email, "worker@test.com");
    assert_eq!(response.user.employee_id, Some(employee.employee_id));
}

#[test]
fn test_register_user_requires_admin() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Ravi");

    let result = register_user(
        &mut persistence,
        &create_test_employee_user(employee.employee_id),
        RegisterUserRequest {
            email: String::from("other@test.com"),
            password: String::from("Other123!"),
            confirm_password: String::from("Other123!"),
            name: String::from("Other"),
            role: Some(String::from("admin")),
            employee_id: None,
        },
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_current_user_reports_capabilities() {
    let mut persistence = create_test_persistence();
    let stored = stored_admin(&mut persistence, "boss@test.com", "Secret123!");
    let actor = AuthenticatedUser::from_record(&stored).unwrap();

    let response = current_user(&mut persistence, &actor).unwrap();

    assert_eq!(response.user.email, "boss@test.com");
    assert_eq!(response.capabilities.can_manage_users, Capability::Allowed);
}
