// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use ems_domain::Role;
use ems_persistence::{EmployeeData, NewUser, Persistence, UserData};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::auth::{AuthenticatedUser, TokenService};
use crate::handlers::{create_employee, create_site, create_wage_master};
use crate::request_response::{CreateEmployeeRequest, CreateSiteRequest, CreateWageMasterRequest};

pub const TEST_SECRET: &str = "test-secret";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_tokens() -> TokenService {
    TokenService::new(TEST_SECRET, 1)
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// An admin that exists only in memory. Its id never collides with
/// stored accounts, which start at 1.
pub fn create_test_admin() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 900,
        email: String::from("admin@test.com"),
        name: String::from("Test Admin"),
        role: Role::Admin,
        employee_id: None,
    }
}

pub fn create_test_employee_user(employee_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 901,
        email: String::from("employee@test.com"),
        name: String::from("Test Employee"),
        role: Role::Employee,
        employee_id: Some(employee_id),
    }
}

pub fn stored_admin(persistence: &mut Persistence, email: &str, password: &str) -> UserData {
    persistence
        .create_user(
            &NewUser {
                email: email.to_string(),
                password: password.to_string(),
                name: String::from("Stored Admin"),
                role: Role::Admin,
                employee_id: None,
            },
            "test",
        )
        .unwrap()
}

pub fn employee_request(first_name: &str) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        first_name: first_name.to_string(),
        last_name: Some(String::from("Kumar")),
        hire_date: Some(String::from("2025-01-06")),
        ..CreateEmployeeRequest::default()
    }
}

pub fn create_test_employee(persistence: &mut Persistence, first_name: &str) -> EmployeeData {
    create_employee(persistence, &create_test_admin(), employee_request(first_name))
        .unwrap()
        .employee
}

/// Creates site `S1` with salary code `SC-01` paying `daily_wage` from 2025.
pub fn create_test_wage(persistence: &mut Persistence, daily_wage: &str) {
    let admin: AuthenticatedUser = create_test_admin();
    create_site(
        persistence,
        &admin,
        CreateSiteRequest {
            site_id: String::from("S1"),
            site_name: String::from("Main Plant"),
            location: None,
            state: None,
        },
    )
    .unwrap();
    create_wage_master(
        persistence,
        &admin,
        CreateWageMasterRequest {
            salary_code: String::from("SC-01"),
            site_id: String::from("S1"),
            rank: String::from("Guard"),
            state: String::from("Maharashtra"),
            skill_level: String::from("Skilled"),
            daily_wage: dec(daily_wage),
            effective_from: String::from("2025-01-01"),
            effective_to: None,
        },
    )
    .unwrap();
}

/// Creates an employee on salary code `SC-01` at site `S1`.
pub fn create_paid_employee(persistence: &mut Persistence, first_name: &str) -> EmployeeData {
    let request: CreateEmployeeRequest = CreateEmployeeRequest {
        site_id: Some(String::from("S1")),
        salary_code: Some(String::from("SC-01")),
        ..employee_request(first_name)
    };
    create_employee(persistence, &create_test_admin(), request)
        .unwrap()
        .employee
}
