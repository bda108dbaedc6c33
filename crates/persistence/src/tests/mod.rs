// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod attendance_tests;
mod audit_tests;
mod seeding_tests;

use ems_domain::PayrollMonth;
use rust_decimal::Decimal;
use time::{Date, Month};

use crate::{DepartmentData, EmployeeData, NewEmployee, NewSite, NewWageMaster, Persistence};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("In-memory database should initialize")
}

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

pub fn month(year: i32, month: u8) -> PayrollMonth {
    PayrollMonth::new(year, month).expect("Valid test month")
}

pub fn create_test_department(persistence: &mut Persistence, name: &str) -> DepartmentData {
    persistence
        .create_department(name, None, "test")
        .expect("Department should be created")
}

pub fn new_test_employee(first_name: &str) -> NewEmployee {
    NewEmployee {
        first_name: first_name.to_string(),
        last_name: Some("Tester".to_string()),
        hire_date: Some(date(2025, Month::January, 6)),
        ..NewEmployee::default()
    }
}

pub fn create_test_employee(persistence: &mut Persistence, first_name: &str) -> EmployeeData {
    persistence
        .create_employee(&new_test_employee(first_name), "test")
        .expect("Employee should be created")
}

pub fn create_test_site(persistence: &mut Persistence, site_id: &str) {
    persistence
        .create_site(
            &NewSite {
                site_id: site_id.to_string(),
                site_name: format!("Site {site_id}"),
                location: Some("Agra".to_string()),
                state: Some("UP".to_string()),
            },
            "test",
        )
        .expect("Site should be created");
}

pub fn new_test_wage_master(site_id: &str, salary_code: &str, daily_wage: Decimal, from: Date, to: Option<Date>) -> NewWageMaster {
    NewWageMaster {
        salary_code: salary_code.to_string(),
        site_id: site_id.to_string(),
        rank: "Guard".to_string(),
        state: "UP".to_string(),
        skill_level: "Unskilled".to_string(),
        daily_wage,
        effective_from: from,
        effective_to: to,
    }
}
