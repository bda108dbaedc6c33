// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ems_persistence::{
    DEFAULT_DEPARTMENTS, DEFAULT_HOLIDAYS, DEMO_ADMIN_EMAIL, DEMO_EMPLOYEE_EMAIL, DatabaseStatus,
    Persistence,
};

use crate::{InitOptions, InitReport, format_status, initialize};

fn options() -> InitOptions {
    InitOptions {
        drop: false,
        seed_demo: false,
        verify: true,
        year: 2025,
    }
}

#[test]
fn test_first_run_seeds_reference_data() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let report: InitReport = initialize(&mut persistence, &options()).unwrap();

    assert_eq!(report.seed.departments_created, DEFAULT_DEPARTMENTS.len());
    assert_eq!(report.seed.holidays_created, DEFAULT_HOLIDAYS.len());
    assert_eq!(report.demo_accounts_created, 0);
    assert!(persistence.get_user_by_email(DEMO_ADMIN_EMAIL).unwrap().is_none());
}

#[test]
fn test_second_run_changes_nothing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    initialize(&mut persistence, &options()).unwrap();

    let report: InitReport = initialize(&mut persistence, &options()).unwrap();

    assert_eq!(report.seed.departments_created, 0);
    assert_eq!(report.seed.holidays_created, 0);
    assert_eq!(persistence.list_departments().unwrap().len(), DEFAULT_DEPARTMENTS.len());
}

#[test]
fn test_seed_demo_creates_linked_accounts_once() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let demo = InitOptions {
        seed_demo: true,
        ..options()
    };

    let first: InitReport = initialize(&mut persistence, &demo).unwrap();
    let second: InitReport = initialize(&mut persistence, &demo).unwrap();

    assert_eq!(first.demo_accounts_created, 2);
    assert_eq!(second.demo_accounts_created, 0);
    let admin = persistence.get_user_by_email(DEMO_ADMIN_EMAIL).unwrap().unwrap();
    assert_eq!(admin.role, "admin");
    let employee_user = persistence.get_user_by_email(DEMO_EMPLOYEE_EMAIL).unwrap().unwrap();
    let employee = persistence
        .get_employee(employee_user.employee_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(employee.full_name(), "Demo Employee");
}

#[test]
fn test_drop_discards_existing_data() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    initialize(
        &mut persistence,
        &InitOptions {
            seed_demo: true,
            ..options()
        },
    )
    .unwrap();

    let report: InitReport = initialize(
        &mut persistence,
        &InitOptions {
            drop: true,
            ..options()
        },
    )
    .unwrap();

    assert_eq!(report.seed.departments_created, DEFAULT_DEPARTMENTS.len());
    assert!(persistence.list_users().unwrap().is_empty());
    assert_eq!(persistence.peek_next_employee_id().unwrap(), Some(91_510_001));
}

#[test]
fn test_status_lists_tables_and_next_id() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    initialize(&mut persistence, &options()).unwrap();

    let status: DatabaseStatus = persistence.status().unwrap();
    let text: String = format_status(&status);

    assert!(text.contains("departments"));
    assert!(text.ends_with("next employee id: 91510001"));
}

#[test]
fn test_format_status_reports_missing_sequence() {
    let status = DatabaseStatus {
        table_counts: vec![(String::from("employees"), 3)],
        next_employee_id: None,
    };

    assert_eq!(
        format_status(&status),
        "employees  3\nnext employee id: sequence missing"
    );
}
