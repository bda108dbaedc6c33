// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference seeding, demo accounts, status and schema reset.

use super::{create_test_employee, create_test_persistence};
use crate::{DEFAULT_DEPARTMENTS, DEFAULT_HOLIDAYS, DEMO_ADMIN_EMAIL, DEMO_EMPLOYEE_EMAIL, PersistenceError};

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = create_test_persistence();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_reference_seeding_is_idempotent() {
    let mut persistence = create_test_persistence();

    let first = persistence.seed_reference_data(2025).unwrap();
    assert!(!first.sequence_created);
    assert_eq!(first.departments_created, DEFAULT_DEPARTMENTS.len());
    assert_eq!(first.holidays_created, DEFAULT_HOLIDAYS.len());

    let second = persistence.seed_reference_data(2025).unwrap();
    assert_eq!(second.departments_created, 0);
    assert_eq!(second.holidays_created, 0);

    assert_eq!(persistence.list_departments().unwrap().len(), 10);
    let holidays = persistence.list_holidays(Some(2025)).unwrap();
    assert!(holidays.iter().any(|h| h.name == "Republic Day" && h.holiday_date == "2025-01-26"));
}

#[test]
fn test_demo_seeding_requires_reference_data() {
    let mut persistence = create_test_persistence();

    let result = persistence.seed_demo_data();

    assert!(matches!(result, Err(PersistenceError::InitializationError(_))));
}

#[test]
fn test_demo_seeding_creates_linked_accounts_once() {
    let mut persistence = create_test_persistence();
    persistence.seed_reference_data(2025).unwrap();

    assert_eq!(persistence.seed_demo_data().unwrap(), 2);
    assert_eq!(persistence.seed_demo_data().unwrap(), 0);

    let admin = persistence.get_user_by_email(DEMO_ADMIN_EMAIL).unwrap().unwrap();
    assert_eq!(admin.role, "admin");
    assert!(admin.employee_id.is_none());

    let user = persistence.get_user_by_email(DEMO_EMPLOYEE_EMAIL).unwrap().unwrap();
    let employee_id = user.employee_id.unwrap();
    let employee = persistence.get_employee(employee_id).unwrap().unwrap();
    assert_eq!(employee.full_name(), "Demo Employee");
    assert_eq!(employee.designation.as_deref(), Some("Associate"));
    let it = persistence.find_department_by_name("IT").unwrap().unwrap();
    assert_eq!(employee.department_id, Some(it.department_id));
}

#[test]
fn test_status_reports_counts_and_next_id() {
    let mut persistence = create_test_persistence();
    create_test_employee(&mut persistence, "Asha");

    let status = persistence.status().unwrap();

    assert_eq!(status.next_employee_id, Some(91_510_002));
    let employees = status
        .table_counts
        .iter()
        .find(|(table, _)| table == "employees")
        .map(|(_, count)| *count);
    assert_eq!(employees, Some(1));
}

#[test]
fn test_reset_schema_empties_tables_and_restarts_sequence() {
    let mut persistence = create_test_persistence();
    create_test_employee(&mut persistence, "Asha");
    persistence.seed_reference_data(2025).unwrap();

    persistence.reset_schema().unwrap();

    assert!(persistence.list_departments().unwrap().is_empty());
    assert_eq!(persistence.peek_next_employee_id().unwrap(), Some(91_510_001));
    let employee = create_test_employee(&mut persistence, "Bala");
    assert_eq!(employee.employee_id, 91_510_001);
}
