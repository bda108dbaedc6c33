// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance uniqueness, correction and range queries.

use ems_domain::AttendanceStatus;
use rust_decimal::Decimal;
use time::Month;

use super::{create_test_employee, create_test_persistence, date, month};
use crate::{AttendanceUpdate, NewAttendance, PersistenceError};

fn record(employee_id: i64, day: u8, status: AttendanceStatus) -> NewAttendance {
    NewAttendance {
        employee_id,
        attendance_date: date(2025, Month::April, day),
        status,
        check_in_time: None,
        check_out_time: None,
        overtime_shifts: Decimal::ZERO,
        remarks: None,
    }
}

#[test]
fn test_mark_attendance_stores_canonical_status() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    let stored = persistence
        .mark_attendance(&record(employee.employee_id, 1, AttendanceStatus::Off), "admin")
        .unwrap();

    assert_eq!(stored.attendance_status, "OFF");
    assert_eq!(stored.attendance_date, "2025-04-01");
    assert_eq!(stored.marked_by, "admin");
    assert_eq!(stored.overtime_shifts, "0");
}

#[test]
fn test_second_record_for_same_day_is_rejected() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    persistence
        .mark_attendance(&record(employee.employee_id, 3, AttendanceStatus::Present), "admin")
        .unwrap();
    let result =
        persistence.mark_attendance(&record(employee.employee_id, 3, AttendanceStatus::Absent), "admin");

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
    let stored = persistence
        .find_attendance(employee.employee_id, date(2025, Month::April, 3))
        .unwrap()
        .unwrap();
    assert_eq!(stored.attendance_status, "Present");
}

#[test]
fn test_attendance_for_unknown_employee_is_rejected() {
    let mut persistence = create_test_persistence();

    let result = persistence.mark_attendance(&record(12345, 1, AttendanceStatus::Present), "admin");

    assert!(matches!(result, Err(PersistenceError::ForeignKeyViolation(_))));
}

#[test]
fn test_update_attendance_corrects_the_record() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");
    let stored = persistence
        .mark_attendance(&record(employee.employee_id, 2, AttendanceStatus::Absent), "admin")
        .unwrap();

    let corrected = persistence
        .update_attendance(
            stored.attendance_id,
            &AttendanceUpdate {
                status: Some(AttendanceStatus::Present),
                overtime_shifts: Some(Decimal::new(15, 1)),
                ..AttendanceUpdate::default()
            },
            "supervisor",
        )
        .unwrap()
        .unwrap();

    assert_eq!(corrected.attendance_status, "Present");
    assert_eq!(corrected.overtime_shifts, "1.5");
    assert_eq!(corrected.updated_by.as_deref(), Some("supervisor"));
    assert!(persistence.update_attendance(9999, &AttendanceUpdate::default(), "x").unwrap().is_none());
}

#[test]
fn test_monthly_listing_excludes_other_months() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    for day in [1, 15, 30] {
        persistence
            .mark_attendance(&record(employee.employee_id, day, AttendanceStatus::Present), "admin")
            .unwrap();
    }
    let mut may_first = record(employee.employee_id, 1, AttendanceStatus::Present);
    may_first.attendance_date = date(2025, Month::May, 1);
    persistence.mark_attendance(&may_first, "admin").unwrap();

    let april = persistence
        .list_attendance_for_month(employee.employee_id, month(2025, 4))
        .unwrap();
    assert_eq!(april.len(), 3);
    assert!(april.iter().all(|a| a.attendance_date.starts_with("2025-04")));

    let ranged = persistence
        .list_attendance_for_employee(
            employee.employee_id,
            Some(date(2025, Month::April, 10)),
            None,
        )
        .unwrap();
    assert_eq!(ranged.len(), 3);
}

#[test]
fn test_list_attendance_for_date_covers_all_employees() {
    let mut persistence = create_test_persistence();
    let first = create_test_employee(&mut persistence, "Asha");
    let second = create_test_employee(&mut persistence, "Bala");

    persistence
        .mark_attendance(&record(first.employee_id, 7, AttendanceStatus::Present), "admin")
        .unwrap();
    persistence
        .mark_attendance(&record(second.employee_id, 7, AttendanceStatus::Absent), "admin")
        .unwrap();

    let records = persistence
        .list_attendance_for_date(date(2025, Month::April, 7))
        .unwrap();
    assert_eq!(records.len(), 2);
}
