// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit events, deductions and document metadata.

use ems_audit::{Action, Actor, AuditEvent, StateSnapshot, Target};
use ems_domain::Role;
use rust_decimal::Decimal;

use super::{create_test_employee, create_test_persistence, month};
use crate::{DeductionUpdate, NewDeduction, NewDocument, PersistenceError};

#[test]
fn test_audit_events_round_trip_newest_first() {
    let mut persistence = create_test_persistence();

    let first = AuditEvent::new(
        Actor::system(),
        Action::new("SeedReferenceData".to_string(), None),
        Target::new("database", "reference"),
        None,
        None,
    );
    let second = AuditEvent::new(
        Actor::user(1, "admin@company.com".to_string(), Role::Admin),
        Action::new("UpdateEmployee".to_string(), Some("designation".to_string())),
        Target::new("employee", 91_510_001),
        Some(StateSnapshot::new(r#"{"designation":null}"#.to_string())),
        Some(StateSnapshot::new(r#"{"designation":"Lead"}"#.to_string())),
    );
    persistence.persist_audit_event(&first).unwrap();
    let second_id = persistence.persist_audit_event(&second).unwrap();

    let events = persistence.list_recent_audit_events(10).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_id, second_id);
    assert_eq!(events[0].target, "employee:91510001");
    assert_eq!(events[0].actor_role, "admin");
    assert_eq!(events[0].after.as_deref(), Some(r#"{"designation":"Lead"}"#));

    let limited = persistence.list_recent_audit_events(1).unwrap();
    assert_eq!(limited.len(), 1);

    let stored = persistence.get_audit_event(second_id).unwrap().unwrap();
    assert_eq!(stored.details.as_deref(), Some("designation"));
}

#[test]
fn test_deductions_create_list_delete() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    let deduction = persistence
        .create_deduction(
            &NewDeduction {
                employee_id: employee.employee_id,
                deduction_type: "Loan".to_string(),
                total_amount: Decimal::new(300_000, 2),
                months: 3,
                start_month: month(2025, 4),
            },
            "admin",
        )
        .unwrap();

    assert_eq!(deduction.total_amount, "3000.00");
    assert_eq!(deduction.start_month, "2025-04");
    assert_eq!(persistence.list_deductions(Some(employee.employee_id)).unwrap().len(), 1);
    assert!(persistence.list_deductions(Some(1)).unwrap().is_empty());

    assert!(persistence.delete_deduction(deduction.deduction_id).unwrap());
    assert!(!persistence.delete_deduction(deduction.deduction_id).unwrap());
}

#[test]
fn test_deduction_months_must_be_positive() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    let result = persistence.create_deduction(
        &NewDeduction {
            employee_id: employee.employee_id,
            deduction_type: "Advance".to_string(),
            total_amount: Decimal::new(1000, 0),
            months: 0,
            start_month: month(2025, 4),
        },
        "admin",
    );

    assert!(matches!(result, Err(PersistenceError::CheckViolation(_))));
}

#[test]
fn test_deduction_can_be_rescheduled() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");
    let deduction = persistence
        .create_deduction(
            &NewDeduction {
                employee_id: employee.employee_id,
                deduction_type: "Loan".to_string(),
                total_amount: Decimal::new(3000, 0),
                months: 3,
                start_month: month(2025, 4),
            },
            "admin",
        )
        .unwrap();

    let updated = persistence
        .update_deduction(
            deduction.deduction_id,
            &DeductionUpdate {
                months: Some(6),
                start_month: Some(month(2025, 7)),
                ..DeductionUpdate::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.months, 6);
    assert_eq!(updated.start_month, "2025-07");
    assert_eq!(updated.total_amount, "3000");
    assert_eq!(updated.deduction_type, "Loan");

    let rejected = persistence.update_deduction(
        deduction.deduction_id,
        &DeductionUpdate {
            months: Some(0),
            ..DeductionUpdate::default()
        },
    );
    assert!(matches!(rejected, Err(PersistenceError::CheckViolation(_))));

    let missing = persistence
        .update_deduction(
            9999,
            &DeductionUpdate {
                months: Some(2),
                ..DeductionUpdate::default()
            },
        )
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_documents_are_listed_newest_first() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    for (kind, path) in [("aadhaar", "a/1_card.pdf"), ("photo", "a/2_face.png")] {
        persistence
            .create_document(
                &NewDocument {
                    employee_id: employee.employee_id,
                    document_type: kind.to_string(),
                    original_filename: path.rsplit('/').next().unwrap_or(path).to_string(),
                    stored_path: path.to_string(),
                    content_type: None,
                    size_bytes: 128,
                },
                "admin",
            )
            .unwrap();
    }

    let documents = persistence.list_documents(employee.employee_id).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].document_type, "photo");
    assert_eq!(documents[1].original_filename, "1_card.pdf");
}
