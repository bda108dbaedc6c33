// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AttendanceCounts, AttendanceStatus, DomainError, PayrollMonth, overtime_hours_to_shifts,
    parse_date, tally_attendance,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::Date;

fn day(value: &str) -> Date {
    parse_date(value).unwrap()
}

#[test]
fn test_normalize_accepts_canonical_statuses() {
    assert_eq!(AttendanceStatus::normalize("Present").unwrap(), AttendanceStatus::Present);
    assert_eq!(AttendanceStatus::normalize("Absent").unwrap(), AttendanceStatus::Absent);
    assert_eq!(AttendanceStatus::normalize("OFF").unwrap(), AttendanceStatus::Off);
}

#[test]
fn test_normalize_is_case_insensitive_and_trims() {
    assert_eq!(AttendanceStatus::normalize("  present ").unwrap(), AttendanceStatus::Present);
    assert_eq!(AttendanceStatus::normalize("ABSENT").unwrap(), AttendanceStatus::Absent);
    assert_eq!(AttendanceStatus::normalize("off").unwrap(), AttendanceStatus::Off);
}

#[test]
fn test_normalize_maps_legacy_values() {
    assert_eq!(AttendanceStatus::normalize("Late").unwrap(), AttendanceStatus::Present);
    assert_eq!(AttendanceStatus::normalize("Half-Day").unwrap(), AttendanceStatus::Absent);
    assert_eq!(AttendanceStatus::normalize("half day").unwrap(), AttendanceStatus::Absent);
    assert_eq!(AttendanceStatus::normalize("P").unwrap(), AttendanceStatus::Present);
    assert_eq!(AttendanceStatus::normalize("a").unwrap(), AttendanceStatus::Absent);
    assert_eq!(AttendanceStatus::normalize("O").unwrap(), AttendanceStatus::Off);
}

#[test]
fn test_normalize_rejects_unknown_values() {
    let result: Result<AttendanceStatus, DomainError> = AttendanceStatus::normalize("Sick");
    assert!(matches!(result, Err(DomainError::InvalidAttendanceStatus(ref v)) if v == "Sick"));
    assert!(AttendanceStatus::normalize("").is_err());
}

#[test]
fn test_normalization_is_deterministic() {
    for input in ["late", "LATE", "Late "] {
        let first: AttendanceStatus = AttendanceStatus::normalize(input).unwrap();
        let second: AttendanceStatus = AttendanceStatus::normalize(input).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_stored_representation() {
    assert_eq!(AttendanceStatus::Present.as_str(), "Present");
    assert_eq!(AttendanceStatus::Absent.as_str(), "Absent");
    assert_eq!(AttendanceStatus::Off.as_str(), "OFF");
    assert_eq!(serde_json::to_string(&AttendanceStatus::Off).unwrap(), "\"OFF\"");
}

#[test]
fn test_tally_counts_unmarked_days_as_absent() {
    let period: PayrollMonth = PayrollMonth::new(2025, 2).unwrap();
    let records: Vec<(Date, AttendanceStatus)> = vec![
        (day("2025-02-03"), AttendanceStatus::Present),
        (day("2025-02-04"), AttendanceStatus::Present),
        (day("2025-02-05"), AttendanceStatus::Off),
        (day("2025-02-06"), AttendanceStatus::Absent),
    ];

    let counts: AttendanceCounts = tally_attendance(period, records).unwrap();

    assert_eq!(counts.days_in_month, 28);
    assert_eq!(counts.present_days, 2);
    assert_eq!(counts.off_days, 1);
    assert_eq!(counts.unmarked_days, 24);
    assert_eq!(counts.absent_days, 25);
}

#[test]
fn test_tally_ignores_records_outside_month() {
    let period: PayrollMonth = PayrollMonth::new(2025, 3).unwrap();
    let records: Vec<(Date, AttendanceStatus)> = vec![
        (day("2025-02-28"), AttendanceStatus::Present),
        (day("2025-03-01"), AttendanceStatus::Present),
        (day("2025-04-01"), AttendanceStatus::Present),
    ];

    let counts: AttendanceCounts = tally_attendance(period, records).unwrap();

    assert_eq!(counts.present_days, 1);
    assert_eq!(counts.absent_days, 30);
}

#[test]
fn test_overtime_hours_round_to_half_shifts() {
    let dec = |v: &str| Decimal::from_str(v).unwrap();
    assert_eq!(overtime_hours_to_shifts(dec("8")), dec("1"));
    assert_eq!(overtime_hours_to_shifts(dec("4")), dec("0.5"));
    assert_eq!(overtime_hours_to_shifts(dec("6")), dec("1"));
    assert_eq!(overtime_hours_to_shifts(dec("1")), dec("0"));
    assert_eq!(overtime_hours_to_shifts(dec("10")), dec("1.5"));
}
