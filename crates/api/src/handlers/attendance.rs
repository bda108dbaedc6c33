// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use ems_audit::Target;
use ems_domain::{
    AttendanceCounts, AttendanceStatus, PayrollMonth, check_daily_overtime, checked_sum,
    overtime_hours_to_shifts, parse_date, tally_attendance,
};
use ems_persistence::{AttendanceData, AttendanceUpdate, EmployeeData, NewAttendance, Persistence};
use rust_decimal::Decimal;
use time::Date;
use tracing::info;

use super::{clean, parse_date_field, parse_optional_date, record_audit, require_employee, snapshot};
use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{
    AttendanceListResponse, AttendanceRangeQuery, AttendanceResponse, BulkAttendanceRowResult,
    BulkMarkAttendanceRequest, BulkMarkAttendanceResponse, MarkAttendanceRequest,
    MonthQuery, MonthlyAttendanceSummary, UpdateAttendanceRequest,
};

/// Picks overtime in shifts, preferring an explicit shift count over hours.
fn resolve_overtime(shifts: Option<Decimal>, hours: Option<Decimal>) -> Result<Option<Decimal>, ApiError> {
    Ok(shifts
        .or_else(|| hours.map(overtime_hours_to_shifts))
        .map(check_daily_overtime)
        .transpose()?)
}

fn corrupt(field: &str, value: &str) -> ApiError {
    ApiError::Internal {
        message: format!("Stored attendance has an unreadable {field} '{value}'"),
    }
}

/// Tallies stored attendance for a month and sums its overtime.
pub(super) fn attendance_totals(
    period: PayrollMonth,
    records: &[AttendanceData],
) -> Result<(AttendanceCounts, Decimal), ApiError> {
    let mut entries: Vec<(Date, AttendanceStatus)> = Vec::with_capacity(records.len());
    let mut overtime: Vec<Decimal> = Vec::new();
    for record in records {
        let date: Date = parse_date(&record.attendance_date)
            .map_err(|_| corrupt("date", &record.attendance_date))?;
        let status: AttendanceStatus = AttendanceStatus::from_str(&record.attendance_status)
            .map_err(|_| corrupt("status", &record.attendance_status))?;
        let shifts: Decimal = Decimal::from_str(&record.overtime_shifts)
            .map_err(|_| corrupt("overtime", &record.overtime_shifts))?;
        if period.contains(date) {
            overtime.push(shifts);
        }
        entries.push((date, status));
    }
    let counts: AttendanceCounts = tally_attendance(period, entries)?;
    Ok((counts, checked_sum("overtime_shifts", overtime)?))
}

/// Records one attendance mark.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the status or date is
/// invalid, the employee does not exist, or the day is already marked.
pub fn mark_attendance(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: MarkAttendanceRequest,
) -> Result<AttendanceResponse, ApiError> {
    AuthorizationService::require_admin(actor, "mark_attendance")?;
    let attendance: AttendanceData = mark_one(persistence, actor, request)?;
    Ok(AttendanceResponse {
        message: format!(
            "Attendance marked {} for employee {} on {}",
            attendance.attendance_status, attendance.employee_id, attendance.attendance_date
        ),
        attendance,
    })
}

fn mark_one(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: MarkAttendanceRequest,
) -> Result<AttendanceData, ApiError> {
    let status: AttendanceStatus = AttendanceStatus::normalize(&request.attendance_status)?;
    let attendance_date: Date = parse_date_field("attendance_date", &request.attendance_date)?;
    let overtime_shifts: Decimal =
        resolve_overtime(request.overtime_shifts, request.overtime_hours)?.unwrap_or(Decimal::ZERO);
    require_employee(persistence, request.employee_id)?;

    let created: AttendanceData = persistence.mark_attendance(
        &NewAttendance {
            employee_id: request.employee_id,
            attendance_date,
            status,
            check_in_time: clean(request.check_in_time),
            check_out_time: clean(request.check_out_time),
            overtime_shifts,
            remarks: clean(request.remarks),
        },
        actor.to_audit_actor().label(),
    )?;
    record_audit(
        persistence,
        actor,
        "MarkAttendance",
        None,
        Target::new("attendance", created.attendance_id),
        None,
        Some(snapshot(&created)?),
    )?;
    Ok(created)
}

/// Marks many records; each succeeds or fails on its own.
///
/// # Errors
///
/// Returns an error only if the caller is not an admin.
pub fn bulk_mark_attendance(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: BulkMarkAttendanceRequest,
) -> Result<BulkMarkAttendanceResponse, ApiError> {
    AuthorizationService::require_admin(actor, "bulk_mark_attendance")?;

    let results: Vec<BulkAttendanceRowResult> = request
        .attendance_records
        .into_iter()
        .map(|row| {
            let employee_id: i64 = row.employee_id;
            let attendance_date: String = row.attendance_date.clone();
            match mark_one(persistence, actor, row) {
                Ok(attendance) => BulkAttendanceRowResult {
                    employee_id,
                    attendance_date,
                    success: true,
                    attendance: Some(attendance),
                    error: None,
                },
                Err(e) => BulkAttendanceRowResult {
                    employee_id,
                    attendance_date,
                    success: false,
                    attendance: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    let successful_count: usize = results.iter().filter(|r| r.success).count();
    info!(total = results.len(), successful_count, "Bulk attendance marked");

    Ok(BulkMarkAttendanceResponse {
        message: format!("Marked {successful_count} of {} records", results.len()),
        total_count: results.len(),
        successful_count,
        results,
    })
}

/// Corrects an existing record.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the record does not
/// exist, or a field is invalid.
pub fn update_attendance(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    attendance_id: i64,
    request: UpdateAttendanceRequest,
) -> Result<AttendanceResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_attendance")?;
    let not_found = || ApiError::ResourceNotFound {
        resource_type: String::from("Attendance"),
        message: format!("Attendance record {attendance_id} does not exist"),
    };
    let before: AttendanceData = persistence.get_attendance(attendance_id)?.ok_or_else(not_found)?;

    let update: AttendanceUpdate = AttendanceUpdate {
        status: clean(request.attendance_status)
            .map(|s| AttendanceStatus::normalize(&s))
            .transpose()?,
        check_in_time: clean(request.check_in_time),
        check_out_time: clean(request.check_out_time),
        overtime_shifts: resolve_overtime(request.overtime_shifts, request.overtime_hours)?,
        remarks: clean(request.remarks),
    };
    let after: AttendanceData = persistence
        .update_attendance(attendance_id, &update, actor.to_audit_actor().label())?
        .ok_or_else(not_found)?;

    record_audit(
        persistence,
        actor,
        "CorrectAttendance",
        None,
        Target::new("attendance", attendance_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;

    Ok(AttendanceResponse {
        message: format!("Attendance record {attendance_id} updated"),
        attendance: after,
    })
}

/// Lists one employee's attendance, optionally bounded by dates.
///
/// # Errors
///
/// Returns an error if an employee user asks for someone else's records,
/// a date is malformed, or the employee does not exist.
pub fn list_employee_attendance(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    employee_id: i64,
    query: &AttendanceRangeQuery,
) -> Result<AttendanceListResponse, ApiError> {
    AuthorizationService::require_admin_or_self(actor, employee_id, "list_employee_attendance")?;
    let from: Option<Date> = parse_optional_date("from", query.from.as_deref())?;
    let to: Option<Date> = parse_optional_date("to", query.to.as_deref())?;
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(ApiError::InvalidInput {
            field: String::from("from"),
            message: String::from("'from' must not be after 'to'"),
        });
    }
    require_employee(persistence, employee_id)?;

    let records: Vec<AttendanceData> = persistence.list_attendance_for_employee(employee_id, from, to)?;
    Ok(AttendanceListResponse {
        count: records.len(),
        records,
    })
}

/// Lists every record for one date.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the date is malformed.
pub fn list_attendance_for_date(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    date: &str,
) -> Result<AttendanceListResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_attendance_for_date")?;
    let date: Date = parse_date_field("date", date)?;
    let records: Vec<AttendanceData> = persistence.list_attendance_for_date(date)?;
    Ok(AttendanceListResponse {
        count: records.len(),
        records,
    })
}

/// Summarizes one employee's month. Days with no record count as absent.
///
/// # Errors
///
/// Returns an error if an employee user asks for someone else's summary,
/// the month is invalid, or the employee does not exist.
pub fn monthly_attendance_summary(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    employee_id: i64,
    query: MonthQuery,
) -> Result<MonthlyAttendanceSummary, ApiError> {
    AuthorizationService::require_admin_or_self(actor, employee_id, "monthly_attendance_summary")?;
    let period: PayrollMonth = PayrollMonth::new(query.year, query.month)?;
    let employee: EmployeeData = require_employee(persistence, employee_id)?;

    let records: Vec<AttendanceData> = persistence.list_attendance_for_month(employee_id, period)?;
    let (counts, total_overtime_shifts) = attendance_totals(period, &records)?;

    Ok(MonthlyAttendanceSummary {
        employee_id,
        employee_name: employee.full_name(),
        period: period.to_string(),
        days_in_month: counts.days_in_month,
        present_days: counts.present_days,
        absent_days: counts.absent_days,
        off_days: counts.off_days,
        unmarked_days: counts.unmarked_days,
        total_overtime_shifts,
        records,
    })
}
