// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance mutations.
//!
//! Only values of `AttendanceStatus` reach these functions, so legacy
//! spellings are already normalized. The `(employee_id, attendance_date)`
//! unique constraint rejects a second record for the same day.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use ems_domain::format_date;
use tracing::info;

use super::now_timestamp;
use crate::data_models::{AttendanceUpdate, NewAttendance};
use crate::diesel_schema::attendance;
use crate::error::PersistenceError;

#[derive(AsChangeset)]
#[diesel(table_name = attendance)]
struct AttendanceChangeset {
    attendance_status: Option<&'static str>,
    check_in_time: Option<String>,
    check_out_time: Option<String>,
    overtime_shifts: Option<String>,
    remarks: Option<String>,
    updated_at: Option<String>,
    updated_by: Option<String>,
}

backend_fn! {
/// Inserts an attendance record.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `record` - The normalized record
/// * `marked_by` - Label of the acting user
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the employee already has
/// a record for that date, or `PersistenceError::ForeignKeyViolation` if
/// the employee does not exist.
pub fn mark_attendance(
    conn: &mut _,
    record: &NewAttendance,
    marked_by: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let attendance_date: String = format_date(record.attendance_date);

    let attendance_id: i64 = diesel::insert_into(attendance::table)
        .values((
            attendance::employee_id.eq(record.employee_id),
            attendance::attendance_date.eq(&attendance_date),
            attendance::attendance_status.eq(record.status.as_str()),
            attendance::check_in_time.eq(record.check_in_time.as_deref()),
            attendance::check_out_time.eq(record.check_out_time.as_deref()),
            attendance::overtime_shifts.eq(record.overtime_shifts.to_string()),
            attendance::remarks.eq(record.remarks.as_deref()),
            attendance::marked_by.eq(marked_by),
            attendance::created_at.eq(&created_at),
        ))
        .returning(attendance::attendance_id)
        .get_result(conn)?;

    info!(
        attendance_id,
        employee_id = record.employee_id,
        date = %attendance_date,
        status = record.status.as_str(),
        "Attendance marked"
    );
    Ok(attendance_id)
}
}

backend_fn! {
/// Corrects an existing attendance record.
///
/// # Returns
///
/// The number of rows updated (0 if the record does not exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_attendance(
    conn: &mut _,
    attendance_id: i64,
    update: &AttendanceUpdate,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    let changes: AttendanceChangeset = AttendanceChangeset {
        attendance_status: update.status.map(|s| s.as_str()),
        check_in_time: update.check_in_time.clone(),
        check_out_time: update.check_out_time.clone(),
        overtime_shifts: update.overtime_shifts.map(|o| o.to_string()),
        remarks: update.remarks.clone(),
        updated_at: Some(now_timestamp()?),
        updated_by: Some(updated_by.to_string()),
    };

    let updated: usize = diesel::update(attendance::table)
        .filter(attendance::attendance_id.eq(attendance_id))
        .set(&changes)
        .execute(conn)?;

    info!(attendance_id, updated, "Attendance corrected");
    Ok(updated)
}
}
