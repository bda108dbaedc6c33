// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance queries.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::AttendanceData;
use crate::diesel_schema::attendance;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = attendance)]
struct AttendanceRow {
    attendance_id: i64,
    employee_id: i64,
    attendance_date: String,
    attendance_status: String,
    check_in_time: Option<String>,
    check_out_time: Option<String>,
    overtime_shifts: String,
    remarks: Option<String>,
    marked_by: String,
    created_at: String,
    updated_at: Option<String>,
    updated_by: Option<String>,
}

impl From<AttendanceRow> for AttendanceData {
    fn from(row: AttendanceRow) -> Self {
        Self {
            attendance_id: row.attendance_id,
            employee_id: row.employee_id,
            attendance_date: row.attendance_date,
            attendance_status: row.attendance_status,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            overtime_shifts: row.overtime_shifts,
            remarks: row.remarks,
            marked_by: row.marked_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        }
    }
}

backend_fn! {
/// Retrieves an attendance record by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_attendance(
    conn: &mut _,
    attendance_id: i64,
) -> Result<Option<AttendanceData>, PersistenceError> {
    let row: Option<AttendanceRow> = attendance::table
        .filter(attendance::attendance_id.eq(attendance_id))
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AttendanceData::from))
}
}

backend_fn! {
/// Retrieves the record for one employee on one date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_attendance(
    conn: &mut _,
    employee_id: i64,
    attendance_date: &str,
) -> Result<Option<AttendanceData>, PersistenceError> {
    let row: Option<AttendanceRow> = attendance::table
        .filter(attendance::employee_id.eq(employee_id))
        .filter(attendance::attendance_date.eq(attendance_date))
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AttendanceData::from))
}
}

backend_fn! {
/// Lists an employee's attendance in date order, optionally bounded.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `employee_id` - The employee
/// * `from` - Inclusive lower bound (`YYYY-MM-DD`)
/// * `to` - Inclusive upper bound (`YYYY-MM-DD`)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_attendance_for_employee(
    conn: &mut _,
    employee_id: i64,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<AttendanceData>, PersistenceError> {
    debug!(employee_id, ?from, ?to, "Listing attendance for employee");

    let mut query = attendance::table
        .filter(attendance::employee_id.eq(employee_id))
        .select(AttendanceRow::as_select())
        .order(attendance::attendance_date.asc())
        .into_boxed();
    if let Some(from) = from {
        query = query.filter(attendance::attendance_date.ge(from.to_string()));
    }
    if let Some(to) = to {
        query = query.filter(attendance::attendance_date.le(to.to_string()));
    }

    let rows: Vec<AttendanceRow> = query.load(conn)?;
    Ok(rows.into_iter().map(AttendanceData::from).collect())
}
}

backend_fn! {
/// Lists every attendance record for one date, ordered by employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_attendance_for_date(
    conn: &mut _,
    attendance_date: &str,
) -> Result<Vec<AttendanceData>, PersistenceError> {
    let rows: Vec<AttendanceRow> = attendance::table
        .filter(attendance::attendance_date.eq(attendance_date))
        .order(attendance::employee_id.asc())
        .select(AttendanceRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(AttendanceData::from).collect())
}
}
