// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee queries.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{EmployeeData, EmployeeFilter};
use crate::diesel_schema::{employees, id_sequences};
use crate::error::PersistenceError;

/// Name of the sequence row that hands out employee ids.
pub const EMPLOYEE_SEQUENCE: &str = "employee_id";

#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    first_name: String,
    last_name: Option<String>,
    father_name: Option<String>,
    gender: Option<String>,
    marital_status: Option<String>,
    date_of_birth: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    adhar_number: Option<String>,
    pan_number: Option<String>,
    address: Option<String>,
    department_id: Option<i64>,
    site_id: Option<String>,
    salary_code: Option<String>,
    designation: Option<String>,
    skill_category: Option<String>,
    hire_date: String,
    employment_status: String,
    pf_applicable: i32,
    esic_applicable: i32,
    created_at: String,
    created_by: String,
    updated_at: Option<String>,
    updated_by: Option<String>,
}

impl From<EmployeeRow> for EmployeeData {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            father_name: row.father_name,
            gender: row.gender,
            marital_status: row.marital_status,
            date_of_birth: row.date_of_birth,
            email: row.email,
            phone: row.phone,
            adhar_number: row.adhar_number,
            pan_number: row.pan_number,
            address: row.address,
            department_id: row.department_id,
            site_id: row.site_id,
            salary_code: row.salary_code,
            designation: row.designation,
            skill_category: row.skill_category,
            hire_date: row.hire_date,
            employment_status: row.employment_status,
            pf_applicable: row.pf_applicable != 0,
            esic_applicable: row.esic_applicable != 0,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        }
    }
}

/// Whether an employee matches a free-text search term.
///
/// `needle` must already be lower-cased.
fn matches_search(employee: &EmployeeData, needle: &str) -> bool {
    let haystacks: [Option<&str>; 5] = [
        Some(employee.first_name.as_str()),
        employee.last_name.as_deref(),
        employee.email.as_deref(),
        employee.phone.as_deref(),
        employee.designation.as_deref(),
    ];
    employee.employee_id.to_string().contains(needle)
        || employee.full_name().to_lowercase().contains(needle)
        || haystacks
            .iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(needle))
}

backend_fn! {
/// Retrieves an employee by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the employee does not exist.
pub fn get_employee(conn: &mut _, employee_id: i64) -> Result<Option<EmployeeData>, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    let row: Option<EmployeeRow> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(EmployeeData::from))
}
}

backend_fn! {
/// Lists employees matching a filter, ordered by id.
///
/// Department and status filters run in SQL. The free-text search runs
/// in Rust so that matching is case-insensitive on every backend.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - Department, status and search constraints
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(
    conn: &mut _,
    filter: &EmployeeFilter,
) -> Result<Vec<EmployeeData>, PersistenceError> {
    let mut query = employees::table
        .select(EmployeeRow::as_select())
        .order(employees::employee_id.asc())
        .into_boxed();
    if let Some(department_id) = filter.department_id {
        query = query.filter(employees::department_id.eq(department_id));
    }
    if let Some(status) = filter.employment_status {
        query = query.filter(employees::employment_status.eq(status.as_str()));
    }

    let rows: Vec<EmployeeRow> = query.load(conn)?;
    let employees: Vec<EmployeeData> = rows.into_iter().map(EmployeeData::from).collect();

    let needle: Option<String> = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    Ok(match needle {
        Some(needle) => employees
            .into_iter()
            .filter(|e| matches_search(e, &needle))
            .collect(),
        None => employees,
    })
}
}

backend_fn! {
/// Returns the id the next registered employee will receive.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the sequence has not been initialized.
pub fn peek_next_employee_id(conn: &mut _) -> Result<Option<i64>, PersistenceError> {
    let next: Option<i64> = id_sequences::table
        .filter(id_sequences::sequence_name.eq(EMPLOYEE_SEQUENCE))
        .select(id_sequences::next_value)
        .first(conn)
        .optional()?;
    Ok(next)
}
}
