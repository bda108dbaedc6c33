// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee mutations.
//!
//! Employee ids come from the `id_sequences` row named `employee_id`.
//! The sequence is advanced inside the same transaction as the insert, so a
//! rejected insert (for example a duplicate phone number) rolls the
//! sequence back and no id is ever skipped or handed out twice.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use ems_domain::{EmploymentStatus, format_date};
use tracing::info;

use super::{flag, now_timestamp};
use crate::data_models::{EmployeeUpdate, NewEmployee};
use crate::diesel_schema::{employees, id_sequences};
use crate::error::PersistenceError;
use crate::queries::employees::EMPLOYEE_SEQUENCE;

#[derive(Insertable)]
#[diesel(table_name = employees)]
struct EmployeeInsert<'a> {
    employee_id: i64,
    first_name: &'a str,
    last_name: Option<&'a str>,
    father_name: Option<&'a str>,
    gender: Option<&'a str>,
    marital_status: Option<&'static str>,
    date_of_birth: Option<String>,
    email: Option<String>,
    phone: Option<&'a str>,
    adhar_number: Option<&'a str>,
    pan_number: Option<String>,
    address: Option<&'a str>,
    department_id: Option<i64>,
    site_id: Option<&'a str>,
    salary_code: Option<&'a str>,
    designation: Option<&'a str>,
    skill_category: Option<&'a str>,
    hire_date: String,
    employment_status: &'static str,
    pf_applicable: i32,
    esic_applicable: i32,
    created_at: &'a str,
    created_by: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = employees)]
struct EmployeeChangeset {
    first_name: Option<String>,
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
    hire_date: Option<String>,
    employment_status: Option<String>,
    pf_applicable: Option<i32>,
    esic_applicable: Option<i32>,
    updated_at: Option<String>,
    updated_by: Option<String>,
}

backend_fn! {
/// Creates the employee id sequence if it does not exist yet.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `base` - The first id to hand out
///
/// # Returns
///
/// `true` if the sequence was created, `false` if it already existed.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn ensure_employee_sequence(conn: &mut _, base: i64) -> Result<bool, PersistenceError> {
    let existing: Option<i64> = id_sequences::table
        .filter(id_sequences::sequence_name.eq(EMPLOYEE_SEQUENCE))
        .select(id_sequences::next_value)
        .first(conn)
        .optional()?;
    if existing.is_some() {
        return Ok(false);
    }

    diesel::insert_into(id_sequences::table)
        .values((
            id_sequences::sequence_name.eq(EMPLOYEE_SEQUENCE),
            id_sequences::next_value.eq(base),
        ))
        .execute(conn)?;

    info!(base, "Employee id sequence initialized");
    Ok(true)
}
}

backend_fn! {
/// Registers an employee under the next sequence id.
///
/// Email is lower-cased and PAN upper-cased before storage so that the
/// unique constraints catch differently-cased duplicates.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `employee` - The validated employee fields
/// * `hire_date` - Hire date to use when the request omits one
/// * `created_by` - Label of the acting user
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if an identification number
/// is already registered, `PersistenceError::ForeignKeyViolation` if the
/// department or site does not exist, or
/// `PersistenceError::InitializationError` if the sequence is missing.
pub fn create_employee(
    conn: &mut _,
    employee: &NewEmployee,
    hire_date: time::Date,
    created_by: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let next_value: i64 = diesel::update(
            id_sequences::table.filter(id_sequences::sequence_name.eq(EMPLOYEE_SEQUENCE)),
        )
        .set(id_sequences::next_value.eq(id_sequences::next_value + 1))
        .returning(id_sequences::next_value)
        .get_result(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::InitializationError(String::from(
                "Employee id sequence has not been initialized",
            ))
        })?;
        let employee_id: i64 = next_value - 1;

        let row: EmployeeInsert<'_> = EmployeeInsert {
            employee_id,
            first_name: employee.first_name.trim(),
            last_name: employee.last_name.as_deref(),
            father_name: employee.father_name.as_deref(),
            gender: employee.gender.as_deref(),
            marital_status: employee.marital_status.map(|m| m.as_str()),
            date_of_birth: employee.date_of_birth.map(format_date),
            email: employee.email.as_deref().map(|e| e.trim().to_lowercase()),
            phone: employee.phone.as_deref(),
            adhar_number: employee.adhar_number.as_deref(),
            pan_number: employee.pan_number.as_deref().map(|p| p.trim().to_uppercase()),
            address: employee.address.as_deref(),
            department_id: employee.department_id,
            site_id: employee.site_id.as_deref(),
            salary_code: employee.salary_code.as_deref(),
            designation: employee.designation.as_deref(),
            skill_category: employee.skill_category.as_deref(),
            hire_date: format_date(employee.hire_date.unwrap_or(hire_date)),
            employment_status: employee.employment_status.as_str(),
            pf_applicable: flag(employee.pf_applicable),
            esic_applicable: flag(employee.esic_applicable),
            created_at: &created_at,
            created_by,
        };

        diesel::insert_into(employees::table)
            .values(&row)
            .execute(conn)?;

        Ok(employee_id)
    })
    .inspect(|employee_id| info!(employee_id, "Employee registered"))
}
}

backend_fn! {
/// Applies a partial update to an employee.
///
/// # Returns
///
/// The number of rows updated (0 if the employee does not exist).
///
/// # Errors
///
/// Returns a constraint violation error if the new values collide with
/// another employee or reference a missing department or site.
pub fn update_employee(
    conn: &mut _,
    employee_id: i64,
    update: &EmployeeUpdate,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    let changes: EmployeeChangeset = EmployeeChangeset {
        first_name: update.first_name.as_deref().map(|s| s.trim().to_string()),
        last_name: update.last_name.clone(),
        father_name: update.father_name.clone(),
        gender: update.gender.clone(),
        marital_status: update.marital_status.map(|m| m.as_str().to_string()),
        date_of_birth: update.date_of_birth.map(format_date),
        email: update.email.as_deref().map(|e| e.trim().to_lowercase()),
        phone: update.phone.clone(),
        adhar_number: update.adhar_number.clone(),
        pan_number: update.pan_number.as_deref().map(|p| p.trim().to_uppercase()),
        address: update.address.clone(),
        department_id: update.department_id,
        site_id: update.site_id.clone(),
        salary_code: update.salary_code.clone(),
        designation: update.designation.clone(),
        skill_category: update.skill_category.clone(),
        hire_date: update.hire_date.map(format_date),
        employment_status: update.employment_status.map(|s| s.as_str().to_string()),
        pf_applicable: update.pf_applicable.map(flag),
        esic_applicable: update.esic_applicable.map(flag),
        updated_at: Some(now_timestamp()?),
        updated_by: Some(updated_by.to_string()),
    };

    let updated: usize = diesel::update(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .set(&changes)
        .execute(conn)?;

    info!(employee_id, updated, "Employee updated");
    Ok(updated)
}
}

backend_fn! {
/// Sets an employee's employment status. Used for deactivation, since
/// employees are never deleted.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn set_employment_status(
    conn: &mut _,
    employee_id: i64,
    status: EmploymentStatus,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    let updated_at: String = now_timestamp()?;
    let updated: usize = diesel::update(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .set((
            employees::employment_status.eq(status.as_str()),
            employees::updated_at.eq(Some(updated_at)),
            employees::updated_by.eq(Some(updated_by)),
        ))
        .execute(conn)?;

    info!(employee_id, status = status.as_str(), "Employment status changed");
    Ok(updated)
}
}
