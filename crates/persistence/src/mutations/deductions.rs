// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installment deduction mutations.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::info;

use super::now_timestamp;
use crate::data_models::{DeductionUpdate, NewDeduction};
use crate::diesel_schema::deductions;
use crate::error::PersistenceError;

#[derive(AsChangeset)]
#[diesel(table_name = deductions)]
struct DeductionChangeset {
    deduction_type: Option<String>,
    total_amount: Option<String>,
    months: Option<i32>,
    start_month: Option<String>,
}

backend_fn! {
/// Records a deduction to be recovered in monthly installments.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the employee does not
/// exist, or `PersistenceError::CheckViolation` if `months` is not positive.
pub fn create_deduction(
    conn: &mut _,
    deduction: &NewDeduction,
    created_by: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let deduction_id: i64 = diesel::insert_into(deductions::table)
        .values((
            deductions::employee_id.eq(deduction.employee_id),
            deductions::deduction_type.eq(&deduction.deduction_type),
            deductions::total_amount.eq(deduction.total_amount.to_string()),
            deductions::months.eq(deduction.months),
            deductions::start_month.eq(deduction.start_month.to_string()),
            deductions::created_at.eq(&created_at),
            deductions::created_by.eq(created_by),
        ))
        .returning(deductions::deduction_id)
        .get_result(conn)?;

    info!(deduction_id, employee_id = deduction.employee_id, "Deduction created");
    Ok(deduction_id)
}
}

backend_fn! {
/// Reschedules a deduction.
///
/// # Returns
///
/// The number of rows updated (0 if the deduction does not exist).
///
/// # Errors
///
/// Returns an error if the database update fails. `update` must not be
/// empty.
pub fn update_deduction(
    conn: &mut _,
    deduction_id: i64,
    update: &DeductionUpdate,
) -> Result<usize, PersistenceError> {
    let changes: DeductionChangeset = DeductionChangeset {
        deduction_type: update.deduction_type.clone(),
        total_amount: update.total_amount.map(|a| a.to_string()),
        months: update.months,
        start_month: update.start_month.map(|m| m.to_string()),
    };
    let updated: usize = diesel::update(deductions::table)
        .filter(deductions::deduction_id.eq(deduction_id))
        .set(&changes)
        .execute(conn)?;
    info!(deduction_id, updated, "Deduction updated");
    Ok(updated)
}
}

backend_fn! {
/// Deletes a deduction.
///
/// # Returns
///
/// The number of rows deleted.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_deduction(conn: &mut _, deduction_id: i64) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(deductions::table)
        .filter(deductions::deduction_id.eq(deduction_id))
        .execute(conn)?;
    info!(deduction_id, deleted, "Deduction deleted");
    Ok(deleted)
}
}
