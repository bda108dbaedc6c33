// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installment deduction queries.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};

use crate::data_models::DeductionData;
use crate::diesel_schema::deductions;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = deductions)]
struct DeductionRow {
    deduction_id: i64,
    employee_id: i64,
    deduction_type: String,
    total_amount: String,
    months: i32,
    start_month: String,
    created_at: String,
    created_by: String,
}

impl From<DeductionRow> for DeductionData {
    fn from(row: DeductionRow) -> Self {
        Self {
            deduction_id: row.deduction_id,
            employee_id: row.employee_id,
            deduction_type: row.deduction_type,
            total_amount: row.total_amount,
            months: row.months,
            start_month: row.start_month,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

backend_fn! {
/// Retrieves a deduction by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_deduction(
    conn: &mut _,
    deduction_id: i64,
) -> Result<Option<DeductionData>, PersistenceError> {
    let row: Option<DeductionRow> = deductions::table
        .filter(deductions::deduction_id.eq(deduction_id))
        .select(DeductionRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(DeductionData::from))
}
}

backend_fn! {
/// Lists deductions, optionally for a single employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_deductions(
    conn: &mut _,
    employee_id: Option<i64>,
) -> Result<Vec<DeductionData>, PersistenceError> {
    let mut query = deductions::table
        .select(DeductionRow::as_select())
        .order(deductions::deduction_id.asc())
        .into_boxed();
    if let Some(employee_id) = employee_id {
        query = query.filter(deductions::employee_id.eq(employee_id));
    }
    let rows: Vec<DeductionRow> = query.load(conn)?;
    Ok(rows.into_iter().map(DeductionData::from).collect())
}
}
