// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row counts for initialization status reports.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};

use crate::diesel_schema::{
    attendance, audit_events, deductions, departments, employee_documents, employees, holidays,
    sites, users, wage_masters,
};
use crate::error::PersistenceError;

backend_fn! {
/// Counts rows in every application table.
///
/// # Errors
///
/// Returns an error if any count query fails, which also happens when a
/// table is missing.
pub fn count_table_rows(conn: &mut _) -> Result<Vec<(String, i64)>, PersistenceError> {
    let counts: Vec<(String, i64)> = vec![
        (String::from("departments"), departments::table.count().get_result(conn)?),
        (String::from("sites"), sites::table.count().get_result(conn)?),
        (String::from("wage_masters"), wage_masters::table.count().get_result(conn)?),
        (String::from("holidays"), holidays::table.count().get_result(conn)?),
        (String::from("employees"), employees::table.count().get_result(conn)?),
        (String::from("attendance"), attendance::table.count().get_result(conn)?),
        (String::from("deductions"), deductions::table.count().get_result(conn)?),
        (
            String::from("employee_documents"),
            employee_documents::table.count().get_result(conn)?,
        ),
        (String::from("users"), users::table.count().get_result(conn)?),
        (String::from("audit_events"), audit_events::table.count().get_result(conn)?),
    ];
    Ok(counts)
}
}
