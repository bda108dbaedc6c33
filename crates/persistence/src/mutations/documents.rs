// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee document mutations.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::info;

use super::now_timestamp;
use crate::data_models::NewDocument;
use crate::diesel_schema::employee_documents;
use crate::error::PersistenceError;

backend_fn! {
/// Records metadata for a stored document.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the employee does not
/// exist.
pub fn create_document(
    conn: &mut _,
    document: &NewDocument,
    uploaded_by: &str,
) -> Result<i64, PersistenceError> {
    let uploaded_at: String = now_timestamp()?;
    let document_id: i64 = diesel::insert_into(employee_documents::table)
        .values((
            employee_documents::employee_id.eq(document.employee_id),
            employee_documents::document_type.eq(&document.document_type),
            employee_documents::original_filename.eq(&document.original_filename),
            employee_documents::stored_path.eq(&document.stored_path),
            employee_documents::content_type.eq(document.content_type.as_deref()),
            employee_documents::size_bytes.eq(document.size_bytes),
            employee_documents::uploaded_by.eq(uploaded_by),
            employee_documents::uploaded_at.eq(&uploaded_at),
        ))
        .returning(employee_documents::document_id)
        .get_result(conn)?;

    info!(document_id, employee_id = document.employee_id, "Document recorded");
    Ok(document_id)
}
}
