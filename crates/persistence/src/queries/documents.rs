// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee document queries.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};

use crate::data_models::DocumentData;
use crate::diesel_schema::employee_documents;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = employee_documents)]
struct DocumentRow {
    document_id: i64,
    employee_id: i64,
    document_type: String,
    original_filename: String,
    stored_path: String,
    content_type: Option<String>,
    size_bytes: i64,
    uploaded_by: String,
    uploaded_at: String,
}

impl From<DocumentRow> for DocumentData {
    fn from(row: DocumentRow) -> Self {
        Self {
            document_id: row.document_id,
            employee_id: row.employee_id,
            document_type: row.document_type,
            original_filename: row.original_filename,
            stored_path: row.stored_path,
            content_type: row.content_type,
            size_bytes: row.size_bytes,
            uploaded_by: row.uploaded_by,
            uploaded_at: row.uploaded_at,
        }
    }
}

backend_fn! {
/// Lists an employee's documents, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_documents(conn: &mut _, employee_id: i64) -> Result<Vec<DocumentData>, PersistenceError> {
    let rows: Vec<DocumentRow> = employee_documents::table
        .filter(employee_documents::employee_id.eq(employee_id))
        .order(employee_documents::document_id.desc())
        .select(DocumentRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(DocumentData::from).collect())
}
}

backend_fn! {
/// Retrieves a document by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_document(conn: &mut _, document_id: i64) -> Result<Option<DocumentData>, PersistenceError> {
    let row: Option<DocumentRow> = employee_documents::table
        .filter(employee_documents::document_id.eq(document_id))
        .select(DocumentRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(DocumentData::from))
}
}
