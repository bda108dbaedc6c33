// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ems_audit::Target;
use ems_persistence::{DocumentData, NewDocument, Persistence};
use tracing::warn;

use super::{clean, record_audit, require_employee, snapshot};
use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{DocumentListResponse, DocumentResponse, UploadDocumentRequest};
use crate::storage::{DocumentStore, StoredFile};

/// Stores an uploaded document for an employee.
///
/// The file is written first and removed again if the record cannot be
/// saved, so no orphaned record points at a missing file.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the employee does not
/// exist, the document type is blank, or the file is empty, too large, or
/// of a disallowed type.
pub fn upload_document(
    persistence: &mut Persistence,
    store: &DocumentStore,
    actor: &AuthenticatedUser,
    employee_id: i64,
    request: UploadDocumentRequest,
) -> Result<DocumentResponse, ApiError> {
    AuthorizationService::require_admin(actor, "upload_document")?;
    let document_type: String = clean(Some(request.document_type)).ok_or_else(|| ApiError::InvalidInput {
        field: String::from("document_type"),
        message: String::from("document_type is required"),
    })?;
    require_employee(persistence, employee_id)?;

    let stored: StoredFile = store.store(employee_id, &request.original_filename, &request.content)?;
    let record: NewDocument = NewDocument {
        employee_id,
        document_type,
        original_filename: request.original_filename,
        stored_path: stored.path.to_string_lossy().into_owned(),
        content_type: clean(request.content_type),
        size_bytes: i64::try_from(stored.size_bytes).unwrap_or(i64::MAX),
    };

    let document: DocumentData = match persistence.create_document(&record, actor.to_audit_actor().label()) {
        Ok(document) => document,
        Err(e) => {
            if let Err(cleanup) = DocumentStore::remove(&stored.path) {
                warn!(path = %stored.path.display(), error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };
    record_audit(
        persistence,
        actor,
        "UploadDocument",
        Some(document.document_type.clone()),
        Target::new("document", document.document_id),
        None,
        Some(snapshot(&document)?),
    )?;

    Ok(DocumentResponse {
        message: format!("Document '{}' uploaded", document.original_filename),
        document,
    })
}

/// Lists an employee's documents.
///
/// # Errors
///
/// Returns an error if an employee user asks for someone else's documents
/// or the employee does not exist.
pub fn list_documents(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    employee_id: i64,
) -> Result<DocumentListResponse, ApiError> {
    AuthorizationService::require_admin_or_self(actor, employee_id, "list_documents")?;
    require_employee(persistence, employee_id)?;
    Ok(DocumentListResponse {
        documents: persistence.list_documents(employee_id)?,
    })
}
