// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for document storage and upload handlers.

use std::path::Path;

use crate::error::ApiError;
use crate::handlers::{list_documents, upload_document};
use crate::request_response::UploadDocumentRequest;
use crate::storage::{DocumentStore, MAX_UPLOAD_BYTES, StorageError, sanitize_filename};
use crate::tests::helpers::{
    create_test_admin, create_test_employee, create_test_employee_user, create_test_persistence,
};

fn upload(name: &str, content: &[u8]) -> UploadDocumentRequest {
    UploadDocumentRequest {
        document_type: String::from("Aadhaar Card"),
        original_filename: name.to_string(),
        content_type: Some(String::from("application/pdf")),
        content: content.to_vec(),
    }
}

#[test]
fn test_sanitize_strips_paths_and_odd_characters() {
    assert_eq!(sanitize_filename("../../etc/passwd.pdf").as_deref(), Some("passwd.pdf"));
    assert_eq!(sanitize_filename("C:\\docs\\my scan (1).png").as_deref(), Some("my_scan__1_.png"));
    assert_eq!(sanitize_filename("..."), None);
}

#[test]
fn test_check_rejects_empty_oversized_and_disallowed_files() {
    assert!(matches!(DocumentStore::check("a.pdf", b""), Err(StorageError::EmptyFile)));
    assert!(matches!(
        DocumentStore::check("a.exe", b"MZ"),
        Err(StorageError::DisallowedExtension(_))
    ));
    let oversized: Vec<u8> = vec![0; MAX_UPLOAD_BYTES + 1];
    assert!(matches!(
        DocumentStore::check("a.pdf", &oversized),
        Err(StorageError::TooLarge { .. })
    ));
    assert_eq!(DocumentStore::check("Scan.PDF", b"%PDF").unwrap(), "Scan.PDF");
}

#[test]
fn test_store_writes_under_employee_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path());

    let stored = store.store(91_510_001, "id card.pdf", b"%PDF-1.4").unwrap();

    assert!(stored.path.starts_with(dir.path().join("91510001")));
    let file_name = stored.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.ends_with("_id_card.pdf"));
    assert_eq!(std::fs::read(&stored.path).unwrap(), b"%PDF-1.4");
    assert_eq!(stored.size_bytes, 8);

    DocumentStore::remove(&stored.path).unwrap();
    assert!(!stored.path.exists());
    // Removing twice is not an error.
    DocumentStore::remove(&stored.path).unwrap();
}

#[test]
fn test_upload_records_metadata_and_lists_for_owner() {
    let mut persistence = create_test_persistence();
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path());
    let employee = create_test_employee(&mut persistence, "Asha");

    let response = upload_document(
        &mut persistence,
        &store,
        &create_test_admin(),
        employee.employee_id,
        upload("aadhaar.pdf", b"%PDF-1.4"),
    )
    .unwrap();

    assert_eq!(response.document.document_type, "Aadhaar Card");
    assert_eq!(response.document.size_bytes, 8);
    assert!(Path::new(&response.document.stored_path).exists());

    let owner = create_test_employee_user(employee.employee_id);
    let listed = list_documents(&mut persistence, &owner, employee.employee_id).unwrap();
    assert_eq!(listed.documents.len(), 1);
}

#[test]
fn test_upload_rejects_disallowed_type_without_writing() {
    let mut persistence = create_test_persistence();
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path());
    let employee = create_test_employee(&mut persistence, "Asha");

    let result = upload_document(
        &mut persistence,
        &store,
        &create_test_admin(),
        employee.employee_id,
        upload("script.sh", b"#!/bin/sh"),
    );

    match result.unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "file"),
        other => panic!("Expected InvalidInput error, got: {other:?}"),
    }
    assert!(!dir.path().join(employee.employee_id.to_string()).exists());
}

#[test]
fn test_employee_cannot_upload_or_list_others_documents() {
    let mut persistence = create_test_persistence();
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path());
    let own = create_test_employee(&mut persistence, "Asha");
    let other = create_test_employee(&mut persistence, "Bala");
    let user = create_test_employee_user(own.employee_id);

    assert!(matches!(
        upload_document(&mut persistence, &store, &user, own.employee_id, upload("a.pdf", b"%PDF")),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        list_documents(&mut persistence, &user, other.employee_id),
        Err(ApiError::Unauthorized { .. })
    ));
}
