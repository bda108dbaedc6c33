// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;

use super::{TestApp, assert_error, body_json, get_request};

const BOUNDARY: &str = "ems-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_request(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, filename, content) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_bulk_upload_reports_each_row() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let csv = b"Name,Department,Date of Joining\n\
                Asha Rao,IT,06/01/2025\n\
                ,IT,\n\
                Bala Iyer,Finance,2025-02-01\n";

    let response = app
        .send(multipart_request(
            "/api/employees/bulk-upload",
            &token,
            &[Part::File("file", "staff.csv", csv)],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["total_rows"], 3);
    assert_eq!(body["created_count"], 2);
    assert_eq!(body["rows"][1]["status"], "failed");
}

#[tokio::test]
async fn test_bulk_upload_without_file_is_bad_request() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .send(multipart_request(
            "/api/employees/bulk-upload",
            &token,
            &[Part::Text("note", "no file here")],
        ))
        .await;

    assert_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_document_upload_then_list() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let employee = app.create_employee("Asha").await;
    let uri = format!("/api/employees/{}/documents", employee.employee_id);

    let response = app
        .send(multipart_request(
            &uri,
            &token,
            &[
                Part::Text("document_type", "Aadhaar"),
                Part::File("file", "my aadhaar.pdf", b"%PDF-1.4 test"),
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = body_json(response).await;
    assert_eq!(body["document"]["document_type"], "Aadhaar");
    let stored_path = body["document"]["stored_path"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&stored_path).exists());

    let body: Value = body_json(app.send(get_request(&uri, Some(&token))).await).await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_document_with_disallowed_extension_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let employee = app.create_employee("Asha").await;

    let response = app
        .send(multipart_request(
            &format!("/api/employees/{}/documents", employee.employee_id),
            &token,
            &[
                Part::Text("document_type", "Script"),
                Part::File("file", "run.sh", b"#!/bin/sh"),
            ],
        ))
        .await;

    assert_error(response, StatusCode::BAD_REQUEST).await;
}
