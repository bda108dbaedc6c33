// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use ems_domain::{EMPLOYEE_ID_BASE, Role};
use serde_json::{Value, json};

use super::{TestApp, assert_error, body_json, get_request, json_request};

#[tokio::test]
async fn test_created_employee_ids_follow_the_sequence() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let mut ids: Vec<i64> = Vec::new();
    for name in ["Asha", "Bala"] {
        let response = app
            .send(json_request(
                "POST",
                "/api/employees",
                Some(&token),
                &json!({"first_name": name}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = body_json(response).await;
        ids.push(body["employee"]["employee_id"].as_i64().unwrap());
    }

    assert_eq!(ids, vec![EMPLOYEE_ID_BASE, EMPLOYEE_ID_BASE + 1]);
}

#[tokio::test]
async fn test_invalid_identity_is_bad_request() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/api/employees",
            Some(&token),
            &json!({"first_name": "Asha", "adhar_number": "1234"}),
        ))
        .await;

    let message = assert_error(response, StatusCode::BAD_REQUEST).await;
    assert!(message.contains("adhar_number"));
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let body = json!({"first_name": "Asha", "email": "asha@example.com"});

    let first = app
        .send(json_request("POST", "/api/employees", Some(&token), &body))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = app
        .send(json_request("POST", "/api/employees", Some(&token), &body))
        .await;

    assert_error(second, StatusCode::CONFLICT).await;
}

#[tokio::test]
async fn test_employee_sees_only_own_record() {
    let app = TestApp::new();
    let own = app.create_employee("Asha").await;
    let other = app.create_employee("Bala").await;
    let user = app
        .create_user("asha@example.com", "Asha@1234", Role::Employee, Some(own.employee_id))
        .await;
    let token = app.token_for(&user);

    let response = app
        .send(get_request(&format!("/api/employees/{}", own.employee_id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get_request(&format!("/api/employees/{}", other.employee_id), Some(&token)))
        .await;
    assert_error(response, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn test_unknown_employee_is_not_found() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .send(get_request("/api/employees/12345", Some(&token)))
        .await;

    assert_error(response, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn test_delete_deactivates() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let employee = app.create_employee("Asha").await;
    let uri = format!("/api/employees/{}", employee.employee_id);

    let response = app
        .send(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(&uri)
                .header("authorization", format!("Bearer {token}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = body_json(app.send(get_request(&uri, Some(&token))).await).await;
    assert_eq!(body["employment_status"], "Inactive");
}

#[tokio::test]
async fn test_list_employees_paginates_and_filters() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    for name in ["Asha", "Bala", "Chitra"] {
        app.create_employee(name).await;
    }

    let response = app
        .send(get_request("/api/employees?page=2&per_page=2", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["employees"].as_array().unwrap().len(), 1);

    let body: Value = body_json(
        app.send(get_request("/api/employees?search=bal", Some(&token)))
            .await,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["employees"][0]["first_name"], "Bala");
}

#[tokio::test]
async fn test_departments_are_seeded_and_readable_by_any_user() {
    let app = TestApp::new();
    let employee = app.create_employee("Asha").await;
    let user = app
        .create_user("asha@example.com", "Asha@1234", Role::Employee, Some(employee.employee_id))
        .await;

    let response = app
        .send(get_request("/api/departments", Some(&app.token_for(&user))))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    let names: Vec<&str> = body["departments"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert!(names.contains(&"IT"));
    assert!(names.contains(&"Customer Support"));
}

#[tokio::test]
async fn test_audit_log_records_registration_for_admins_only() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let response = app
        .send(json_request(
            "POST",
            "/api/employees",
            Some(&token),
            &json!({"first_name": "Asha"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.send(get_request("/api/audit?limit=10", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    let events = body["events"].as_array().unwrap();
    assert!(events.iter().any(|e| {
        e["action"] == "RegisterEmployee" && e["target"] == format!("employee:{EMPLOYEE_ID_BASE}")
    }));

    let worker = app.create_employee("Bala").await;
    let user = app
        .create_user("bala@example.com", "Secret123", Role::Employee, Some(worker.employee_id))
        .await;
    let response = app
        .send(get_request("/api/audit", Some(&app.token_for(&user))))
        .await;
    assert_error(response, StatusCode::FORBIDDEN).await;
}
