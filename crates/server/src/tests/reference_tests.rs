// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};

use super::{TestApp, assert_error, body_json, get_request, json_request};

/// Creates site `S1` and a wage master for `SC-01`, returning its id.
async fn create_wage_master(app: &TestApp, token: &str) -> i64 {
    let response = app
        .send(json_request(
            "POST",
            "/api/sites",
            Some(token),
            &json!({"site_id": "S1", "site_name": "Main Plant"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = app
        .send(json_request(
            "POST",
            "/api/wage-masters",
            Some(token),
            &json!({
                "salary_code": "SC-01",
                "site_id": "S1",
                "rank": "Guard",
                "state": "Maharashtra",
                "skill_level": "Skilled",
                "daily_wage": "500",
                "effective_from": "2025-01-01",
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

fn delete_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_wage_master_update_then_deactivate() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let id = create_wage_master(&app, &token).await;
    let uri = format!("/api/wage-masters/{id}");

    let response = app
        .send(json_request("PUT", &uri, Some(&token), &json!({"daily_wage": "550"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["daily_wage"], "550");
    assert_eq!(body["is_active"], true);

    let response = app.send(delete_request(&uri, &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let message = assert_error(app.send(get_request(&uri, Some(&token))).await, StatusCode::NOT_FOUND).await;
    assert!(message.contains("Wage master"), "got {message}");
    assert_error(app.send(delete_request(&uri, &token)).await, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn test_salary_after_wage_master_deactivation_is_not_found() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let id = create_wage_master(&app, &token).await;
    let response = app
        .send(json_request(
            "POST",
            "/api/employees",
            Some(&token),
            &json!({"first_name": "Asha", "site_id": "S1", "salary_code": "SC-01"}),
        ))
        .await;
    let employee_id = body_json(response).await["employee"]["employee_id"]
        .as_i64()
        .unwrap();

    app.send(delete_request(&format!("/api/wage-masters/{id}"), &token))
        .await;
    let response = app
        .send(json_request(
            "POST",
            "/api/salary/calculate-individual",
            Some(&token),
            &json!({"employee_id": employee_id, "year": 2025, "month": 4}),
        ))
        .await;

    let message = assert_error(response, StatusCode::NOT_FOUND).await;
    assert!(message.contains("Wage master"), "got {message}");
}

#[tokio::test]
async fn test_deduction_can_be_rescheduled_over_http() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let employee = app.create_employee("Asha").await;
    let response = app
        .send(json_request(
            "POST",
            "/api/deductions",
            Some(&token),
            &json!({
                "employee_id": employee.employee_id,
                "deduction_type": "Loan",
                "total_amount": "1200",
                "months": 3,
                "start_month": "2025-01",
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let uri = format!(
        "/api/deductions/{}",
        body_json(response).await["deduction_id"].as_i64().unwrap()
    );

    let response = app
        .send(json_request("PUT", &uri, Some(&token), &json!({"months": 4})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["months"], 4);
    assert_eq!(body["end_month"], "2025-04");

    let response = app
        .send(json_request("PUT", &uri, Some(&token), &json!({"start_month": "2200-12"})))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_oversized_body_gets_json_envelope() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let padding = "x".repeat(ems_api::MAX_UPLOAD_BYTES + 1);

    let response = app
        .send(json_request(
            "POST",
            "/api/departments",
            Some(&token),
            &json!({"name": "Finance", "description": padding}),
        ))
        .await;

    assert_error(response, StatusCode::PAYLOAD_TOO_LARGE).await;
}

#[tokio::test]
async fn test_unparseable_json_gets_json_envelope() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/departments")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from("{\"name\":"))
        .unwrap();

    let response = app.send(request).await;

    assert!(response.status().is_client_error());
    let status = response.status();
    assert_error(response, status).await;
}
