// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod employee_tests;
mod reference_tests;
mod upload_tests;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use ems_api::{AuthenticatedUser, DocumentStore, TokenService};
use ems_domain::Role;
use ems_persistence::{EmployeeData, NewEmployee, NewUser, Persistence, UserData};
use serde::Serialize;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, build_router};

const TEST_SECRET: &str = "server-test-secret";

/// A router over an in-memory database and a scratch uploads directory.
struct TestApp {
    state: AppState,
    router: Router,
    _uploads: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let mut persistence = Persistence::new_in_memory().expect("in-memory persistence");
        persistence.seed_reference_data(2025).expect("reference data");
        let uploads = TempDir::new().expect("temp dir");
        let state = AppState::new(
            persistence,
            TokenService::new(TEST_SECRET, 1),
            DocumentStore::new(uploads.path()),
        );
        Self {
            router: build_router(state.clone()),
            state,
            _uploads: uploads,
        }
    }

    async fn create_user(&self, email: &str, password: &str, role: Role, employee_id: Option<i64>) -> UserData {
        let mut persistence = self.state.persistence.lock().await;
        persistence
            .create_user(
                &NewUser {
                    email: email.to_string(),
                    password: password.to_string(),
                    name: String::from("Test User"),
                    role,
                    employee_id,
                },
                "test",
            )
            .unwrap()
    }

    async fn create_employee(&self, first_name: &str) -> EmployeeData {
        let mut persistence = self.state.persistence.lock().await;
        persistence
            .create_employee(
                &NewEmployee {
                    first_name: first_name.to_string(),
                    ..NewEmployee::default()
                },
                "test",
            )
            .unwrap()
    }

    fn token_for(&self, user: &UserData) -> String {
        let authenticated = AuthenticatedUser::from_record(user).unwrap();
        self.state.tokens.issue(&authenticated).unwrap()
    }

    async fn admin_token(&self) -> String {
        let admin = self
            .create_user("admin@example.com", "Admin@123", Role::Admin, None)
            .await;
        self.token_for(&admin)
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn json_request<T: Serialize>(method: &str, uri: &str, token: Option<&str>, body: &T) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the status and the `{"error": true, "message": ...}` envelope.
async fn assert_error(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let body: Value = body_json(response).await;
    assert_eq!(body["error"], Value::Bool(true));
    body["message"].as_str().unwrap().to_string()
}
