// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod session;

#[cfg(test)]
mod tests;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ems_api::{
    DEFAULT_TOKEN_TTL_HOURS, DocumentStore, MAX_TOKEN_TTL_HOURS, MAX_UPLOAD_BYTES, TokenService,
};
use ems_persistence::{Persistence, SeedSummary};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use error::json_error_envelope;
use handlers::{
    handle_attendance_for_date, handle_bulk_mark_attendance, handle_bulk_upload,
    handle_calculate_individual, handle_calculate_monthly, handle_change_password,
    handle_create_deduction, handle_create_department, handle_create_employee,
    handle_create_holiday, handle_create_site, handle_create_wage_master, handle_current_user,
    handle_deactivate_employee, handle_deactivate_wage_master, handle_delete_deduction,
    handle_employee_attendance, handle_get_deduction, handle_get_department, handle_get_employee,
    handle_get_wage_master, handle_health, handle_list_audit, handle_list_deductions,
    handle_list_departments, handle_list_documents, handle_list_employees, handle_list_holidays,
    handle_list_sites, handle_list_users, handle_list_wage_masters, handle_login, handle_logout,
    handle_mark_attendance, handle_monthly_summary, handle_register_user,
    handle_set_user_active, handle_update_attendance, handle_update_deduction,
    handle_update_employee, handle_update_wage_master, handle_upload_document,
};

/// Signing secret used when none is configured. Only fit for development.
const DEV_SECRET: &str = "dev-secret";

/// Cap on any request body, multipart overhead included.
const MAX_REQUEST_BYTES: usize = MAX_UPLOAD_BYTES;

/// Employee Management System - HTTP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database URL. `postgres://` selects PostgreSQL; anything else is a
    /// `SQLite` path, and `:memory:` an in-memory database.
    #[arg(long, env = "DATABASE_URL", default_value = ":memory:")]
    database_url: String,

    /// Secret used to sign access tokens
    #[arg(long, env = "SECRET_KEY", default_value = DEV_SECRET, hide_env_values = true)]
    secret_key: String,

    /// Directory that receives uploaded employee documents
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads/employees")]
    uploads_dir: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    bind_address: IpAddr,

    /// Create the demo admin and employee accounts at startup
    #[arg(long, env = "SEED_DEMO")]
    seed_demo: bool,

    /// Access token lifetime in hours, at most one year
    #[arg(
        long,
        env = "TOKEN_TTL_HOURS",
        default_value_t = DEFAULT_TOKEN_TTL_HOURS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_HOURS)
    )]
    token_ttl_hours: i64,

    /// Comma-separated list of allowed CORS origins. Any origin when empty.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,
}

/// Application state shared across handlers.
///
/// The persistence adapter is not `Sync`, so every handler takes the mutex
/// for the duration of its database work.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    tokens: TokenService,
    documents: DocumentStore,
}

impl AppState {
    fn new(persistence: Persistence, tokens: TokenService, documents: DocumentStore) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            tokens,
            documents,
        }
    }
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/register", post(handle_register_user))
        .route("/api/auth/me", get(handle_current_user))
        .route("/api/auth/logout", post(handle_logout))
        .route("/api/auth/change-password", post(handle_change_password))
        .route("/api/auth/users", get(handle_list_users))
        .route("/api/auth/users/{id}/active", put(handle_set_user_active))
        .route(
            "/api/employees",
            get(handle_list_employees).post(handle_create_employee),
        )
        .route("/api/employees/bulk-upload", post(handle_bulk_upload))
        .route(
            "/api/employees/{id}",
            get(handle_get_employee)
                .put(handle_update_employee)
                .delete(handle_deactivate_employee),
        )
        .route(
            "/api/employees/{id}/documents",
            get(handle_list_documents).post(handle_upload_document),
        )
        .route(
            "/api/departments",
            get(handle_list_departments).post(handle_create_department),
        )
        .route("/api/departments/{id}", get(handle_get_department))
        .route("/api/sites", get(handle_list_sites).post(handle_create_site))
        .route(
            "/api/wage-masters",
            get(handle_list_wage_masters).post(handle_create_wage_master),
        )
        .route(
            "/api/wage-masters/{id}",
            get(handle_get_wage_master)
                .put(handle_update_wage_master)
                .delete(handle_deactivate_wage_master),
        )
        .route(
            "/api/holidays",
            get(handle_list_holidays).post(handle_create_holiday),
        )
        .route("/api/attendance/mark", post(handle_mark_attendance))
        .route("/api/attendance/bulk-mark", post(handle_bulk_mark_attendance))
        .route("/api/attendance/{id}", put(handle_update_attendance))
        .route("/api/attendance/employee/{id}", get(handle_employee_attendance))
        .route("/api/attendance/date/{date}", get(handle_attendance_for_date))
        .route(
            "/api/attendance/monthly-summary/{id}",
            get(handle_monthly_summary),
        )
        .route(
            "/api/salary/calculate-individual",
            post(handle_calculate_individual),
        )
        .route("/api/salary/calculate-monthly", post(handle_calculate_monthly))
        .route(
            "/api/deductions",
            get(handle_list_deductions).post(handle_create_deduction),
        )
        .route(
            "/api/deductions/{id}",
            get(handle_get_deduction)
                .put(handle_update_deduction)
                .delete(handle_delete_deduction),
        )
        .route("/api/audit", get(handle_list_audit))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(middleware::from_fn(json_error_envelope))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Builds the CORS layer from the configured origins.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();
    let allow_origin: AllowOrigin = if origins.is_empty() || origins.contains(&"*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).wrap_err_with(|| format!("Invalid CORS origin '{o}'"))
            })
            .collect::<Result<_>>()?;
        AllowOrigin::list(values)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

fn open_database(args: &Args) -> Result<Persistence> {
    let mut persistence: Persistence = Persistence::connect(&args.database_url)
        .wrap_err("Failed to open the database")?;

    let summary: SeedSummary = persistence
        .seed_reference_data(OffsetDateTime::now_utc().year())
        .wrap_err("Failed to seed reference data")?;
    info!(
        departments = summary.departments_created,
        holidays = summary.holidays_created,
        "Reference data ready"
    );

    if args.seed_demo {
        let created: usize = persistence
            .seed_demo_data()
            .wrap_err("Failed to seed demo accounts")?;
        info!(created, "Demo accounts ready");
    }
    Ok(persistence)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Employee Management System server");
    if args.secret_key == DEV_SECRET {
        warn!("SECRET_KEY is not set; tokens are signed with the development secret");
    }

    let persistence: Persistence = open_database(&args)?;

    std::fs::create_dir_all(&args.uploads_dir).wrap_err_with(|| {
        format!(
            "Failed to create uploads directory {}",
            args.uploads_dir.display()
        )
    })?;

    let app_state: AppState = AppState::new(
        persistence,
        TokenService::new(&args.secret_key, args.token_ttl_hours),
        DocumentStore::new(args.uploads_dir.clone()),
    );
    let app: Router = build_router(app_state).layer(cors_layer(&args.cors_origins)?);

    let addr: SocketAddr = SocketAddr::new(args.bind_address, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
