// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers.
//!
//! Each handler extracts the caller and request, takes the persistence lock
//! and delegates to the matching `ems_api` function. Authorization and
//! validation live in the API layer; this module only adapts HTTP.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State as AxumState},
    http::StatusCode,
};
use ems_api::{
    AttendanceListResponse, AttendanceRangeQuery, AttendanceResponse, AuditListResponse, AuditQuery,
    BulkImportResponse, BulkMarkAttendanceRequest, BulkMarkAttendanceResponse, ChangePasswordRequest,
    CreateDeductionRequest, CreateDepartmentRequest, CreateEmployeeRequest, CreateHolidayRequest,
    CreateSiteRequest, CreateWageMasterRequest, CreatedResponse, CurrentUserResponse, DeductionListResponse,
    DeductionQuery, DeductionView, DepartmentListResponse, DocumentListResponse, DocumentResponse,
    EmployeeListQuery, EmployeeListResponse, EmployeeResponse, EmployeeSalary, HolidayListResponse,
    HolidayQuery, IndividualSalaryRequest, LoginRequest, LoginResponse, MarkAttendanceRequest,
    MessageResponse, MonthQuery, MonthlyAttendanceSummary, MonthlySalaryRequest, MonthlySalaryResponse,
    RegisterUserRequest, RegisterUserResponse, SetUserActiveRequest, SiteListResponse,
    UpdateAttendanceRequest, UpdateDeductionRequest, UpdateEmployeeRequest, UpdateWageMasterRequest,
    UploadDocumentRequest, UserInfo, UserListResponse, WageMasterListResponse, WageMasterQuery,
};
use ems_persistence::{DepartmentData, EmployeeData, SiteData, WageMasterData};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::AppState;
use crate::error::HttpError;
use crate::session::SessionUser;

type Created<T> = (StatusCode, Json<T>);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// A file part read from a multipart body.
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    content: Vec<u8>,
}

/// The `file` part and the `document_type` text field of an upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    document_type: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, HttpError> {
    let mut form: UploadForm = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let filename: String = field.file_name().unwrap_or_default().to_string();
                let content_type: Option<String> = field.content_type().map(str::to_string);
                let content: Vec<u8> = field.bytes().await?.to_vec();
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    content,
                });
            }
            Some("document_type") => form.document_type = Some(field.text().await?),
            other => debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }
    Ok(form)
}

fn require_file(form: &mut UploadForm) -> Result<UploadedFile, HttpError> {
    form.file
        .take()
        .filter(|file| !file.filename.is_empty())
        .ok_or_else(|| HttpError::bad_request("No file selected"))
}

// ============================================================================
// Health and authentication
// ============================================================================

pub async fn handle_health() -> Result<Json<HealthResponse>, HttpError> {
    let timestamp: String = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ems_api::ApiError::Internal {
            message: e.to_string(),
        })?;
    Ok(Json(HealthResponse {
        status: String::from("healthy"),
        timestamp,
    }))
}

/// Handler for POST `/api/auth/login`.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::login(&mut persistence, &app_state.tokens, &req)?))
}

/// Handler for POST `/api/auth/register`.
pub async fn handle_register_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<RegisterUserRequest>,
) -> Result<Created<RegisterUserResponse>, HttpError> {
    info!(actor = user.user_id, email = %req.email, "Handling register_user request");
    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterUserResponse = ems_api::register_user(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_current_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<CurrentUserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::current_user(&mut persistence, &user)?))
}

/// Handler for POST `/api/auth/logout`.
///
/// Tokens are stateless; the client discards its copy.
pub async fn handle_logout(SessionUser(user): SessionUser) -> Json<MessageResponse> {
    Json(ems_api::logout(&user))
}

pub async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(user_id = user.user_id, "Handling change_password request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::change_password(&mut persistence, &user, &req)?))
}

pub async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<UserListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_users(&mut persistence, &user)?))
}

pub async fn handle_set_user_active(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(user_id): Path<i64>,
    Json(req): Json<SetUserActiveRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(actor = user.user_id, user_id, is_active = req.is_active, "Handling set_user_active request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::set_user_active(&mut persistence, &user, user_id, req)?))
}

// ============================================================================
// Employees
// ============================================================================

pub async fn handle_list_employees(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Query(query): Query<EmployeeListQuery>,
) -> Result<Json<EmployeeListResponse>, HttpError> {
    debug!(?query, "Handling list_employees request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_employees(&mut persistence, &user, query)?))
}

pub async fn handle_create_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<Created<EmployeeResponse>, HttpError> {
    info!(actor = user.user_id, "Handling create_employee request");
    let mut persistence = app_state.persistence.lock().await;
    let response: EmployeeResponse = ems_api::create_employee(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/api/employees/bulk-upload`.
///
/// Expects a multipart body with the CSV in the `file` part.
pub async fn handle_bulk_upload(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    multipart: Multipart,
) -> Result<Json<BulkImportResponse>, HttpError> {
    let mut form: UploadForm = read_upload_form(multipart).await?;
    let file: UploadedFile = require_file(&mut form)?;
    info!(actor = user.user_id, filename = %file.filename, bytes = file.content.len(), "Handling bulk employee upload");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::bulk_import_employees(&mut persistence, &user, &file.content)?))
}

pub async fn handle_get_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
) -> Result<Json<EmployeeData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::get_employee(&mut persistence, &user, employee_id)?))
}

pub async fn handle_update_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    info!(actor = user.user_id, employee_id, "Handling update_employee request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::update_employee(&mut persistence, &user, employee_id, req)?))
}

/// Handler for DELETE `/api/employees/{id}`. Deactivates, never deletes.
pub async fn handle_deactivate_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    info!(actor = user.user_id, employee_id, "Handling deactivate_employee request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::deactivate_employee(&mut persistence, &user, employee_id)?))
}

// ============================================================================
// Reference data
// ============================================================================

pub async fn handle_list_departments(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_user): SessionUser,
) -> Result<Json<DepartmentListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_departments(&mut persistence)?))
}

pub async fn handle_create_department(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<Created<DepartmentData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let department: DepartmentData = ems_api::create_department(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn handle_get_department(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_user): SessionUser,
    Path(department_id): Path<i64>,
) -> Result<Json<DepartmentData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::get_department(&mut persistence, department_id)?))
}

pub async fn handle_list_sites(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_user): SessionUser,
) -> Result<Json<SiteListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_sites(&mut persistence)?))
}

pub async fn handle_create_site(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<CreateSiteRequest>,
) -> Result<Created<SiteData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let site: SiteData = ems_api::create_site(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(site)))
}

pub async fn handle_list_wage_masters(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Query(query): Query<WageMasterQuery>,
) -> Result<Json<WageMasterListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_wage_masters(&mut persistence, &user, query)?))
}

pub async fn handle_create_wage_master(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<CreateWageMasterRequest>,
) -> Result<Created<CreatedResponse>, HttpError> {
    info!(actor = user.user_id, salary_code = %req.salary_code, "Handling create_wage_master request");
    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = ems_api::create_wage_master(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_get_wage_master(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(wage_master_id): Path<i64>,
) -> Result<Json<WageMasterData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::get_wage_master(&mut persistence, &user, wage_master_id)?))
}

pub async fn handle_update_wage_master(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(wage_master_id): Path<i64>,
    Json(req): Json<UpdateWageMasterRequest>,
) -> Result<Json<WageMasterData>, HttpError> {
    info!(actor = user.user_id, wage_master_id, "Handling update_wage_master request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::update_wage_master(&mut persistence, &user, wage_master_id, req)?))
}

/// Handler for DELETE `/api/wage-masters/{id}`. Deactivates; nothing is
/// removed.
pub async fn handle_deactivate_wage_master(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(wage_master_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(actor = user.user_id, wage_master_id, "Handling deactivate_wage_master request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::deactivate_wage_master(&mut persistence, &user, wage_master_id)?))
}

pub async fn handle_list_holidays(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_user): SessionUser,
    Query(query): Query<HolidayQuery>,
) -> Result<Json<HolidayListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_holidays(&mut persistence, query)?))
}

pub async fn handle_create_holiday(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<CreateHolidayRequest>,
) -> Result<Created<CreatedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = ems_api::create_holiday(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

// ============================================================================
// Attendance
// ============================================================================

pub async fn handle_mark_attendance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<MarkAttendanceRequest>,
) -> Result<Created<AttendanceResponse>, HttpError> {
    info!(
        actor = user.user_id,
        employee_id = req.employee_id,
        date = %req.attendance_date,
        "Handling mark_attendance request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: AttendanceResponse = ems_api::mark_attendance(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_bulk_mark_attendance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<BulkMarkAttendanceRequest>,
) -> Result<Json<BulkMarkAttendanceResponse>, HttpError> {
    info!(actor = user.user_id, rows = req.attendance_records.len(), "Handling bulk_mark_attendance request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::bulk_mark_attendance(&mut persistence, &user, req)?))
}

pub async fn handle_update_attendance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceResponse>, HttpError> {
    info!(actor = user.user_id, attendance_id, "Handling update_attendance request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::update_attendance(&mut persistence, &user, attendance_id, req)?))
}

pub async fn handle_employee_attendance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<AttendanceRangeQuery>,
) -> Result<Json<AttendanceListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_employee_attendance(
        &mut persistence,
        &user,
        employee_id,
        &query,
    )?))
}

pub async fn handle_attendance_for_date(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(date): Path<String>,
) -> Result<Json<AttendanceListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_attendance_for_date(&mut persistence, &user, &date)?))
}

pub async fn handle_monthly_summary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyAttendanceSummary>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::monthly_attendance_summary(
        &mut persistence,
        &user,
        employee_id,
        query,
    )?))
}

// ============================================================================
// Salary and deductions
// ============================================================================

pub async fn handle_calculate_individual(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<IndividualSalaryRequest>,
) -> Result<Json<EmployeeSalary>, HttpError> {
    info!(
        actor = user.user_id,
        employee_id = req.employee_id,
        year = req.year,
        month = req.month,
        "Handling calculate_individual_salary request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::calculate_individual_salary(&mut persistence, &user, req)?))
}

pub async fn handle_calculate_monthly(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<MonthlySalaryRequest>,
) -> Result<Json<MonthlySalaryResponse>, HttpError> {
    info!(actor = user.user_id, year = req.year, month = req.month, "Handling calculate_monthly_salary request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::calculate_monthly_salary(&mut persistence, &user, req)?))
}

pub async fn handle_list_deductions(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Query(query): Query<DeductionQuery>,
) -> Result<Json<DeductionListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_deductions(&mut persistence, &user, query)?))
}

pub async fn handle_create_deduction(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Json(req): Json<CreateDeductionRequest>,
) -> Result<Created<DeductionView>, HttpError> {
    info!(actor = user.user_id, employee_id = req.employee_id, "Handling create_deduction request");
    let mut persistence = app_state.persistence.lock().await;
    let view: DeductionView = ems_api::create_deduction(&mut persistence, &user, req)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn handle_get_deduction(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(deduction_id): Path<i64>,
) -> Result<Json<DeductionView>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::get_deduction(&mut persistence, &user, deduction_id)?))
}

pub async fn handle_update_deduction(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(deduction_id): Path<i64>,
    Json(req): Json<UpdateDeductionRequest>,
) -> Result<Json<DeductionView>, HttpError> {
    info!(actor = user.user_id, deduction_id, "Handling update_deduction request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::update_deduction(&mut persistence, &user, deduction_id, req)?))
}

pub async fn handle_delete_deduction(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(deduction_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(actor = user.user_id, deduction_id, "Handling delete_deduction request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::delete_deduction(&mut persistence, &user, deduction_id)?))
}

// ============================================================================
// Documents and audit
// ============================================================================

/// Handler for POST `/api/employees/{id}/documents`.
///
/// Expects a multipart body with `file` and `document_type` parts.
pub async fn handle_upload_document(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
    multipart: Multipart,
) -> Result<Created<DocumentResponse>, HttpError> {
    let mut form: UploadForm = read_upload_form(multipart).await?;
    let file: UploadedFile = require_file(&mut form)?;
    info!(actor = user.user_id, employee_id, filename = %file.filename, "Handling document upload");

    let request: UploadDocumentRequest = UploadDocumentRequest {
        document_type: form.document_type.unwrap_or_default(),
        original_filename: file.filename,
        content_type: file.content_type,
        content: file.content,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response: DocumentResponse =
        ems_api::upload_document(&mut persistence, &app_state.documents, &user, employee_id, request)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_list_documents(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(employee_id): Path<i64>,
) -> Result<Json<DocumentListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_documents(&mut persistence, &user, employee_id)?))
}

pub async fn handle_list_audit(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(ems_api::list_audit_events(&mut persistence, &user, query)?))
}
