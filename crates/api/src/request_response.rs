// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw strings for dates and enumerations; handlers parse
//! them into domain types so that a bad value is reported against its
//! field. Responses reuse the persistence read models where those already
//! have the right shape.

use std::collections::BTreeMap;

use ems_domain::{PayrollAdjustments, PayrollBreakdown};
use ems_persistence::{
    AttendanceData, AuditEventData, DeductionData, DepartmentData, DocumentData, EmployeeData,
    HolidayData, SiteData, UserData, WageMasterData,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::capabilities::Capabilities;

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user account without its credential fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub employee_id: Option<i64>,
    pub is_active: bool,
    pub last_login_at: Option<String>,
}

impl From<&UserData> for UserInfo {
    fn from(user: &UserData) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            employee_id: user.employee_id,
            is_active: user.is_active,
            last_login_at: user.last_login_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Registration of a new login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    /// `admin` or `employee`; defaults to `employee`.
    #[serde(default)]
    pub role: Option<String>,
    /// Employee record to link, required for employee accounts.
    #[serde(default)]
    pub employee_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub message: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetUserActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: UserInfo,
    pub capabilities: Capabilities,
}

// ============================================================================
// Employees
// ============================================================================

/// Fields for a new employee. Only `first_name` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub adhar_number: Option<String>,
    pub pan_number: Option<String>,
    pub address: Option<String>,
    pub department_id: Option<i64>,
    pub site_id: Option<String>,
    pub salary_code: Option<String>,
    pub designation: Option<String>,
    pub skill_category: Option<String>,
    pub hire_date: Option<String>,
    pub employment_status: Option<String>,
    pub pf_applicable: Option<bool>,
    pub esic_applicable: Option<bool>,
}

/// A partial employee update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub adhar_number: Option<String>,
    pub pan_number: Option<String>,
    pub address: Option<String>,
    pub department_id: Option<i64>,
    pub site_id: Option<String>,
    pub salary_code: Option<String>,
    pub designation: Option<String>,
    pub skill_category: Option<String>,
    pub hire_date: Option<String>,
    pub employment_status: Option<String>,
    pub pf_applicable: Option<bool>,
    pub esic_applicable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeListQuery {
    pub search: Option<String>,
    pub department_id: Option<i64>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<EmployeeData>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub message: String,
    pub employee: EmployeeData,
}

/// Outcome of one CSV row in a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Created,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowResult {
    /// 1-based, not counting the header.
    pub row_number: usize,
    pub status: RowStatus,
    pub employee_id: Option<i64>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportResponse {
    pub message: String,
    pub total_rows: usize,
    pub created_count: usize,
    pub failed_count: usize,
    pub rows: Vec<ImportRowResult>,
}

// ============================================================================
// Reference data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentListResponse {
    pub departments: Vec<DepartmentData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSiteRequest {
    pub site_id: String,
    pub site_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteListResponse {
    pub sites: Vec<SiteData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWageMasterRequest {
    pub salary_code: String,
    pub site_id: String,
    pub rank: String,
    pub state: String,
    pub skill_level: String,
    pub daily_wage: Decimal,
    pub effective_from: String,
    #[serde(default)]
    pub effective_to: Option<String>,
}

/// Changes to an active wage master; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateWageMasterRequest {
    pub rank: Option<String>,
    pub state: Option<String>,
    pub skill_level: Option<String>,
    pub daily_wage: Option<Decimal>,
    pub effective_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageMasterQuery {
    pub salary_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageMasterListResponse {
    pub wage_masters: Vec<WageMasterData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHolidayRequest {
    pub name: String,
    pub holiday_date: String,
    /// National, Regional, Company or Optional; defaults to National.
    #[serde(default)]
    pub holiday_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayListResponse {
    pub holidays: Vec<HolidayData>,
}

/// A created record identified by a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

// ============================================================================
// Attendance
// ============================================================================

/// One attendance mark.
///
/// `attendance_status` accepts the legacy spellings (`P`, `Late`,
/// `Half Day`, ...) and is stored in canonical form. Overtime may be given
/// in shifts or, for older clients, in hours (8 hours per shift, rounded
/// to the nearest half shift).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub employee_id: i64,
    pub attendance_date: String,
    pub attendance_status: String,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub overtime_shifts: Option<Decimal>,
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMarkAttendanceRequest {
    pub attendance_records: Vec<MarkAttendanceRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub message: String,
    pub attendance: AttendanceData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAttendanceRowResult {
    pub employee_id: i64,
    pub attendance_date: String,
    pub success: bool,
    pub attendance: Option<AttendanceData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMarkAttendanceResponse {
    pub message: String,
    pub total_count: usize,
    pub successful_count: usize,
    pub results: Vec<BulkAttendanceRowResult>,
}

/// A correction; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateAttendanceRequest {
    pub attendance_status: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub overtime_shifts: Option<Decimal>,
    pub overtime_hours: Option<Decimal>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceData>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAttendanceSummary {
    pub employee_id: i64,
    pub employee_name: String,
    pub period: String,
    pub days_in_month: u32,
    pub present_days: u32,
    /// Includes unmarked days.
    pub absent_days: u32,
    pub off_days: u32,
    pub unmarked_days: u32,
    pub total_overtime_shifts: Decimal,
    pub records: Vec<AttendanceData>,
}

// ============================================================================
// Salary
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualSalaryRequest {
    pub employee_id: i64,
    pub year: i32,
    pub month: u8,
    #[serde(default)]
    pub adjustments: PayrollAdjustments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySalaryRequest {
    pub year: i32,
    pub month: u8,
    /// Restricts the run to one site.
    #[serde(default)]
    pub site_id: Option<String>,
    /// Adjustments keyed by employee id.
    #[serde(default)]
    pub adjustments: BTreeMap<i64, PayrollAdjustments>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSalary {
    pub employee_id: i64,
    pub employee_name: String,
    pub department_id: Option<i64>,
    pub site_id: Option<String>,
    pub salary_code: String,
    pub breakdown: PayrollBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryFailure {
    pub employee_id: i64,
    pub employee_name: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySalaryResponse {
    pub period: String,
    pub processed_count: usize,
    pub failed_count: usize,
    pub total_net_salary: Decimal,
    pub salaries: Vec<EmployeeSalary>,
    pub failures: Vec<SalaryFailure>,
}

// ============================================================================
// Deductions, documents, audit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeductionRequest {
    pub employee_id: i64,
    pub deduction_type: String,
    pub total_amount: Decimal,
    pub months: i64,
    /// First installment month, `YYYY-MM`.
    pub start_month: String,
}

/// A reschedule of an existing deduction; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeductionRequest {
    pub deduction_type: Option<String>,
    pub total_amount: Option<Decimal>,
    pub months: Option<i64>,
    pub start_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionView {
    #[serde(flatten)]
    pub deduction: DeductionData,
    pub monthly_installment: Decimal,
    /// Last month with an installment, `YYYY-MM`.
    pub end_month: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionQuery {
    pub employee_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionListResponse {
    pub deductions: Vec<DeductionView>,
}

/// A received upload, already read from the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocumentRequest {
    pub document_type: String,
    pub original_filename: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub message: String,
    pub document: DocumentData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditListResponse {
    pub events: Vec<AuditEventData>,
}
