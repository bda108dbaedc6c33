// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain records exchanged with the persistence layer.
//!
//! Read models mirror table rows with booleans decoded. Dates are ISO
//! `YYYY-MM-DD` strings, timestamps are RFC 3339 strings and money is a
//! decimal string, exactly as stored. Write models take domain types where
//! the domain constrains the value (attendance status, role, dates).

use ems_domain::{AttendanceStatus, EmploymentStatus, HolidayType, MaritalStatus, Role};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentData {
    pub department_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteData {
    pub site_id: String,
    pub site_name: String,
    pub location: Option<String>,
    pub state: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewSite {
    pub site_id: String,
    pub site_name: String,
    pub location: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageMasterData {
    pub wage_master_id: i64,
    pub salary_code: String,
    pub site_id: String,
    pub rank: String,
    pub state: String,
    pub skill_level: String,
    pub daily_wage: String,
    pub effective_from: String,
    pub effective_to: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewWageMaster {
    pub salary_code: String,
    pub site_id: String,
    pub rank: String,
    pub state: String,
    pub skill_level: String,
    pub daily_wage: Decimal,
    pub effective_from: Date,
    pub effective_to: Option<Date>,
}

/// Changes to a wage master. `None` leaves a column as it is.
///
/// The salary code, site and start date identify the rate and stay fixed.
#[derive(Debug, Clone, Default)]
pub struct WageMasterUpdate {
    pub rank: Option<String>,
    pub state: Option<String>,
    pub skill_level: Option<String>,
    pub daily_wage: Option<Decimal>,
    pub effective_to: Option<Date>,
    pub is_active: Option<bool>,
}

impl WageMasterUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rank.is_none()
            && self.state.is_none()
            && self.skill_level.is_none()
            && self.daily_wage.is_none()
            && self.effective_to.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayData {
    pub holiday_id: i64,
    pub name: String,
    pub holiday_date: String,
    pub holiday_type: String,
    pub description: Option<String>,
    pub is_paid: bool,
    pub is_recurring: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewHoliday {
    pub name: String,
    pub holiday_date: Date,
    pub holiday_type: HolidayType,
    pub description: Option<String>,
    pub is_paid: bool,
    pub is_recurring: bool,
}

/// A stored employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    pub employee_id: i64,
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
    pub hire_date: String,
    pub employment_status: String,
    pub pf_applicable: bool,
    pub esic_applicable: bool,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

impl EmployeeData {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }
}

/// Fields for a new employee. The id is assigned by the sequence.
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub date_of_birth: Option<Date>,
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
    pub hire_date: Option<Date>,
    pub employment_status: EmploymentStatus,
    pub pf_applicable: bool,
    pub esic_applicable: bool,
}

/// A partial update. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub date_of_birth: Option<Date>,
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
    pub hire_date: Option<Date>,
    pub employment_status: Option<EmploymentStatus>,
    pub pf_applicable: Option<bool>,
    pub esic_applicable: Option<bool>,
}

/// Filters for employee listing.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub department_id: Option<i64>,
    pub employment_status: Option<EmploymentStatus>,
    /// Case-insensitive substring matched against id, names, email and phone.
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceData {
    pub attendance_id: i64,
    pub employee_id: i64,
    pub attendance_date: String,
    pub attendance_status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub overtime_shifts: String,
    pub remarks: Option<String>,
    pub marked_by: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// A new attendance record. The status type only admits storable values.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: i64,
    pub attendance_date: Date,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub overtime_shifts: Decimal,
    pub remarks: Option<String>,
}

/// A correction to an existing attendance record.
#[derive(Debug, Clone, Default)]
pub struct AttendanceUpdate {
    pub status: Option<AttendanceStatus>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub overtime_shifts: Option<Decimal>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionData {
    pub deduction_id: i64,
    pub employee_id: i64,
    pub deduction_type: String,
    pub total_amount: String,
    pub months: i32,
    pub start_month: String,
    pub created_at: String,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct NewDeduction {
    pub employee_id: i64,
    pub deduction_type: String,
    pub total_amount: Decimal,
    pub months: i32,
    pub start_month: ems_domain::PayrollMonth,
}

/// Changes to a deduction's schedule. `None` leaves a column as it is.
#[derive(Debug, Clone, Default)]
pub struct DeductionUpdate {
    pub deduction_type: Option<String>,
    pub total_amount: Option<Decimal>,
    pub months: Option<i32>,
    pub start_month: Option<ems_domain::PayrollMonth>,
}

impl DeductionUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.deduction_type.is_none()
            && self.total_amount.is_none()
            && self.months.is_none()
            && self.start_month.is_none()
    }
}

/// A stored login account, including its credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub employee_id: Option<i64>,
    pub is_active: bool,
    pub failed_login_attempts: i32,
    pub locked_until: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    /// Plain-text password; hashed with bcrypt before storage.
    pub password: String,
    pub name: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

/// Result of recording a failed login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginFailureOutcome {
    /// Consecutive failures after this one (reset to 0 once locked).
    pub failed_attempts: i32,
    /// Whether this failure locked the account.
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    pub document_id: i64,
    pub employee_id: i64,
    pub document_type: String,
    pub original_filename: String,
    pub stored_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub employee_id: i64,
    pub document_type: String,
    pub original_filename: String,
    pub stored_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
}

/// A stored audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventData {
    pub event_id: i64,
    pub actor_user_id: Option<i64>,
    pub actor_email: String,
    pub actor_role: String,
    pub action: String,
    pub details: Option<String>,
    pub target: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub created_at: String,
}

/// Row counts and sequence position reported by `ems-init --status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub table_counts: Vec<(String, i64)>,
    pub next_employee_id: Option<i64>,
}
