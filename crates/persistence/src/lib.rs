// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage for the Employee Management System.
//!
//! Employees, attendance, reference data, deductions, login accounts,
//! document metadata and audit events all live here, behind the
//! [`Persistence`] adapter. Diesel does the SQL work against either of two
//! backends:
//!
//! - `SQLite` for development, tests and single-host installs. `:memory:`
//!   hands out a private database per adapter.
//! - `PostgreSQL` whenever the URL starts with `postgres://` or
//!   `postgresql://`.
//!
//! Each backend has its own migration tree (`migrations/` and
//! `migrations_postgres/`). The two must describe the same tables.
//!
//! Column conventions shared by both:
//!
//! - booleans are `INTEGER` 0/1
//! - dates are `YYYY-MM-DD`, timestamps RFC 3339, both stored as text
//! - money and overtime shifts are decimal strings
//! - employee ids are drawn from `id_sequences`, first value 91510001
//!
//! The test suite only exercises `SQLite`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{PgConnection, SqliteConnection};
use ems_audit::AuditEvent;
use ems_domain::{EMPLOYEE_ID_BASE, EmploymentStatus, PayrollMonth, Role, format_date};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::info;

/// Suffix for shared-cache in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes a query body once and emits a `_sqlite` and a `_pg` copy of it.
///
/// Diesel resolves query types per backend, so a function generic over the
/// connection does not type-check; duplicating the body does. The
/// generated functions are plain and unaware of each other: if one query
/// needs another, chain them in a `Persistence` method, which is also where
/// the backend is picked.
///
/// ```ignore
/// backend_fn! {
///     pub fn count_sites(conn: &mut _) -> Result<i64, PersistenceError> {
///         sites::table.count().get_result(conn).map_err(Into::into)
///     }
/// }
/// // => count_sites_sqlite(&mut SqliteConnection) and count_sites_pg(&mut PgConnection)
/// ```
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            $(#[$meta])*
            $vis fn [<$name _pg>] (
                $conn: &mut PgConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

/// Routes a call to the `_sqlite` or `_pg` variant of a backend function.
macro_rules! dispatch {
    ($self:ident, $($module:ident)::+, $func:ident ( $($arg:expr),* $(,)? )) => {
        pastey::paste! {
            match &mut $self.conn {
                BackendConnection::Sqlite(conn) => $($module)::+::[<$func _sqlite>](conn $(, $arg)*),
                BackendConnection::Postgres(conn) => $($module)::+::[<$func _pg>](conn $(, $arg)*),
            }
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AttendanceData, AttendanceUpdate, AuditEventData, DatabaseStatus, DeductionData,
    DeductionUpdate, DepartmentData, DocumentData, EmployeeData, EmployeeFilter, EmployeeUpdate,
    HolidayData, LoginFailureOutcome, NewAttendance, NewDeduction, NewDocument, NewEmployee,
    NewHoliday, NewSite, NewUser, NewWageMaster, SiteData, UserData, WageMasterData,
    WageMasterUpdate,
};
pub use error::PersistenceError;
pub use mutations::bootstrap::{DEFAULT_DEPARTMENTS, DEFAULT_HOLIDAYS};
pub use mutations::now_timestamp;
pub use queries::users::verify_password;

use backend::PersistenceBackend;

/// Label recorded as `created_by` for rows written during initialization.
pub const SYSTEM_ACTOR: &str = "system";

/// Demo administrator created by `seed_demo_data`.
pub const DEMO_ADMIN_EMAIL: &str = "admin@company.com";
/// Demo employee account created by `seed_demo_data`.
pub const DEMO_EMPLOYEE_EMAIL: &str = "employee@company.com";

/// Counts of rows created by `seed_reference_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub sequence_created: bool,
    pub departments_created: usize,
    pub holidays_created: usize,
}

/// Backend-specific database connection.
///
/// This enum allows the persistence adapter to work with either `SQLite` or
/// `PostgreSQL` while maintaining a single public API.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Postgres(PgConnection),
}

/// Persistence adapter for the whole schema.
///
/// Backend selection happens once at construction time and is transparent
/// to callers. The adapter is not `Sync`; the server wraps it in a mutex.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn domain_error(err: &ems_domain::DomainError) -> PersistenceError {
    PersistenceError::Other(err.to_string())
}

impl Persistence {
    /// Opens a private in-memory `SQLite` store. Two adapters never share
    /// data.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:ems_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        let mut persistence: Self = Self {
            conn: BackendConnection::Sqlite(conn),
        };
        persistence.ensure_employee_sequence()?;
        Ok(persistence)
    }

    /// Opens (creating if needed) the `SQLite` file at `path` in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-UTF-8 path, an unreadable file or a
    /// failed migration.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(format!(
                "database path {} is not valid UTF-8",
                path.as_ref().display()
            ))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        let mut persistence: Self = Self {
            conn: BackendConnection::Sqlite(conn),
        };
        persistence.ensure_employee_sequence()?;
        Ok(persistence)
    }

    /// Connects to `PostgreSQL` and migrates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or a migration fails.
    pub fn new_with_postgres(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: PgConnection = backend::postgres::initialize_database(database_url)?;
        backend::postgres::verify_foreign_key_enforcement(&mut conn)?;

        let mut persistence: Self = Self {
            conn: BackendConnection::Postgres(conn),
        };
        persistence.ensure_employee_sequence()?;
        Ok(persistence)
    }

    /// Opens the database named by `database_url`.
    ///
    /// `postgres://` and `postgresql://` URLs select `PostgreSQL`;
    /// `:memory:` selects a fresh in-memory `SQLite` database; anything else
    /// is treated as a `SQLite` file path (an optional `sqlite://` prefix is
    /// stripped).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn connect(database_url: &str) -> Result<Self, PersistenceError> {
        let url: &str = database_url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            info!("Opening PostgreSQL database");
            return Self::new_with_postgres(url);
        }
        let path: &str = url.strip_prefix("sqlite://").unwrap_or(url);
        if path.is_empty() || path == ":memory:" {
            info!("Opening in-memory SQLite database");
            return Self::new_in_memory();
        }
        info!(path, "Opening SQLite database");
        Self::new_with_file(path)
    }

    /// Confirms the backend will reject dangling references.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyEnforcementNotEnabled` if it will not.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Postgres(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    /// Reverts every migration and re-applies them, leaving an empty schema
    /// with a fresh employee id sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub fn reset_schema(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                conn.revert_schema()?;
                conn.apply_schema()?;
            }
            BackendConnection::Postgres(conn) => {
                conn.revert_schema()?;
                conn.apply_schema()?;
            }
        }
        info!("Schema dropped and recreated");
        self.ensure_employee_sequence()?;
        Ok(())
    }

    // ========================================================================
    // Seeding & Status
    // ========================================================================

    /// Creates the employee id sequence at 91510001 if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn ensure_employee_sequence(&mut self) -> Result<bool, PersistenceError> {
        dispatch!(self, mutations::employees, ensure_employee_sequence(EMPLOYEE_ID_BASE))
    }

    /// Seeds default departments and the holidays of `year`.
    ///
    /// Safe to call repeatedly; existing rows are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub fn seed_reference_data(&mut self, year: i32) -> Result<SeedSummary, PersistenceError> {
        let sequence_created: bool = self.ensure_employee_sequence()?;
        let departments_created: usize =
            dispatch!(self, mutations::bootstrap, seed_departments(SYSTEM_ACTOR))?;
        let holidays_created: usize =
            dispatch!(self, mutations::bootstrap, seed_holidays(year, SYSTEM_ACTOR))?;
        Ok(SeedSummary {
            sequence_created,
            departments_created,
            holidays_created,
        })
    }

    /// Creates the demo admin and employee accounts if they do not exist.
    ///
    /// The employee account is linked to a "Demo Employee" record in the
    /// IT department. Reference data must already be seeded.
    ///
    /// # Returns
    ///
    /// The number of accounts created.
    ///
    /// # Errors
    ///
    /// Returns an error if the IT department is missing or a write fails.
    pub fn seed_demo_data(&mut self) -> Result<usize, PersistenceError> {
        let mut created: usize = 0;

        if self.get_user_by_email(DEMO_ADMIN_EMAIL)?.is_none() {
            self.create_user(
                &NewUser {
                    email: DEMO_ADMIN_EMAIL.to_string(),
                    password: "admin123".to_string(),
                    name: "Admin User".to_string(),
                    role: Role::Admin,
                    employee_id: None,
                },
                SYSTEM_ACTOR,
            )?;
            created += 1;
        }

        if self.get_user_by_email(DEMO_EMPLOYEE_EMAIL)?.is_none() {
            let department: DepartmentData = self.find_department_by_name("IT")?.ok_or_else(|| {
                PersistenceError::InitializationError(
                    "Department IT is missing; seed reference data first".to_string(),
                )
            })?;
            let employee: EmployeeData = self.create_employee(
                &NewEmployee {
                    first_name: "Demo".to_string(),
                    last_name: Some("Employee".to_string()),
                    email: Some(DEMO_EMPLOYEE_EMAIL.to_string()),
                    department_id: Some(department.department_id),
                    designation: Some("Associate".to_string()),
                    ..NewEmployee::default()
                },
                SYSTEM_ACTOR,
            )?;
            self.create_user(
                &NewUser {
                    email: DEMO_EMPLOYEE_EMAIL.to_string(),
                    password: "emp123".to_string(),
                    name: employee.full_name(),
                    role: Role::Employee,
                    employee_id: Some(employee.employee_id),
                },
                SYSTEM_ACTOR,
            )?;
            created += 1;
        }

        info!(created, "Demo accounts seeded");
        Ok(created)
    }

    /// Row counts per table and the next employee id.
    ///
    /// # Errors
    ///
    /// Returns an error if a table is missing or a query fails.
    pub fn status(&mut self) -> Result<DatabaseStatus, PersistenceError> {
        let table_counts: Vec<(String, i64)> = dispatch!(self, queries::status, count_table_rows())?;
        let next_employee_id: Option<i64> =
            dispatch!(self, queries::employees, peek_next_employee_id())?;
        Ok(DatabaseStatus {
            table_counts,
            next_employee_id,
        })
    }

    // ========================================================================
    // Reference Data
    // ========================================================================

    /// Lists departments ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_departments(&mut self) -> Result<Vec<DepartmentData>, PersistenceError> {
        dispatch!(self, queries::reference, list_departments())
    }

    /// Retrieves a department by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_department(&mut self, department_id: i64) -> Result<Option<DepartmentData>, PersistenceError> {
        dispatch!(self, queries::reference, get_department(department_id))
    }

    /// Retrieves a department by its unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_department_by_name(&mut self, name: &str) -> Result<Option<DepartmentData>, PersistenceError> {
        dispatch!(self, queries::reference, find_department_by_name(name))
    }

    /// Creates a department and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the name is taken.
    pub fn create_department(
        &mut self,
        name: &str,
        description: Option<&str>,
        created_by: &str,
    ) -> Result<DepartmentData, PersistenceError> {
        let department_id: i64 =
            dispatch!(self, mutations::reference, create_department(name, description, created_by))?;
        self.get_department(department_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Department {department_id}")))
    }

    /// Lists sites ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sites(&mut self) -> Result<Vec<SiteData>, PersistenceError> {
        dispatch!(self, queries::reference, list_sites())
    }

    /// Retrieves a site by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_site(&mut self, site_id: &str) -> Result<Option<SiteData>, PersistenceError> {
        dispatch!(self, queries::reference, get_site(site_id))
    }

    /// Creates a site and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the id is taken.
    pub fn create_site(&mut self, site: &NewSite, created_by: &str) -> Result<SiteData, PersistenceError> {
        dispatch!(self, mutations::reference, create_site(site, created_by))?;
        self.get_site(&site.site_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Site {}", site.site_id)))
    }

    /// Lists wage masters, optionally for a single salary code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_wage_masters(&mut self, salary_code: Option<&str>) -> Result<Vec<WageMasterData>, PersistenceError> {
        dispatch!(self, queries::reference, list_wage_masters(salary_code))
    }

    /// Creates a wage master and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the `(salary_code, effective_from)`
    /// pair exists, the site is unknown, or the period is inverted.
    pub fn create_wage_master(&mut self, wage: &NewWageMaster, created_by: &str) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::reference, create_wage_master(wage, created_by))
    }

    /// Retrieves a wage master by id, including deactivated rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_wage_master(&mut self, wage_master_id: i64) -> Result<Option<WageMasterData>, PersistenceError> {
        dispatch!(self, queries::reference, get_wage_master(wage_master_id))
    }

    /// Applies `update` to a wage master and returns the stored row, or
    /// `None` if it does not exist. An empty update changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CheckViolation` if the period would end
    /// before it starts.
    pub fn update_wage_master(
        &mut self,
        wage_master_id: i64,
        update: &WageMasterUpdate,
    ) -> Result<Option<WageMasterData>, PersistenceError> {
        if !update.is_empty() {
            let updated: usize =
                dispatch!(self, mutations::reference, update_wage_master(wage_master_id, update))?;
            if updated == 0 {
                return Ok(None);
            }
        }
        self.get_wage_master(wage_master_id)
    }

    /// Finds the wage master for `salary_code` in force during `period`.
    ///
    /// When several rows overlap the month, the one with the latest
    /// `effective_from` wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_effective_wage_master(
        &mut self,
        salary_code: &str,
        period: PayrollMonth,
    ) -> Result<Option<WageMasterData>, PersistenceError> {
        let start: String = format_date(period.first_day().map_err(|e| domain_error(&e))?);
        let end: String = format_date(period.last_day().map_err(|e| domain_error(&e))?);
        dispatch!(self, queries::reference, find_effective_wage_master(salary_code, &start, &end))
    }

    /// Lists holidays, optionally for one year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_holidays(&mut self, year: Option<i32>) -> Result<Vec<HolidayData>, PersistenceError> {
        dispatch!(self, queries::reference, list_holidays(year))
    }

    /// Creates a holiday and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the date already has a holiday.
    pub fn create_holiday(&mut self, holiday: &NewHoliday, created_by: &str) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::reference, create_holiday(holiday, created_by))
    }

    // ========================================================================
    // Employees
    // ========================================================================

    /// Registers an employee under the next sequence id and returns it.
    ///
    /// A missing hire date defaults to today.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation for duplicate identification numbers
    /// or unknown department or site references.
    pub fn create_employee(&mut self, employee: &NewEmployee, created_by: &str) -> Result<EmployeeData, PersistenceError> {
        let employee_id: i64 =
            dispatch!(self, mutations::employees, create_employee(employee, today(), created_by))?;
        self.get_employee(employee_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Employee {employee_id}")))
    }

    /// Retrieves an employee by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_employee(&mut self, employee_id: i64) -> Result<Option<EmployeeData>, PersistenceError> {
        dispatch!(self, queries::employees, get_employee(employee_id))
    }

    /// Lists employees matching `filter`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_employees(&mut self, filter: &EmployeeFilter) -> Result<Vec<EmployeeData>, PersistenceError> {
        dispatch!(self, queries::employees, list_employees(filter))
    }

    /// Applies a partial update and returns the updated employee, or `None`
    /// if no such employee exists.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the new values collide with
    /// another employee.
    pub fn update_employee(
        &mut self,
        employee_id: i64,
        update: &EmployeeUpdate,
        updated_by: &str,
    ) -> Result<Option<EmployeeData>, PersistenceError> {
        let updated: usize =
            dispatch!(self, mutations::employees, update_employee(employee_id, update, updated_by))?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_employee(employee_id)
    }

    /// Marks an employee inactive. Employee rows are never deleted, so
    /// attendance and payroll history stay intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn deactivate_employee(
        &mut self,
        employee_id: i64,
        updated_by: &str,
    ) -> Result<Option<EmployeeData>, PersistenceError> {
        let updated: usize = dispatch!(
            self,
            mutations::employees,
            set_employment_status(employee_id, EmploymentStatus::Inactive, updated_by)
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_employee(employee_id)
    }

    /// The id the next registered employee will receive.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn peek_next_employee_id(&mut self) -> Result<Option<i64>, PersistenceError> {
        dispatch!(self, queries::employees, peek_next_employee_id())
    }

    // ========================================================================
    // Attendance
    // ========================================================================

    /// Inserts an attendance record and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the employee already
    /// has a record for the date.
    pub fn mark_attendance(&mut self, record: &NewAttendance, marked_by: &str) -> Result<AttendanceData, PersistenceError> {
        let attendance_id: i64 = dispatch!(self, mutations::attendance, mark_attendance(record, marked_by))?;
        self.get_attendance(attendance_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Attendance {attendance_id}")))
    }

    /// Corrects an attendance record and returns it, or `None` if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_attendance(
        &mut self,
        attendance_id: i64,
        update: &AttendanceUpdate,
        updated_by: &str,
    ) -> Result<Option<AttendanceData>, PersistenceError> {
        let updated: usize =
            dispatch!(self, mutations::attendance, update_attendance(attendance_id, update, updated_by))?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_attendance(attendance_id)
    }

    /// Retrieves an attendance record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_attendance(&mut self, attendance_id: i64) -> Result<Option<AttendanceData>, PersistenceError> {
        dispatch!(self, queries::attendance, get_attendance(attendance_id))
    }

    /// Retrieves the record for an employee on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_attendance(&mut self, employee_id: i64, date: Date) -> Result<Option<AttendanceData>, PersistenceError> {
        let date: String = format_date(date);
        dispatch!(self, queries::attendance, find_attendance(employee_id, &date))
    }

    /// Lists an employee's attendance in an optional inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attendance_for_employee(
        &mut self,
        employee_id: i64,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<AttendanceData>, PersistenceError> {
        let from: Option<String> = from.map(format_date);
        let to: Option<String> = to.map(format_date);
        dispatch!(
            self,
            queries::attendance,
            list_attendance_for_employee(employee_id, from.as_deref(), to.as_deref())
        )
    }

    /// Lists an employee's attendance within one month.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attendance_for_month(
        &mut self,
        employee_id: i64,
        period: PayrollMonth,
    ) -> Result<Vec<AttendanceData>, PersistenceError> {
        let from: Date = period.first_day().map_err(|e| domain_error(&e))?;
        let to: Date = period.last_day().map_err(|e| domain_error(&e))?;
        self.list_attendance_for_employee(employee_id, Some(from), Some(to))
    }

    /// Lists every record for a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attendance_for_date(&mut self, date: Date) -> Result<Vec<AttendanceData>, PersistenceError> {
        let date: String = format_date(date);
        dispatch!(self, queries::attendance, list_attendance_for_date(&date))
    }

    // ========================================================================
    // Deductions
    // ========================================================================

    /// Records an installment deduction and returns it.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the employee does not exist.
    pub fn create_deduction(&mut self, deduction: &NewDeduction, created_by: &str) -> Result<DeductionData, PersistenceError> {
        let deduction_id: i64 =
            dispatch!(self, mutations::deductions, create_deduction(deduction, created_by))?;
        self.get_deduction(deduction_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Deduction {deduction_id}")))
    }

    /// Retrieves a deduction by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_deduction(&mut self, deduction_id: i64) -> Result<Option<DeductionData>, PersistenceError> {
        dispatch!(self, queries::deductions, get_deduction(deduction_id))
    }

    /// Lists deductions, optionally for one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_deductions(&mut self, employee_id: Option<i64>) -> Result<Vec<DeductionData>, PersistenceError> {
        dispatch!(self, queries::deductions, list_deductions(employee_id))
    }

    /// Reschedules a deduction and returns it, or `None` if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CheckViolation` if `months` is not
    /// positive.
    pub fn update_deduction(
        &mut self,
        deduction_id: i64,
        update: &DeductionUpdate,
    ) -> Result<Option<DeductionData>, PersistenceError> {
        if !update.is_empty() {
            let updated: usize =
                dispatch!(self, mutations::deductions, update_deduction(deduction_id, update))?;
            if updated == 0 {
                return Ok(None);
            }
        }
        self.get_deduction(deduction_id)
    }

    /// Deletes a deduction, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_deduction(&mut self, deduction_id: i64) -> Result<bool, PersistenceError> {
        let deleted: usize = dispatch!(self, mutations::deductions, delete_deduction(deduction_id))?;
        Ok(deleted > 0)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a login account and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the email is taken.
    pub fn create_user(&mut self, user: &NewUser, created_by: &str) -> Result<UserData, PersistenceError> {
        let user_id: i64 = dispatch!(self, mutations::users, create_user(user, created_by))?;
        self.get_user_by_id(user_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("User {user_id}")))
    }

    /// Retrieves an account by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        dispatch!(self, queries::users, get_user_by_email(email))
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        dispatch!(self, queries::users, get_user_by_id(user_id))
    }

    /// Lists all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        dispatch!(self, queries::users, list_users())
    }

    /// Resets the failure counter and stamps the login time.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_successful_login(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::users, record_successful_login(user_id))
    }

    /// Counts a failed login, locking the account until `lock_until` once
    /// `max_attempts` is reached.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub fn record_login_failure(
        &mut self,
        user_id: i64,
        max_attempts: i32,
        lock_until: &str,
    ) -> Result<LoginFailureOutcome, PersistenceError> {
        dispatch!(self, mutations::users, record_login_failure(user_id, max_attempts, lock_until))
    }

    /// Enables or disables an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_user_active(&mut self, user_id: i64, active: bool) -> Result<bool, PersistenceError> {
        let updated: usize = dispatch!(self, mutations::users, set_user_active(user_id, active))?;
        Ok(updated > 0)
    }

    /// Replaces an account's password.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the update fails.
    pub fn update_password(&mut self, user_id: i64, password: &str) -> Result<bool, PersistenceError> {
        let updated: usize = dispatch!(self, mutations::users, update_password(user_id, password))?;
        Ok(updated > 0)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Records a stored document and returns it.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the employee does not exist.
    pub fn create_document(&mut self, document: &NewDocument, uploaded_by: &str) -> Result<DocumentData, PersistenceError> {
        let document_id: i64 = dispatch!(self, mutations::documents, create_document(document, uploaded_by))?;
        self.get_document(document_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Document {document_id}")))
    }

    /// Retrieves document metadata by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_document(&mut self, document_id: i64) -> Result<Option<DocumentData>, PersistenceError> {
        dispatch!(self, queries::documents, get_document(document_id))
    }

    /// Lists an employee's documents, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_documents(&mut self, employee_id: i64) -> Result<Vec<DocumentData>, PersistenceError> {
        dispatch!(self, queries::documents, list_documents(employee_id))
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Appends `event` to the audit log and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::audit, persist_audit_event(event))
    }

    /// Retrieves an audit event by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<Option<AuditEventData>, PersistenceError> {
        dispatch!(self, queries::audit, get_audit_event(event_id))
    }

    /// Lists the `limit` most recent audit events, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recent_audit_events(&mut self, limit: i64) -> Result<Vec<AuditEventData>, PersistenceError> {
        dispatch!(self, queries::audit, list_recent_audit_events(limit))
    }
}
