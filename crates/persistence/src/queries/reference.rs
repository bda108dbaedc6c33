// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data queries: departments, sites, wage masters and holidays.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{DepartmentData, HolidayData, SiteData, WageMasterData};
use crate::diesel_schema::{departments, holidays, sites, wage_masters};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = departments)]
struct DepartmentRow {
    department_id: i64,
    name: String,
    description: Option<String>,
    is_active: i32,
    created_at: String,
}

impl From<DepartmentRow> for DepartmentData {
    fn from(row: DepartmentRow) -> Self {
        Self {
            department_id: row.department_id,
            name: row.name,
            description: row.description,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sites)]
struct SiteRow {
    site_id: String,
    site_name: String,
    location: Option<String>,
    state: Option<String>,
    is_active: i32,
    created_at: String,
}

impl From<SiteRow> for SiteData {
    fn from(row: SiteRow) -> Self {
        Self {
            site_id: row.site_id,
            site_name: row.site_name,
            location: row.location,
            state: row.state,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = wage_masters)]
struct WageMasterRow {
    wage_master_id: i64,
    salary_code: String,
    site_id: String,
    rank: String,
    state: String,
    skill_level: String,
    daily_wage: String,
    effective_from: String,
    effective_to: Option<String>,
    is_active: i32,
}

impl From<WageMasterRow> for WageMasterData {
    fn from(row: WageMasterRow) -> Self {
        Self {
            wage_master_id: row.wage_master_id,
            salary_code: row.salary_code,
            site_id: row.site_id,
            rank: row.rank,
            state: row.state,
            skill_level: row.skill_level,
            daily_wage: row.daily_wage,
            effective_from: row.effective_from,
            effective_to: row.effective_to,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = holidays)]
struct HolidayRow {
    holiday_id: i64,
    name: String,
    holiday_date: String,
    holiday_type: String,
    description: Option<String>,
    is_paid: i32,
    is_recurring: i32,
    is_active: i32,
}

impl From<HolidayRow> for HolidayData {
    fn from(row: HolidayRow) -> Self {
        Self {
            holiday_id: row.holiday_id,
            name: row.name,
            holiday_date: row.holiday_date,
            holiday_type: row.holiday_type,
            description: row.description,
            is_paid: row.is_paid != 0,
            is_recurring: row.is_recurring != 0,
            is_active: row.is_active != 0,
        }
    }
}

backend_fn! {
/// Lists all departments ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_departments(conn: &mut _) -> Result<Vec<DepartmentData>, PersistenceError> {
    debug!("Listing departments");

    let rows: Vec<DepartmentRow> = departments::table
        .order(departments::name.asc())
        .select(DepartmentRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(DepartmentData::from).collect())
}
}

backend_fn! {
/// Retrieves a department by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the department does not exist.
pub fn get_department(
    conn: &mut _,
    department_id: i64,
) -> Result<Option<DepartmentData>, PersistenceError> {
    let row: Option<DepartmentRow> = departments::table
        .filter(departments::department_id.eq(department_id))
        .select(DepartmentRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(DepartmentData::from))
}
}

backend_fn! {
/// Retrieves a department by exact name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_department_by_name(
    conn: &mut _,
    name: &str,
) -> Result<Option<DepartmentData>, PersistenceError> {
    let row: Option<DepartmentRow> = departments::table
        .filter(departments::name.eq(name))
        .select(DepartmentRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(DepartmentData::from))
}
}

backend_fn! {
/// Lists all sites ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sites(conn: &mut _) -> Result<Vec<SiteData>, PersistenceError> {
    let rows: Vec<SiteRow> = sites::table
        .order(sites::site_id.asc())
        .select(SiteRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SiteData::from).collect())
}
}

backend_fn! {
/// Retrieves a site by its code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_site(conn: &mut _, site_id: &str) -> Result<Option<SiteData>, PersistenceError> {
    let row: Option<SiteRow> = sites::table
        .filter(sites::site_id.eq(site_id))
        .select(SiteRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SiteData::from))
}
}

backend_fn! {
/// Lists wage masters, optionally restricted to one salary code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_wage_masters(
    conn: &mut _,
    salary_code: Option<&str>,
) -> Result<Vec<WageMasterData>, PersistenceError> {
    let mut query = wage_masters::table
        .select(WageMasterRow::as_select())
        .order((wage_masters::salary_code.asc(), wage_masters::effective_from.asc()))
        .into_boxed();
    if let Some(code) = salary_code {
        query = query.filter(wage_masters::salary_code.eq(code.to_string()));
    }

    let rows: Vec<WageMasterRow> = query.load(conn)?;
    Ok(rows.into_iter().map(WageMasterData::from).collect())
}
}

backend_fn! {
/// Retrieves a wage master by id, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_wage_master(
    conn: &mut _,
    wage_master_id: i64,
) -> Result<Option<WageMasterData>, PersistenceError> {
    let row: Option<WageMasterRow> = wage_masters::table
        .filter(wage_masters::wage_master_id.eq(wage_master_id))
        .select(WageMasterRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(WageMasterData::from))
}
}

backend_fn! {
/// Finds the active wage master for a salary code whose effective period
/// overlaps `[period_start, period_end]`.
///
/// When several rows overlap the latest `effective_from` wins. ISO dates
/// stored as text compare correctly as strings.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `salary_code` - The employee's salary code
/// * `period_start` - First day of the payroll month (`YYYY-MM-DD`)
/// * `period_end` - Last day of the payroll month (`YYYY-MM-DD`)
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no wage master covers the period.
pub fn find_effective_wage_master(
    conn: &mut _,
    salary_code: &str,
    period_start: &str,
    period_end: &str,
) -> Result<Option<WageMasterData>, PersistenceError> {
    debug!(salary_code, period_start, period_end, "Looking up effective wage master");

    let row: Option<WageMasterRow> = wage_masters::table
        .filter(wage_masters::salary_code.eq(salary_code))
        .filter(wage_masters::is_active.eq(1))
        .filter(wage_masters::effective_from.le(period_end))
        .filter(
            wage_masters::effective_to
                .is_null()
                .or(wage_masters::effective_to.ge(period_start)),
        )
        .order(wage_masters::effective_from.desc())
        .select(WageMasterRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(WageMasterData::from))
}
}

backend_fn! {
/// Lists holidays, optionally restricted to one calendar year.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_holidays(conn: &mut _, year: Option<i32>) -> Result<Vec<HolidayData>, PersistenceError> {
    let mut query = holidays::table
        .select(HolidayRow::as_select())
        .order(holidays::holiday_date.asc())
        .into_boxed();
    if let Some(year) = year {
        query = query
            .filter(holidays::holiday_date.ge(format!("{year:04}-01-01")))
            .filter(holidays::holiday_date.le(format!("{year:04}-12-31")));
    }

    let rows: Vec<HolidayRow> = query.load(conn)?;
    Ok(rows.into_iter().map(HolidayData::from).collect())
}
}
