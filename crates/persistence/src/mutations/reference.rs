// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data mutations.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use ems_domain::format_date;
use tracing::info;

use super::{flag, now_timestamp};
use crate::data_models::{NewHoliday, NewSite, NewWageMaster, WageMasterUpdate};
use crate::diesel_schema::{departments, holidays, sites, wage_masters};
use crate::error::PersistenceError;

#[derive(AsChangeset)]
#[diesel(table_name = wage_masters)]
struct WageMasterChangeset {
    rank: Option<String>,
    state: Option<String>,
    skill_level: Option<String>,
    daily_wage: Option<String>,
    effective_to: Option<String>,
    is_active: Option<i32>,
}

backend_fn! {
/// Creates a department.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - Unique department name
/// * `description` - Optional description
/// * `created_by` - Label of the acting user
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the name is taken.
pub fn create_department(
    conn: &mut _,
    name: &str,
    description: Option<&str>,
    created_by: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let department_id: i64 = diesel::insert_into(departments::table)
        .values((
            departments::name.eq(name.trim()),
            departments::description.eq(description),
            departments::is_active.eq(1),
            departments::created_at.eq(&created_at),
            departments::created_by.eq(created_by),
        ))
        .returning(departments::department_id)
        .get_result(conn)?;

    info!(department_id, department_name = name, "Department created");
    Ok(department_id)
}
}

backend_fn! {
/// Creates a site.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the site code is taken.
pub fn create_site(conn: &mut _, site: &NewSite, created_by: &str) -> Result<(), PersistenceError> {
    let created_at: String = now_timestamp()?;
    diesel::insert_into(sites::table)
        .values((
            sites::site_id.eq(&site.site_id),
            sites::site_name.eq(&site.site_name),
            sites::location.eq(site.location.as_deref()),
            sites::state.eq(site.state.as_deref()),
            sites::is_active.eq(1),
            sites::created_at.eq(&created_at),
            sites::created_by.eq(created_by),
        ))
        .execute(conn)?;

    info!(site_id = %site.site_id, "Site created");
    Ok(())
}
}

backend_fn! {
/// Creates a wage master row.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the salary code already
/// has a row starting on the same date, or
/// `PersistenceError::ForeignKeyViolation` if the site does not exist.
pub fn create_wage_master(
    conn: &mut _,
    wage: &NewWageMaster,
    created_by: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let wage_master_id: i64 = diesel::insert_into(wage_masters::table)
        .values((
            wage_masters::salary_code.eq(&wage.salary_code),
            wage_masters::site_id.eq(&wage.site_id),
            wage_masters::rank.eq(&wage.rank),
            wage_masters::state.eq(&wage.state),
            wage_masters::skill_level.eq(&wage.skill_level),
            wage_masters::daily_wage.eq(wage.daily_wage.to_string()),
            wage_masters::effective_from.eq(format_date(wage.effective_from)),
            wage_masters::effective_to.eq(wage.effective_to.map(format_date)),
            wage_masters::is_active.eq(1),
            wage_masters::created_at.eq(&created_at),
            wage_masters::created_by.eq(created_by),
        ))
        .returning(wage_masters::wage_master_id)
        .get_result(conn)?;

    info!(wage_master_id, salary_code = %wage.salary_code, "Wage master created");
    Ok(wage_master_id)
}
}

backend_fn! {
/// Applies `update` to a wage master.
///
/// # Returns
///
/// The number of rows updated (0 if the wage master does not exist).
///
/// # Errors
///
/// Returns `PersistenceError::CheckViolation` if the new `effective_to`
/// precedes `effective_from`. `update` must not be empty.
pub fn update_wage_master(
    conn: &mut _,
    wage_master_id: i64,
    update: &WageMasterUpdate,
) -> Result<usize, PersistenceError> {
    let changes: WageMasterChangeset = WageMasterChangeset {
        rank: update.rank.clone(),
        state: update.state.clone(),
        skill_level: update.skill_level.clone(),
        daily_wage: update.daily_wage.map(|w| w.to_string()),
        effective_to: update.effective_to.map(format_date),
        is_active: update.is_active.map(flag),
    };
    let updated: usize = diesel::update(wage_masters::table)
        .filter(wage_masters::wage_master_id.eq(wage_master_id))
        .set(&changes)
        .execute(conn)?;
    info!(wage_master_id, updated, "Wage master updated");
    Ok(updated)
}
}

backend_fn! {
/// Creates a holiday.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if a holiday already exists
/// on that date.
pub fn create_holiday(
    conn: &mut _,
    holiday: &NewHoliday,
    created_by: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let holiday_id: i64 = diesel::insert_into(holidays::table)
        .values((
            holidays::name.eq(&holiday.name),
            holidays::holiday_date.eq(format_date(holiday.holiday_date)),
            holidays::holiday_type.eq(holiday.holiday_type.as_str()),
            holidays::description.eq(holiday.description.as_deref()),
            holidays::is_paid.eq(flag(holiday.is_paid)),
            holidays::is_recurring.eq(flag(holiday.is_recurring)),
            holidays::is_active.eq(1),
            holidays::created_at.eq(&created_at),
            holidays::created_by.eq(created_by),
        ))
        .returning(holidays::holiday_id)
        .get_result(conn)?;

    info!(holiday_id, name = %holiday.name, "Holiday created");
    Ok(holiday_id)
}
}
