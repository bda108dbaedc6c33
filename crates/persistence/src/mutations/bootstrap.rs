// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data seeding.
//!
//! Seeding is idempotent: rows that already exist (matched by department
//! name or holiday date) are left alone, so `ems-init` can run repeatedly.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use ems_domain::{HolidayType, format_date};
use time::{Date, Month};
use tracing::info;

use super::{flag, now_timestamp};
use crate::diesel_schema::{departments, holidays};
use crate::error::PersistenceError;

/// Departments created on every fresh database.
pub const DEFAULT_DEPARTMENTS: [(&str, &str); 10] = [
    ("HR", "Employee relations, recruitment and training"),
    ("IT", "Technology infrastructure, software and support"),
    ("Finance", "Financial planning, accounting and reporting"),
    ("Marketing", "Market research, advertising and brand management"),
    ("Operations", "Daily operations and process efficiency"),
    ("Sales", "Customer acquisition and revenue"),
    ("Engineering", "Product development and technical design"),
    ("Customer Support", "Customer service and client relationships"),
    ("Legal", "Compliance, contracts and regulatory affairs"),
    ("Administration", "Office management and general support"),
];

/// Holidays seeded for a year, as `(name, month, day, type)`.
pub const DEFAULT_HOLIDAYS: [(&str, Month, u8, HolidayType); 6] = [
    ("New Year's Day", Month::January, 1, HolidayType::National),
    ("Republic Day", Month::January, 26, HolidayType::National),
    ("Company Foundation Day", Month::April, 15, HolidayType::Company),
    ("Independence Day", Month::August, 15, HolidayType::National),
    ("Gandhi Jayanti", Month::October, 2, HolidayType::National),
    ("Christmas Day", Month::December, 25, HolidayType::National),
];

backend_fn! {
/// Inserts any missing default departments.
///
/// # Returns
///
/// The number of departments created.
///
/// # Errors
///
/// Returns an error if a database operation fails.
pub fn seed_departments(conn: &mut _, created_by: &str) -> Result<usize, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let mut created: usize = 0;

    for (name, description) in DEFAULT_DEPARTMENTS {
        let exists: Option<i64> = departments::table
            .filter(departments::name.eq(name))
            .select(departments::department_id)
            .first(conn)
            .optional()?;
        if exists.is_some() {
            continue;
        }
        diesel::insert_into(departments::table)
            .values((
                departments::name.eq(name),
                departments::description.eq(Some(description)),
                departments::is_active.eq(flag(true)),
                departments::created_at.eq(&created_at),
                departments::created_by.eq(created_by),
            ))
            .execute(conn)?;
        created += 1;
    }

    info!(created, "Departments seeded");
    Ok(created)
}
}

backend_fn! {
/// Inserts any missing default holidays for `year`.
///
/// # Returns
///
/// The number of holidays created.
///
/// # Errors
///
/// Returns `PersistenceError::InitializationError` if `year` is outside
/// the supported calendar range, or an error if a database operation fails.
pub fn seed_holidays(conn: &mut _, year: i32, created_by: &str) -> Result<usize, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let mut created: usize = 0;

    for (name, month, day, holiday_type) in DEFAULT_HOLIDAYS {
        let date: Date = Date::from_calendar_date(year, month, day)
            .map_err(|e| PersistenceError::InitializationError(format!("Invalid holiday date: {e}")))?;
        let holiday_date: String = format_date(date);

        let exists: Option<i64> = holidays::table
            .filter(holidays::holiday_date.eq(&holiday_date))
            .select(holidays::holiday_id)
            .first(conn)
            .optional()?;
        if exists.is_some() {
            continue;
        }
        diesel::insert_into(holidays::table)
            .values((
                holidays::name.eq(name),
                holidays::holiday_date.eq(&holiday_date),
                holidays::holiday_type.eq(holiday_type.as_str()),
                holidays::description.eq(Some(format!("{name} - {} holiday", holiday_type.as_str()))),
                holidays::is_paid.eq(flag(true)),
                holidays::is_recurring.eq(flag(true)),
                holidays::is_active.eq(flag(true)),
                holidays::created_at.eq(&created_at),
                holidays::created_by.eq(created_by),
            ))
            .execute(conn)?;
        created += 1;
    }

    info!(year, created, "Holidays seeded");
    Ok(created)
}
}
