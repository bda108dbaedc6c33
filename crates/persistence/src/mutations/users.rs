// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login account mutations.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::{info, warn};

use super::{flag, now_timestamp};
use crate::data_models::{LoginFailureOutcome, NewUser};
use crate::diesel_schema::users;
use crate::error::PersistenceError;

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

backend_fn! {
/// Creates a login account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user` - Account fields; the password is hashed before storage
/// * `created_by` - Label of the acting user
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the email is taken, or
/// `PersistenceError::ForeignKeyViolation` if the linked employee does not
/// exist.
pub fn create_user(conn: &mut _, user: &NewUser, created_by: &str) -> Result<i64, PersistenceError> {
    let normalized_email: String = user.email.trim().to_lowercase();
    let password_hash: String = hash_password(&user.password)?;
    let created_at: String = now_timestamp()?;

    let user_id: i64 = diesel::insert_into(users::table)
        .values((
            users::email.eq(&normalized_email),
            users::password_hash.eq(&password_hash),
            users::name.eq(user.name.trim()),
            users::role.eq(user.role.as_str()),
            users::employee_id.eq(user.employee_id),
            users::is_active.eq(flag(true)),
            users::failed_login_attempts.eq(0),
            users::created_at.eq(&created_at),
            users::created_by.eq(created_by),
        ))
        .returning(users::user_id)
        .get_result(conn)?;

    info!(user_id, email = %normalized_email, role = user.role.as_str(), "User created");
    Ok(user_id)
}
}

backend_fn! {
/// Clears the failure counter and any lock, and stamps the login time.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn record_successful_login(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    let now: String = now_timestamp()?;
    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set((
            users::failed_login_attempts.eq(0),
            users::locked_until.eq(None::<String>),
            users::last_login_at.eq(Some(now)),
        ))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Counts a failed login and locks the account once the limit is reached.
///
/// Reaching `max_attempts` sets `locked_until` and resets the counter,
/// so the next window starts from zero once the lock expires.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The account that failed to authenticate
/// * `max_attempts` - Failures that trigger a lock
/// * `lock_until` - RFC 3339 timestamp the lock lasts until
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the account does not exist.
pub fn record_login_failure(
    conn: &mut _,
    user_id: i64,
    max_attempts: i32,
    lock_until: &str,
) -> Result<LoginFailureOutcome, PersistenceError> {
    conn.transaction::<LoginFailureOutcome, PersistenceError, _>(|conn| {
        let current: i32 = users::table
            .filter(users::user_id.eq(user_id))
            .select(users::failed_login_attempts)
            .first(conn)?;
        let attempts: i32 = current.saturating_add(1);

        if attempts >= max_attempts {
            diesel::update(users::table.filter(users::user_id.eq(user_id)))
                .set((
                    users::failed_login_attempts.eq(0),
                    users::locked_until.eq(Some(lock_until)),
                ))
                .execute(conn)?;
            warn!(user_id, attempts, lock_until, "Account locked after repeated login failures");
            return Ok(LoginFailureOutcome {
                failed_attempts: 0,
                locked: true,
            });
        }

        diesel::update(users::table.filter(users::user_id.eq(user_id)))
            .set(users::failed_login_attempts.eq(attempts))
            .execute(conn)?;
        Ok(LoginFailureOutcome {
            failed_attempts: attempts,
            locked: false,
        })
    })
}
}

backend_fn! {
/// Enables or disables an account.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn set_user_active(conn: &mut _, user_id: i64, active: bool) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::is_active.eq(flag(active)))
        .execute(conn)?;
    info!(user_id, active, "User active flag changed");
    Ok(updated)
}
}

backend_fn! {
/// Replaces an account's password.
///
/// # Errors
///
/// Returns an error if hashing or the database update fails.
pub fn update_password(conn: &mut _, user_id: i64, password: &str) -> Result<usize, PersistenceError> {
    let password_hash: String = hash_password(password)?;
    let updated: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;
    info!(user_id, "Password updated");
    Ok(updated)
}
}
