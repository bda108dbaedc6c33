// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # ems-init
//!
//! One-shot database initialization for the Employee Management System.
//!
//! Every run applies pending migrations, makes sure the employee id
//! sequence exists and seeds the default departments and this year's
//! holidays. Seeding is idempotent, so running it against an already
//! initialized database only fills in what is missing.
//!
//! - `--drop` reverts every migration first, destroying all data.
//! - `--seed-demo` adds the demo admin and employee accounts.
//! - `--status` prints row counts and the next employee id afterwards.
//! - `--no-verify` skips the foreign key and table presence checks.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

#[cfg(test)]
mod tests;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ems_persistence::{DatabaseStatus, Persistence, SeedSummary};
use time::OffsetDateTime;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            error!("{err:?}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Initializes the Employee Management System database
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database URL. `postgres://` selects PostgreSQL; anything else is a
    /// `SQLite` path.
    #[arg(long, env = "DATABASE_URL", default_value = "ems.db")]
    database_url: String,

    /// Revert all migrations before applying them, destroying all data
    #[arg(long)]
    drop: bool,

    /// Create the demo admin and employee accounts
    #[arg(long)]
    seed_demo: bool,

    /// Print table row counts and the next employee id
    #[arg(long)]
    status: bool,

    /// Skip foreign key and table presence verification
    #[arg(long)]
    no_verify: bool,
}

impl Args {
    fn options(&self) -> InitOptions {
        InitOptions {
            drop: self.drop,
            seed_demo: self.seed_demo,
            verify: !self.no_verify,
            year: OffsetDateTime::now_utc().year(),
        }
    }

    fn run(self) -> Result<()> {
        info!("Initializing database");
        let mut persistence: Persistence = Persistence::connect(&self.database_url)
            .wrap_err("Failed to open the database")?;

        let report: InitReport = initialize(&mut persistence, &self.options())?;
        info!(
            departments = report.seed.departments_created,
            holidays = report.seed.holidays_created,
            demo_accounts = report.demo_accounts_created,
            "Database initialized"
        );

        if self.status {
            let status: DatabaseStatus = persistence
                .status()
                .wrap_err("Failed to read database status")?;
            println!("{}", format_status(&status));
        }
        Ok(())
    }
}

/// What a run should do, independent of how it was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InitOptions {
    drop: bool,
    seed_demo: bool,
    verify: bool,
    /// Year whose holidays are seeded.
    year: i32,
}

/// What a run changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct InitReport {
    seed: SeedSummary,
    demo_accounts_created: usize,
}

/// Brings an open database up to a usable state.
///
/// Migrations have already run by the time a connection is open; this
/// handles everything after that.
fn initialize(persistence: &mut Persistence, options: &InitOptions) -> Result<InitReport> {
    if options.drop {
        warn!("Dropping all tables");
        persistence
            .reset_schema()
            .wrap_err("Failed to drop and recreate the schema")?;
    }

    let seed: SeedSummary = persistence
        .seed_reference_data(options.year)
        .wrap_err("Failed to seed reference data")?;

    let demo_accounts_created: usize = if options.seed_demo {
        persistence
            .seed_demo_data()
            .wrap_err("Failed to seed demo accounts")?
    } else {
        0
    };

    if options.verify {
        verify(persistence)?;
    }

    Ok(InitReport {
        seed,
        demo_accounts_created,
    })
}

fn verify(persistence: &mut Persistence) -> Result<()> {
    persistence
        .verify_foreign_key_enforcement()
        .wrap_err("Foreign key enforcement is not enabled")?;
    // Counting every table fails if any of them is missing.
    let status: DatabaseStatus = persistence
        .status()
        .wrap_err("Schema verification failed")?;
    info!(tables = status.table_counts.len(), "Schema verified");
    Ok(())
}

fn format_status(status: &DatabaseStatus) -> String {
    let width: usize = status
        .table_counts
        .iter()
        .map(|(table, _)| table.len())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = status
        .table_counts
        .iter()
        .map(|(table, count)| format!("{table:<width$}  {count}"))
        .collect();
    lines.push(match status.next_employee_id {
        Some(id) => format!("next employee id: {id}"),
        None => String::from("next employee id: sequence missing"),
    });
    lines.join("\n")
}
