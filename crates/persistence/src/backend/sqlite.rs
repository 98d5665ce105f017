// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! This module contains SQLite-specific initialization, migration,
//! and helper functions that cannot be expressed in backend-agnostic
//! Diesel DSL.
//!
//! ## Backend-Specific Code
//!
//! This module is limited to:
//! - Connection initialization
//! - Migration execution
//! - SQLite-specific configuration (PRAGMA statements)
//! - Interval arithmetic via `strftime('%s', ...)`

use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use super::CountRow;
use crate::error::PersistenceError;

/// SQLite-specific migrations.
///
/// These migrations use `SQLite` syntax and are the default for development
/// and standard testing.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Combined start and end as epoch seconds. Both parts are stored as text.
const START_EPOCH: &str = "CAST(strftime('%s', start_date || ' ' || start_time) AS INTEGER)";
const END_EPOCH: &str = "CAST(strftime('%s', end_date || ' ' || end_time) AS INTEGER)";

const INTERVAL_PRESENT: &str = "start_date IS NOT NULL AND start_time IS NOT NULL \
     AND end_date IS NOT NULL AND end_time IS NOT NULL";

/// Helper row struct for PRAGMA queries.
///
/// This is a justified use of raw SQL as Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    let foreign_keys_enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaRow>(conn)?
        .foreign_keys;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Opens a `SQLite` connection without touching the schema.
///
/// Used for the legacy source database, which this crate never migrates.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub fn establish(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    debug!("Opening SQLite database at: {}", database_url);
    SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))
}

/// Initialize a `SQLite` database at the given URL and run migrations.
///
/// # Arguments
///
/// * `database_url` - The `SQLite` database URL (e.g., `":memory:"` or file path)
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", database_url);

    let mut conn: SqliteConnection = establish(database_url)?;

    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Creates `migration_state` if absent. Mirrors the embedded migration.
///
/// # Errors
///
/// Returns an error if the DDL statement fails.
pub fn ensure_migration_state_table(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS migration_state (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            job_name TEXT NOT NULL UNIQUE,
            last_updated_at TIMESTAMP,
            last_id BIGINT,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Derives missing clocking durations from the stored interval.
///
/// Intervals whose end precedes the start are left untouched.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn derive_missing_durations(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let statement: String = format!(
        "UPDATE clocking_activities \
         SET duration_minutes = ({END_EPOCH} - {START_EPOCH}) / 60 \
         WHERE duration_minutes IS NULL AND {INTERVAL_PRESENT} \
         AND {END_EPOCH} >= {START_EPOCH}"
    );
    Ok(diesel::sql_query(statement).execute(conn)?)
}

/// Counts `NULL`-duration rows whose end precedes the start.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_inverted_intervals(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let statement: String = format!(
        "SELECT COUNT(*) AS count FROM clocking_activities \
         WHERE duration_minutes IS NULL AND {INTERVAL_PRESENT} \
         AND {END_EPOCH} < {START_EPOCH}"
    );
    Ok(diesel::sql_query(statement).get_result::<CountRow>(conn)?.count)
}
