// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates backend-specific initialization, migration,
//! and helper functions that cannot be expressed in backend-agnostic
//! Diesel DSL.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (the production target)
//!
//! ## Backend-Specific Code
//!
//! Backend-specific code is limited to:
//!
//! - Connection initialization
//! - Migration execution
//! - Backend-specific configuration (e.g., PRAGMA)
//! - Date arithmetic, which has no Diesel DSL and differs per backend
//!   (`strftime('%s', ...)` vs `TIMESTAMPDIFF`)
//!
//! All row queries and mutations live in `queries/` and `mutations/`
//! and must work across all supported backends.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so the
/// store adapters can call these helpers without caring which backend
/// they hold.
pub trait PersistenceBackend: Connection {
    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Creates the `migration_state` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails.
    fn ensure_migration_state_table(&mut self) -> Result<(), PersistenceError>;

    /// Sets `duration_minutes` from the stored interval where it is `NULL`,
    /// all four interval parts are present, and the end is not before the start.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn derive_missing_durations(&mut self) -> Result<usize, PersistenceError>;

    /// Counts rows with a `NULL` duration whose stored end precedes the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_inverted_intervals(&mut self) -> Result<i64, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn ensure_migration_state_table(&mut self) -> Result<(), PersistenceError> {
        sqlite::ensure_migration_state_table(self)
    }

    fn derive_missing_durations(&mut self) -> Result<usize, PersistenceError> {
        sqlite::derive_missing_durations(self)
    }

    fn count_inverted_intervals(&mut self) -> Result<i64, PersistenceError> {
        sqlite::count_inverted_intervals(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn ensure_migration_state_table(&mut self) -> Result<(), PersistenceError> {
        mysql::ensure_migration_state_table(self)
    }

    fn derive_missing_durations(&mut self) -> Result<usize, PersistenceError> {
        mysql::derive_missing_durations(self)
    }

    fn count_inverted_intervals(&mut self) -> Result<i64, PersistenceError> {
        mysql::count_inverted_intervals(self)
    }
}

/// Row struct for single `COUNT(*)` results from raw SQL.
#[derive(diesel::QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub(crate) count: i64,
}
