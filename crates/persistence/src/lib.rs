// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the clocking reports migration pipeline.
//!
//! Two adapters live here:
//!
//! - [`SourceStore`] reads the legacy `system-smartpro` tables (`ss_*`).
//!   It never writes and never migrates.
//! - [`TargetStore`] owns the `clocking_reports` schema: it applies the
//!   embedded migrations, answers existence lookups, writes rows, stores
//!   per-job watermarks and runs the bulk backfill statements.
//!
//! ## Database Backend Support
//!
//! - **`SQLite`**: Used for development, unit tests, and integration tests
//! - **`MariaDB`/`MySQL`**: The production backend for both databases,
//!   validated via explicit opt-in tests
//!
//! A URL beginning with `mysql://` selects `MySQL`; anything else is opened
//! as a `SQLite` path or `file:` URI.
//!
//! To run `MySQL` validation tests:
//! ```bash
//! cargo xtask test-mariadb
//! ```
//!
//! ### Migration Strategy
//!
//! Due to `SQL` syntax differences between backends, we maintain separate
//! migration directories:
//!
//! - `migrations/`: `SQLite`-specific (default)
//! - `migrations_mysql/`: `MySQL`/`MariaDB`-specific
//!
//! Both produce identical schema semantics but use backend-appropriate syntax.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against `SQLite` only
//! - Backend validation tests are explicitly marked `#[ignore]`
//! - The `test-support` feature exposes [`testing::SourceFixture`], an
//!   in-memory legacy schema for downstream crates' tests

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

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::{MysqlConnection, SqliteConnection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::PrimitiveDateTime;
use tracing::{info, warn};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` (and each source fixture) receives a
/// unique sequential ID, so tests never share a database.
pub(crate) static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Macro to generate monomorphic backend-specific query/mutation functions.
///
/// This macro generates two separate functions from a single function body:
/// - One suffixed with `_sqlite` taking `&mut SqliteConnection`
/// - One suffixed with `_mysql` taking `&mut MysqlConnection`
///
/// This approach is required because Diesel's type system requires concrete
/// backend types at compile time and cannot handle generic backend functions.
///
/// # Constraints
///
/// - The macro ONLY duplicates function bodies and substitutes connection types
/// - No logic, branching, or dispatch occurs within the macro
/// - Backend dispatch happens exclusively in the store adapters
/// - The generated functions are completely monomorphic
///
/// # Usage
///
/// ```ignore
/// backend_fn! {
///     pub fn find_user(conn: &mut _, user_id: i64) -> Result<Option<UserRecord>, PersistenceError> {
///         // Function body using conn - same for both backends
///         Ok(users::table.find(user_id).select(UserRecord::as_select()).first(conn).optional()?)
///     }
/// }
/// ```
///
/// This generates:
/// - `find_user_sqlite(&mut SqliteConnection, i64) -> ...`
/// - `find_user_mysql(&mut MysqlConnection, i64) -> ...`
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
            // Generate SQLite version
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            // Generate MySQL version
            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod source_schema;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use data_models::{
    CategoryRecord, ClockingActivityRecord, ClockingHealth, DailyActivityRecord, ProjectRecord,
    ProjectUserRecord, SourceCategory, SourceDailyActivity, SourceProject, SourceUser,
    StoredClocking, TableCounts, UserRecord, Watermark,
};
pub use error::PersistenceError;

use backend::PersistenceBackend;

const MYSQL_SCHEME: &str = "mysql://";

/// Internal enum for backend-specific database connections.
///
/// This enum allows the store adapters to work with either `SQLite` or `MySQL`
/// backends while maintaining a single public API.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

impl BackendConnection {
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Mysql(_) => "mysql",
        }
    }
}

fn is_mysql_url(database_url: &str) -> bool {
    database_url.starts_with(MYSQL_SCHEME)
}

// ============================================================================
// Source store
// ============================================================================

/// Read-only access to the legacy `system-smartpro` tables.
pub struct SourceStore {
    conn: BackendConnection,
}

impl SourceStore {
    /// Opens the source database. No schema changes are made.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached.
    pub fn open(database_url: &str) -> Result<Self, PersistenceError> {
        let conn: BackendConnection = if is_mysql_url(database_url) {
            BackendConnection::Mysql(backend::mysql::establish(database_url)?)
        } else {
            BackendConnection::Sqlite(backend::sqlite::establish(database_url)?)
        };
        info!(backend = conn.backend_name(), "Opened source database");
        Ok(Self { conn })
    }

    /// `ss_user` rows changed at or after `cutoff`, oldest change first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_users(
        &mut self,
        cutoff: Option<PrimitiveDateTime>,
        limit: Option<i64>,
    ) -> Result<Vec<SourceUser>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::fetch_users_sqlite(conn, cutoff, limit),
            BackendConnection::Mysql(conn) => queries::fetch_users_mysql(conn, cutoff, limit),
        }
    }

    /// `ss_project_management` rows changed at or after `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_projects(
        &mut self,
        cutoff: Option<PrimitiveDateTime>,
        limit: Option<i64>,
    ) -> Result<Vec<SourceProject>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::fetch_projects_sqlite(conn, cutoff, limit),
            BackendConnection::Mysql(conn) => queries::fetch_projects_mysql(conn, cutoff, limit),
        }
    }

    /// `ss_category_clocking` rows with `cc_id` above `after_id`, by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_categories(
        &mut self,
        after_id: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<SourceCategory>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::fetch_categories_sqlite(conn, after_id, limit)
            }
            BackendConnection::Mysql(conn) => queries::fetch_categories_mysql(conn, after_id, limit),
        }
    }

    /// `ss_daily_activity` rows changed at or after `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_daily_activities(
        &mut self,
        cutoff: Option<PrimitiveDateTime>,
        limit: Option<i64>,
    ) -> Result<Vec<SourceDailyActivity>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::fetch_daily_activities_sqlite(conn, cutoff, limit)
            }
            BackendConnection::Mysql(conn) => {
                queries::fetch_daily_activities_mysql(conn, cutoff, limit)
            }
        }
    }

    /// The legacy numeric user id carrying `id_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_legacy_user_id(&mut self, id_key: &str) -> Result<Option<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::find_legacy_user_id_sqlite(conn, id_key),
            BackendConnection::Mysql(conn) => queries::find_legacy_user_id_mysql(conn, id_key),
        }
    }

    /// The highest legacy user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn max_legacy_user_id(&mut self) -> Result<Option<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::max_legacy_user_id_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::max_legacy_user_id_mysql(conn),
        }
    }
}

// ============================================================================
// Target store
// ============================================================================

/// Owner of the `clocking_reports` schema.
///
/// Backend selection happens once at construction time and is transparent
/// to callers. Construction applies the embedded migrations and verifies
/// foreign key enforcement.
pub struct TargetStore {
    pub(crate) conn: BackendConnection,
}

impl TargetStore {
    /// Opens the target database by URL, selecting the backend from its scheme.
    ///
    /// Plain `SQLite` paths get WAL mode; `file:` URIs (including shared
    /// in-memory databases) are opened as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(database_url: &str) -> Result<Self, PersistenceError> {
        if is_mysql_url(database_url) {
            Self::new_with_mysql(database_url)
        } else if database_url.starts_with("file:") || database_url == ":memory:" {
            let mut conn: SqliteConnection = backend::sqlite::initialize_database(database_url)?;
            backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;
            Ok(Self {
                conn: BackendConnection::Sqlite(conn),
            })
        } else {
            Self::new_with_file(database_url)
        }
    }

    /// Creates a target store over a fresh in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_target_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a target store over a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a target store over a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        backend::mysql::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Name of the active backend (`sqlite` or `mysql`).
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        self.conn.backend_name()
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Runs `f` inside one transaction: committed when `f` succeeds, rolled
    /// back when it fails.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a [`PersistenceError::TransactionFailed`]
    /// if the transaction cannot be started or committed.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        self.begin_transaction()?;
        match f(self) {
            Ok(value) => {
                self.commit_transaction()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_error) = self.rollback_transaction() {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    fn begin_transaction(&mut self) -> Result<(), PersistenceError> {
        let result: diesel::QueryResult<()> = match &mut self.conn {
            BackendConnection::Sqlite(conn) => AnsiTransactionManager::begin_transaction(conn),
            BackendConnection::Mysql(conn) => AnsiTransactionManager::begin_transaction(conn),
        };
        result.map_err(|e| PersistenceError::TransactionFailed(e.to_string()))
    }

    fn commit_transaction(&mut self) -> Result<(), PersistenceError> {
        let result: diesel::QueryResult<()> = match &mut self.conn {
            BackendConnection::Sqlite(conn) => AnsiTransactionManager::commit_transaction(conn),
            BackendConnection::Mysql(conn) => AnsiTransactionManager::commit_transaction(conn),
        };
        result.map_err(|e| PersistenceError::TransactionFailed(e.to_string()))
    }

    fn rollback_transaction(&mut self) -> Result<(), PersistenceError> {
        let result: diesel::QueryResult<()> = match &mut self.conn {
            BackendConnection::Sqlite(conn) => AnsiTransactionManager::rollback_transaction(conn),
            BackendConnection::Mysql(conn) => AnsiTransactionManager::rollback_transaction(conn),
        };
        result.map_err(|e| PersistenceError::TransactionFailed(e.to_string()))
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user(&mut self, user_id: i64) -> Result<Option<UserRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::find_user_sqlite(conn, user_id),
            BackendConnection::Mysql(conn) => queries::find_user_mysql(conn, user_id),
        }
    }

    /// Whether a user with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_exists(&mut self, user_id: i64) -> Result<bool, PersistenceError> {
        Ok(self.find_user(user_id)?.is_some())
    }

    /// The id of the user owning `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user_id_by_email(&mut self, email: &str) -> Result<Option<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::find_user_id_by_email_sqlite(conn, email),
            BackendConnection::Mysql(conn) => queries::find_user_id_by_email_mysql(conn, email),
        }
    }

    /// Highest `user_id`, `None` for an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn max_user_id(&mut self) -> Result<Option<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::max_user_id_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::max_user_id_mysql(conn),
        }
    }

    /// Lists every user ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_users_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_users_mysql(conn),
        }
    }

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_user(&mut self, record: &UserRecord) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::insert_user_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::insert_user_mysql(conn, record),
        }
    }

    /// Replaces an existing user row.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_user(&mut self, record: &UserRecord) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::update_user_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::update_user_mysql(conn, record),
        }
    }

    /// Repoints memberships and daily activities from one user to another.
    ///
    /// # Errors
    ///
    /// Returns an error if an update fails.
    pub fn reassign_user(&mut self, from: i64, to: i64) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::reassign_user_sqlite(conn, from, to),
            BackendConnection::Mysql(conn) => mutations::reassign_user_mysql(conn, from, to),
        }
    }

    // ========================================================================
    // Projects and membership
    // ========================================================================

    /// Retrieves a project by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_project(
        &mut self,
        project_code: &str,
    ) -> Result<Option<ProjectRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::find_project_sqlite(conn, project_code),
            BackendConnection::Mysql(conn) => queries::find_project_mysql(conn, project_code),
        }
    }

    /// Whether a project with this code exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn project_exists(&mut self, project_code: &str) -> Result<bool, PersistenceError> {
        Ok(self.find_project(project_code)?.is_some())
    }

    /// Lists every project ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_projects(&mut self) -> Result<Vec<ProjectRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_projects_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_projects_mysql(conn),
        }
    }

    /// Inserts a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_project(&mut self, record: &ProjectRecord) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::insert_project_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::insert_project_mysql(conn, record),
        }
    }

    /// Replaces an existing project row.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_project(&mut self, record: &ProjectRecord) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::update_project_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::update_project_mysql(conn, record),
        }
    }

    /// Whether the membership pair is already recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn project_user_exists(
        &mut self,
        project_code: &str,
        user_id: i64,
    ) -> Result<bool, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::project_user_exists_sqlite(conn, project_code, user_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::project_user_exists_mysql(conn, project_code, user_id)
            }
        }
    }

    /// The user ids recorded as members of `project_code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_project_member_ids(
        &mut self,
        project_code: &str,
    ) -> Result<Vec<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::list_project_member_ids_sqlite(conn, project_code)
            }
            BackendConnection::Mysql(conn) => {
                queries::list_project_member_ids_mysql(conn, project_code)
            }
        }
    }

    /// Lists every membership pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_project_users(&mut self) -> Result<Vec<ProjectUserRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_project_users_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_project_users_mysql(conn),
        }
    }

    /// Records a membership pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_project_user(
        &mut self,
        record: &ProjectUserRecord,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::insert_project_user_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::insert_project_user_mysql(conn, record),
        }
    }

    /// Removes members from a project, returning the number of pairs deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_project_users(
        &mut self,
        project_code: &str,
        user_ids: &[i64],
    ) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::delete_project_users_sqlite(conn, project_code, user_ids)
            }
            BackendConnection::Mysql(conn) => {
                mutations::delete_project_users_mysql(conn, project_code, user_ids)
            }
        }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Retrieves a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_category(
        &mut self,
        category_id: i64,
    ) -> Result<Option<CategoryRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::find_category_sqlite(conn, category_id),
            BackendConnection::Mysql(conn) => queries::find_category_mysql(conn, category_id),
        }
    }

    /// Every category id in the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_category_ids(&mut self) -> Result<Vec<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_category_ids_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_category_ids_mysql(conn),
        }
    }

    /// Lists every category ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_categories(&mut self) -> Result<Vec<CategoryRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_categories_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_categories_mysql(conn),
        }
    }

    /// Inserts a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_category(&mut self, record: &CategoryRecord) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::insert_category_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::insert_category_mysql(conn, record),
        }
    }

    /// Replaces an existing category row.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_category(&mut self, record: &CategoryRecord) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::update_category_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::update_category_mysql(conn, record),
        }
    }

    // ========================================================================
    // Daily activities
    // ========================================================================

    /// Retrieves a daily activity by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_daily_activity(
        &mut self,
        daily_activity_id: i64,
    ) -> Result<Option<DailyActivityRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::find_daily_activity_sqlite(conn, daily_activity_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::find_daily_activity_mysql(conn, daily_activity_id)
            }
        }
    }

    /// Every daily activity id in the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_daily_activity_ids(&mut self) -> Result<Vec<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_daily_activity_ids_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_daily_activity_ids_mysql(conn),
        }
    }

    /// Lists every daily activity ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_daily_activities(&mut self) -> Result<Vec<DailyActivityRecord>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_daily_activities_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_daily_activities_mysql(conn),
        }
    }

    /// Inserts a daily activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_daily_activity(
        &mut self,
        record: &DailyActivityRecord,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::insert_daily_activity_sqlite(conn, record)
            }
            BackendConnection::Mysql(conn) => mutations::insert_daily_activity_mysql(conn, record),
        }
    }

    /// Replaces an existing daily activity row.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_daily_activity(
        &mut self,
        record: &DailyActivityRecord,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::update_daily_activity_sqlite(conn, record)
            }
            BackendConnection::Mysql(conn) => mutations::update_daily_activity_mysql(conn, record),
        }
    }

    // ========================================================================
    // Clocking activities
    // ========================================================================

    /// Parent ids that already have at least one clocking row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_parents_with_clockings(&mut self) -> Result<Vec<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_parents_with_clockings_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_parents_with_clockings_mysql(conn),
        }
    }

    /// The clocking rows of one parent in `activity_id` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_clockings_for_parent(
        &mut self,
        daily_activity_id: i64,
    ) -> Result<Vec<StoredClocking>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::list_clockings_for_parent_sqlite(conn, daily_activity_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::list_clockings_for_parent_mysql(conn, daily_activity_id)
            }
        }
    }

    /// Every clocking row ordered by parent then `activity_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_clockings(&mut self) -> Result<Vec<StoredClocking>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_clockings_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_clockings_mysql(conn),
        }
    }

    /// Inserts a clocking row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_clocking(
        &mut self,
        record: &ClockingActivityRecord,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::insert_clocking_sqlite(conn, record),
            BackendConnection::Mysql(conn) => mutations::insert_clocking_mysql(conn, record),
        }
    }

    /// Replaces the values of clocking row `activity_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_clocking(
        &mut self,
        activity_id: i64,
        record: &ClockingActivityRecord,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::update_clocking_sqlite(conn, activity_id, record)
            }
            BackendConnection::Mysql(conn) => {
                mutations::update_clocking_mysql(conn, activity_id, record)
            }
        }
    }

    /// Deletes clocking rows by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_clockings(&mut self, activity_ids: &[i64]) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::delete_clockings_sqlite(conn, activity_ids),
            BackendConnection::Mysql(conn) => mutations::delete_clockings_mysql(conn, activity_ids),
        }
    }

    // ========================================================================
    // Watermarks
    // ========================================================================

    /// Creates the `migration_state` table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails.
    pub fn ensure_watermark_table(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.ensure_migration_state_table(),
            BackendConnection::Mysql(conn) => conn.ensure_migration_state_table(),
        }
    }

    /// The stored watermark for `job_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_watermark(&mut self, job_name: &str) -> Result<Option<Watermark>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::get_watermark_sqlite(conn, job_name),
            BackendConnection::Mysql(conn) => queries::get_watermark_mysql(conn, job_name),
        }
    }

    /// Every stored watermark ordered by job name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_watermarks(&mut self) -> Result<Vec<Watermark>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_watermarks_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::list_watermarks_mysql(conn),
        }
    }

    /// Inserts or replaces the watermark for `job_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn upsert_watermark(
        &mut self,
        job_name: &str,
        last_updated_at: Option<PrimitiveDateTime>,
        last_id: Option<i64>,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::upsert_watermark_sqlite(conn, job_name, last_updated_at, last_id)
            }
            BackendConnection::Mysql(conn) => {
                mutations::upsert_watermark_mysql(conn, job_name, last_updated_at, last_id)
            }
        }
    }

    // ========================================================================
    // Backfill
    // ========================================================================

    /// Derives `NULL` durations from complete, non-inverted intervals.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn derive_missing_durations(&mut self) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.derive_missing_durations(),
            BackendConnection::Mysql(conn) => conn.derive_missing_durations(),
        }
    }

    /// Counts `NULL`-duration rows whose end precedes their start.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_inverted_intervals(&mut self) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.count_inverted_intervals(),
            BackendConnection::Mysql(conn) => conn.count_inverted_intervals(),
        }
    }

    /// Sets `task_id` on unmapped rows whose description matches `label`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn map_task_label(&mut self, label: &str, task_id: i64) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::map_task_label_sqlite(conn, label, task_id),
            BackendConnection::Mysql(conn) => mutations::map_task_label_mysql(conn, label, task_id),
        }
    }

    /// Replaces `task_id = 0` with `NULL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn clear_zero_task_ids(&mut self) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::clear_zero_task_ids_sqlite(conn),
            BackendConnection::Mysql(conn) => mutations::clear_zero_task_ids_mysql(conn),
        }
    }

    /// Replaces `NULL` durations with `0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn default_missing_durations(&mut self) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::default_missing_durations_sqlite(conn),
            BackendConnection::Mysql(conn) => mutations::default_missing_durations_mysql(conn),
        }
    }

    /// Counts clocking rows still needing normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn inspect_clocking_health(&mut self) -> Result<ClockingHealth, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::inspect_clocking_health_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::inspect_clocking_health_mysql(conn),
        }
    }

    /// Row counts for every reporting table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_tables(&mut self) -> Result<TableCounts, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::count_tables_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::count_tables_mysql(conn),
        }
    }
}
