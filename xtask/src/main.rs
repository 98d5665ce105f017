// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project automation
//!
//! ### Backend Testing Commands
//!
//! - `cargo test`: Runs all standard tests against `SQLite` (fast, no infrastructure)
//! - `cargo xtask test-mariadb`: Runs the ignored backend validation tests against `MariaDB`
//! - `cargo xtask verify-migrations`: Checks that `migrations/` and
//!   `migrations_mysql/` produce the same reporting schema
//!
//! Both `MariaDB` commands provision a throwaway `mariadb:11` container with
//! Docker and remove it again, even when the run fails. Nothing in the test
//! code starts services on its own, and no test silently skips because a
//! database is missing.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::io;
use std::process::Output;
use std::thread::sleep;
use std::time::Duration;

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{bail, eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (format, clippy, test, `MariaDB` validation)
    CI,

    /// Lint formatting and clippy
    #[command(visible_alias = "l")]
    Lint,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Lint => lint(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (format, clippy, test, `MariaDB` validation)
fn ci() -> Result<()> {
    lint()?;
    test()?;
    test_mariadb()?;
    verify_migrations()?;
    Ok(())
}

/// Check formatting, then run clippy on every target
fn lint() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])?;
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Run the `SQLite` test suite of every workspace crate
fn test() -> Result<()> {
    run_cargo(vec!["test", "--workspace", "--all-features"])
}

/// Runs cargo from the workspace root.
fn run_cargo(args: Vec<&str>) -> Result<()> {
    let root = MetadataCommand::new()
        .no_deps()
        .exec()
        .wrap_err("Failed to read cargo metadata")?
        .workspace_root;
    cmd("cargo", args).dir(root).run_with_trace()?;
    Ok(())
}

/// A throwaway `MariaDB` container, removed on drop.
struct MariaDb {
    container: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: &'static str,
}

impl MariaDb {
    fn start(
        container: &'static str,
        database: &'static str,
        password: &'static str,
        port: &'static str,
    ) -> Result<Self> {
        tracing::info!("Checking Docker availability");
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        let db = Self {
            container,
            database,
            user: "clocking",
            password,
            port,
        };
        db.remove();

        tracing::info!("Starting MariaDB container: {}", db.container);
        cmd!(
            "docker",
            "run",
            "--name",
            db.container,
            "-e",
            format!("MARIADB_DATABASE={}", db.database),
            "-e",
            format!("MARIADB_USER={}", db.user),
            "-e",
            format!("MARIADB_PASSWORD={}", db.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", db.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        db.wait_ready()?;
        Ok(db)
    }

    fn wait_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {}/{}", attempt, max_attempts);
            let result = cmd!(
                "docker",
                "exec",
                self.container,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();
            if result.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.container)
            .stdout_null()
            .stderr_null()
            .run();
        let _ = cmd!("docker", "rm", self.container)
            .stdout_null()
            .stderr_null()
            .run();
    }
}

impl Drop for MariaDb {
    fn drop(&mut self) {
        tracing::info!("Cleaning up MariaDB container {}", self.container);
        self.remove();
    }
}

/// Run the ignored `MariaDB` backend validation tests against a fresh container
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");
    // Non-standard port to avoid clashing with a local server.
    let db = MariaDb::start("clocking-test-mariadb", "clocking_test", "test_password", "3307")?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        "clocking-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", db.url())
    .env("CLOCKING_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies `migrations/` to an in-memory `SQLite` database and
/// `migrations_mysql/` to a `MariaDB` container, introspects both, and fails
/// on any difference in tables, columns, normalized types, nullability,
/// primary keys, foreign keys or unique constraints.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");
    let db = MariaDb::start(
        "clocking-verify-migrations",
        "clocking_verify",
        "verify_password",
        "3308",
    )?;

    tracing::info!("Applying SQLite migrations");
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite_conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    tracing::info!("Applying MySQL migrations");
    let mut mysql_conn =
        MysqlConnection::establish(&db.url()).wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;
    let mysql_schema = introspect_mysql_schema(&mut mysql_conn, db.database)?;
    compare_schemas(&sqlite_schema, &mysql_schema)?;

    tracing::info!("✓ Schema parity verification passed");
    Ok(())
}

type Schema = BTreeMap<String, Table>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Table {
    /// Column name to (normalized type, nullable).
    columns: BTreeMap<String, (String, bool)>,
    primary_keys: BTreeSet<String>,
    /// (column, referenced table, referenced column)
    foreign_keys: BTreeSet<(String, String, String)>,
    unique_constraints: BTreeSet<Vec<String>>,
}

fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    let mut schema = Schema::new();
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut info = Table::default();

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;
        for col in columns {
            if col.pk > 0 {
                info.primary_keys.insert(col.name.clone());
            }
            // SQLite reports INTEGER PRIMARY KEY columns as nullable unless declared otherwise.
            let nullable = col.notnull == 0 && col.pk == 0;
            info.columns
                .insert(col.name, (normalize_sqlite_type(&col.r#type), nullable));
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get foreign keys for table {}", table.name))?;
        for fk in fks {
            info.foreign_keys.insert((fk.from, fk.table, fk.to));
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;
        for idx in indexes.into_iter().filter(|idx| idx.origin == "u") {
            let columns: Vec<TableName> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;
            info.unique_constraints
                .insert(columns.into_iter().map(|c| c.name).collect());
        }

        schema.insert(table.name, info);
    }

    Ok(schema)
}

#[allow(clippy::struct_field_names)]
fn introspect_mysql_schema(conn: &mut MysqlConnection, db_name: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    struct UniqueConstraintInfo {
        #[diesel(sql_type = Text)]
        constraint_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
    }

    let mut schema = Schema::new();
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ? \
         AND table_name != '__diesel_schema_migrations' ORDER BY table_name",
    )
    .bind::<Text, _>(db_name)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    for table in tables {
        let mut info = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!("Failed to get columns for table {}", table.table_name))?;
        for col in columns {
            if col.column_key == "PRI" {
                info.primary_keys.insert(col.column_name.clone());
            }
            info.columns.insert(
                col.column_name,
                (normalize_mysql_type(&col.data_type), col.is_nullable == "YES"),
            );
        }

        let fks: Vec<ForeignKeyInfo> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!("Failed to get foreign keys for table {}", table.table_name))?;
        for fk in fks {
            info.foreign_keys.insert((
                fk.column_name,
                fk.referenced_table_name,
                fk.referenced_column_name,
            ));
        }

        let uniques: Vec<UniqueConstraintInfo> = diesel::sql_query(
            "SELECT tc.constraint_name, kcu.column_name \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON tc.constraint_name = kcu.constraint_name \
               AND tc.table_schema = kcu.table_schema \
               AND tc.table_name = kcu.table_name \
             WHERE tc.constraint_type = 'UNIQUE' AND tc.table_schema = ? AND tc.table_name = ? \
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get unique constraints for table {}",
            table.table_name
        ))?;
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for uc in uniques {
            grouped
                .entry(uc.constraint_name)
                .or_default()
                .push(uc.column_name);
        }
        info.unique_constraints.extend(grouped.into_values());

        schema.insert(table.table_name, info);
    }

    Ok(schema)
}

/// Maps declared `SQLite` types onto the shared vocabulary.
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    let kind = if normalized.contains("INT") || normalized.contains("BOOL") {
        "integer"
    } else if normalized.contains("TIMESTAMP") || normalized.contains("DATETIME") {
        "datetime"
    } else if normalized == "DATE" {
        "date"
    } else if normalized == "TIME" {
        "time"
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real"
    } else {
        "text"
    };
    kind.to_string()
}

#[allow(clippy::match_same_arms)]
fn normalize_mysql_type(mysql_type: &str) -> String {
    let kind = match mysql_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer",
        "DATETIME" | "TIMESTAMP" => "datetime",
        "DATE" => "date",
        "TIME" => "time",
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real",
        _ => "text",
    };
    kind.to_string()
}

fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let sqlite_tables: BTreeSet<&String> = sqlite.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.keys().collect();
    if sqlite_tables != mysql_tables {
        bail!(
            "❌ Schema parity check FAILED: Table mismatch\n  only in SQLite: {:?}\n  only in MySQL: {:?}",
            sqlite_tables.difference(&mysql_tables).collect::<Vec<_>>(),
            mysql_tables.difference(&sqlite_tables).collect::<Vec<_>>()
        );
    }

    for (name, sqlite_table) in sqlite {
        let mysql_table = &mysql[name];
        check_part(name, "Column", &sqlite_table.columns, &mysql_table.columns)?;
        check_part(
            name,
            "Primary key",
            &sqlite_table.primary_keys,
            &mysql_table.primary_keys,
        )?;
        check_part(
            name,
            "Foreign key",
            &sqlite_table.foreign_keys,
            &mysql_table.foreign_keys,
        )?;
        check_part(
            name,
            "Unique constraint",
            &sqlite_table.unique_constraints,
            &mysql_table.unique_constraints,
        )?;
    }
    Ok(())
}

fn check_part<T: PartialEq + Debug>(table: &str, what: &str, sqlite: &T, mysql: &T) -> Result<()> {
    if sqlite != mysql {
        bail!(
            "❌ Schema parity check FAILED: {what} mismatch in table '{table}'\n  SQLite: {sqlite:?}\n  MySQL: {mysql:?}"
        );
    }
    Ok(())
}

trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
