// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory legacy schema for tests.
//!
//! [`SourceFixture`] creates the `ss_*` tables in a shared-cache in-memory
//! `SQLite` database and keeps one connection open so the database lives
//! as long as the fixture. Stores opened with [`SourceFixture::open_store`]
//! see every row seeded through the fixture.

use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use std::sync::atomic::Ordering;
use time::{Date, PrimitiveDateTime};

use crate::error::PersistenceError;
use crate::source_schema::{ss_category_clocking, ss_daily_activity, ss_project_management, ss_user};
use crate::{DB_COUNTER, SourceStore};

const LEGACY_DDL: &[&str] = &[
    "CREATE TABLE ss_user (
        id INTEGER PRIMARY KEY NOT NULL,
        id_key TEXT,
        name TEXT,
        email TEXT,
        jabatan TEXT,
        created_at TIMESTAMP,
        updated_at TIMESTAMP
    )",
    "CREATE TABLE ss_project_management (
        pr_project_code TEXT PRIMARY KEY NOT NULL,
        pr_project_name TEXT,
        pr_customer_name TEXT,
        pr_pic_project BIGINT,
        pr_created_by TEXT,
        pr_created_date TIMESTAMP,
        pr_last_update TIMESTAMP,
        pr_status TEXT,
        pr_members TEXT
    )",
    "CREATE TABLE ss_category_clocking (
        cc_id INTEGER PRIMARY KEY NOT NULL,
        cc_definition TEXT,
        cc_productive INTEGER,
        cc_billable INTEGER,
        cc_used INTEGER,
        cc_direct INTEGER
    )",
    "CREATE TABLE ss_daily_activity (
        da_id INTEGER PRIMARY KEY NOT NULL,
        da_project_code TEXT,
        da_date DATE,
        da_priority TEXT,
        da_start_tm TIMESTAMP,
        da_end_tm TIMESTAMP,
        da_created_by TEXT,
        da_created_date TIMESTAMP,
        da_updated_date TIMESTAMP,
        da_activity TEXT,
        da_keterangan TEXT,
        da_duration INTEGER,
        da_data TEXT,
        da_clocking TEXT
    )",
];

/// Values for one seeded `ss_user` row.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = ss_user)]
pub struct UserSeed {
    pub id: i64,
    pub id_key: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub jabatan: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
    pub updated_at: Option<PrimitiveDateTime>,
}

/// Values for one seeded `ss_project_management` row.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = ss_project_management)]
pub struct ProjectSeed {
    pub pr_project_code: String,
    pub pr_project_name: Option<String>,
    pub pr_customer_name: Option<String>,
    pub pr_pic_project: Option<i64>,
    pub pr_created_by: Option<String>,
    pub pr_created_date: Option<PrimitiveDateTime>,
    pub pr_last_update: Option<PrimitiveDateTime>,
    pub pr_status: Option<String>,
    pub pr_members: Option<String>,
}

/// Values for one seeded `ss_category_clocking` row.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = ss_category_clocking)]
pub struct CategorySeed {
    pub cc_id: i64,
    pub cc_definition: Option<String>,
    pub cc_productive: Option<i32>,
    pub cc_billable: Option<i32>,
    pub cc_used: Option<i32>,
    pub cc_direct: Option<i32>,
}

/// Values for one seeded `ss_daily_activity` row.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = ss_daily_activity)]
pub struct DailyActivitySeed {
    pub da_id: i64,
    pub da_project_code: Option<String>,
    pub da_date: Option<Date>,
    pub da_priority: Option<String>,
    pub da_start_tm: Option<PrimitiveDateTime>,
    pub da_end_tm: Option<PrimitiveDateTime>,
    pub da_created_by: Option<String>,
    pub da_created_date: Option<PrimitiveDateTime>,
    pub da_updated_date: Option<PrimitiveDateTime>,
    pub da_activity: Option<String>,
    pub da_keterangan: Option<String>,
    pub da_duration: Option<i32>,
    pub da_data: Option<String>,
    pub da_clocking: Option<String>,
}

/// A throwaway legacy database.
pub struct SourceFixture {
    url: String,
    conn: SqliteConnection,
}

impl SourceFixture {
    /// Creates an empty legacy schema in a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn new() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url: String = format!("file:memdb_source_{db_id}?mode=memory&cache=shared");
        let mut conn: SqliteConnection = SqliteConnection::establish(&url)?;
        for statement in LEGACY_DDL {
            diesel::sql_query(*statement).execute(&mut conn)?;
        }
        Ok(Self { url, conn })
    }

    /// The URL other connections can use to reach this database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opens a [`SourceStore`] over this database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_store(&self) -> Result<SourceStore, PersistenceError> {
        SourceStore::open(&self.url)
    }

    /// Inserts an `ss_user` row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_user(&mut self, seed: &UserSeed) -> Result<(), PersistenceError> {
        diesel::insert_into(ss_user::table)
            .values(seed)
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Inserts an `ss_project_management` row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_project(&mut self, seed: &ProjectSeed) -> Result<(), PersistenceError> {
        diesel::insert_into(ss_project_management::table)
            .values(seed)
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Inserts an `ss_category_clocking` row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_category(&mut self, seed: &CategorySeed) -> Result<(), PersistenceError> {
        diesel::insert_into(ss_category_clocking::table)
            .values(seed)
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Inserts an `ss_daily_activity` row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_daily_activity(
        &mut self,
        seed: &DailyActivitySeed,
    ) -> Result<(), PersistenceError> {
        diesel::insert_into(ss_daily_activity::table)
            .values(seed)
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Replaces the `da_clocking` payload and change timestamp of a daily activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_daily_clocking(
        &mut self,
        da_id: i64,
        payload: Option<&str>,
        updated: PrimitiveDateTime,
    ) -> Result<(), PersistenceError> {
        diesel::update(ss_daily_activity::table.find(da_id))
            .set((
                ss_daily_activity::da_clocking.eq(payload),
                ss_daily_activity::da_updated_date.eq(Some(updated)),
            ))
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Renames a user and bumps its change timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn rename_user(
        &mut self,
        id: i64,
        name: &str,
        updated: PrimitiveDateTime,
    ) -> Result<(), PersistenceError> {
        diesel::update(ss_user::table.find(id))
            .set((
                ss_user::name.eq(Some(name)),
                ss_user::updated_at.eq(Some(updated)),
            ))
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Changes a project's status code and bumps its change timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_project_status(
        &mut self,
        code: &str,
        status: &str,
        updated: PrimitiveDateTime,
    ) -> Result<(), PersistenceError> {
        diesel::update(ss_project_management::table.find(code))
            .set((
                ss_project_management::pr_status.eq(Some(status)),
                ss_project_management::pr_last_update.eq(Some(updated)),
            ))
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Replaces a project's `pr_members` payload and bumps its change timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_project_members(
        &mut self,
        code: &str,
        payload: Option<&str>,
        updated: PrimitiveDateTime,
    ) -> Result<(), PersistenceError> {
        diesel::update(ss_project_management::table.find(code))
            .set((
                ss_project_management::pr_members.eq(payload),
                ss_project_management::pr_last_update.eq(Some(updated)),
            ))
            .execute(&mut self.conn)?;
        Ok(())
    }
}
