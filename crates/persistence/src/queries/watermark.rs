// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `migration_state` reads.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::Watermark;
use crate::diesel_schema::migration_state;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves the stored watermark for `job_name`.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the job has never recorded one.
pub fn get_watermark(
    conn: &mut _,
    job_name: &str,
) -> Result<Option<Watermark>, PersistenceError> {
    Ok(migration_state::table
        .filter(migration_state::job_name.eq(job_name))
        .select(Watermark::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Lists every stored watermark ordered by job name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_watermarks(conn: &mut _) -> Result<Vec<Watermark>, PersistenceError> {
    Ok(migration_state::table
        .select(Watermark::as_select())
        .order(migration_state::job_name.asc())
        .load(conn)?)
}
}
