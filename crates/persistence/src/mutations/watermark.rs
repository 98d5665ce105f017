// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `migration_state` writes.

use diesel::dsl::{exists, now};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::PrimitiveDateTime;
use tracing::debug;

use crate::diesel_schema::migration_state;
use crate::error::PersistenceError;

backend_fn! {
/// Stores the watermark for `job_name`, inserting the row on first use.
///
/// The existence check runs first because `MySQL` reports zero affected
/// rows for an update that changes nothing.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn upsert_watermark(
    conn: &mut _,
    job_name: &str,
    last_updated_at: Option<PrimitiveDateTime>,
    last_id: Option<i64>,
) -> Result<(), PersistenceError> {
    debug!(job_name, ?last_updated_at, ?last_id, "Storing watermark");

    let present: bool = diesel::select(exists(
        migration_state::table.filter(migration_state::job_name.eq(job_name)),
    ))
    .get_result(conn)?;

    if present {
        diesel::update(migration_state::table.filter(migration_state::job_name.eq(job_name)))
            .set((
                migration_state::last_updated_at.eq(last_updated_at),
                migration_state::last_id.eq(last_id),
                migration_state::updated_at.eq(now),
            ))
            .execute(conn)?;
    } else {
        diesel::insert_into(migration_state::table)
            .values((
                migration_state::job_name.eq(job_name),
                migration_state::last_updated_at.eq(last_updated_at),
                migration_state::last_id.eq(last_id),
                migration_state::updated_at.eq(now),
            ))
            .execute(conn)?;
    }
    Ok(())
}
}
