// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ss_category_clocking` → `category_clocking`.
//!
//! The source table has no timestamps, so the slice is keyed by `cc_id`.

use clocking_persistence::{CategoryRecord, SourceCategory};
use tracing::debug;

use super::{JobContext, upsert};
use crate::error::PipelineError;
use crate::watermark::{Checkpoint, Selection};

pub fn migrate(ctx: &mut JobContext<'_>, selection: Selection) -> Result<Checkpoint, PipelineError> {
    let rows: Vec<SourceCategory> = ctx
        .source
        .fetch_categories(selection.after_id(), ctx.limit)?;
    let mut checkpoint: Checkpoint = Checkpoint::default();

    for row in rows {
        ctx.stats.processed += 1;
        checkpoint.observe(None, Some(row.cc_id));

        let record: CategoryRecord = category_record(&row);
        let outcome = upsert(ctx.target, &record, ctx.dry_run, &mut ctx.stats)?;
        debug!(category_id = record.category_id, ?outcome, "Category migrated");
    }

    Ok(checkpoint)
}

/// Legacy flags are integers; `NULL` and `0` are false.
fn flag(value: Option<i32>) -> bool {
    value.is_some_and(|v| v != 0)
}

fn category_record(row: &SourceCategory) -> CategoryRecord {
    CategoryRecord {
        category_id: row.cc_id,
        category_description: row.cc_definition.clone(),
        is_productive: flag(row.cc_productive),
        is_billable: flag(row.cc_billable),
        is_used: flag(row.cc_used),
        is_direct: flag(row.cc_direct),
    }
}
