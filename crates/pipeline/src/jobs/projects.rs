// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ss_project_management` → `projects`.

use clocking_domain::{DataIssue, ProjectStatus};
use clocking_persistence::{ProjectRecord, SourceProject};
use tracing::debug;

use super::{JobContext, upsert};
use crate::error::PipelineError;
use crate::watermark::{Checkpoint, Selection};

pub fn migrate(ctx: &mut JobContext<'_>, selection: Selection) -> Result<Checkpoint, PipelineError> {
    let rows: Vec<SourceProject> = ctx.source.fetch_projects(selection.cutoff(), ctx.limit)?;
    let mut checkpoint: Checkpoint = Checkpoint::default();

    for row in rows {
        ctx.stats.processed += 1;
        checkpoint.observe(row.changed_at(), None);

        if row.pr_project_code.trim().is_empty() {
            ctx.stats.skipped += 1;
            ctx.stats.note(DataIssue::MissingKey);
            continue;
        }

        let record: ProjectRecord = project_record(&row);
        let outcome = upsert(ctx.target, &record, ctx.dry_run, &mut ctx.stats)?;
        debug!(project_code = %record.project_code, status = %record.status, ?outcome, "Project migrated");
    }

    Ok(checkpoint)
}

fn project_record(row: &SourceProject) -> ProjectRecord {
    ProjectRecord {
        project_code: row.pr_project_code.clone(),
        project_name: row.pr_project_name.clone(),
        customer_name: row.pr_customer_name.clone(),
        project_manager_id: row.pr_pic_project,
        created_by: row.pr_created_by.clone(),
        created_at: row.pr_created_date,
        last_update: row.pr_last_update,
        status: ProjectStatus::from_legacy_code(row.pr_status.as_deref())
            .as_str()
            .to_string(),
    }
}
