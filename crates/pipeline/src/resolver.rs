// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cross-entity lookups that keep target foreign keys satisfiable.
//!
//! The legacy schema has no foreign keys. Owners are referenced through an
//! opaque `id_key` inside JSON payloads and clocking entries carry
//! category ids that may not exist. The helpers here turn those references
//! into valid target ids, synthesizing the referenced row when needed, so
//! no dependent write is ever rejected by the target.

use std::collections::{HashMap, HashSet};

use clocking_domain::{DataIssue, JobStats, placeholder_email};
use clocking_persistence::{CategoryRecord, SourceStore, TargetStore, UserRecord};
use tracing::{debug, info};

use crate::error::PipelineError;

/// Description given to a synthesized default category.
pub const DEFAULT_CATEGORY_DESCRIPTION: &str = "Uncategorized";

/// Resolves legacy user references to target `user_id`s.
///
/// Owned by one job run. Synthesized ids come from an in-process counter
/// seeded lazily above both the highest target `user_id` and the highest
/// legacy `ss_user.id`, and advanced on every allocation, so ids stay
/// unique within the run even in dry-run mode where nothing reaches the
/// target.
#[derive(Debug)]
pub struct UserResolver {
    dry_run: bool,
    next_user_id: Option<i64>,
    /// Emails assigned during this run, including unwritten dry-run rows.
    claimed: HashMap<String, i64>,
}

impl UserResolver {
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            next_user_id: None,
            claimed: HashMap::new(),
        }
    }

    /// Hands out a user id no target or legacy user holds.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the counter fails.
    pub fn allocate_user_id(
        &mut self,
        source: &mut SourceStore,
        target: &mut TargetStore,
    ) -> Result<i64, PipelineError> {
        let next: i64 = match self.next_user_id {
            Some(next) => next,
            None => {
                let highest: Option<i64> =
                    target.max_user_id()?.max(source.max_legacy_user_id()?);
                highest.map_or(1, |max| max + 1)
            }
        };
        self.next_user_id = Some(next + 1);
        Ok(next)
    }

    /// Records that `email` belongs to `user_id` for the rest of the run.
    pub fn claim_email(&mut self, email: &str, user_id: i64) {
        self.claimed.insert(email.to_string(), user_id);
    }

    /// The user owning `email`, looking at this run's claims first.
    ///
    /// # Errors
    ///
    /// Returns an error if the target lookup fails.
    pub fn email_owner(
        &mut self,
        target: &mut TargetStore,
        email: &str,
    ) -> Result<Option<i64>, PipelineError> {
        if let Some(user_id) = self.claimed.get(email) {
            return Ok(Some(*user_id));
        }
        let owner: Option<i64> = target.find_user_id_by_email(email)?;
        if let Some(user_id) = owner {
            self.claimed.insert(email.to_string(), user_id);
        }
        Ok(owner)
    }

    /// The target id of the legacy user carrying `id_key`, when that user
    /// has already been migrated.
    ///
    /// # Errors
    ///
    /// Returns an error if either lookup fails.
    pub fn legacy_user(
        &mut self,
        source: &mut SourceStore,
        target: &mut TargetStore,
        id_key: &str,
    ) -> Result<Option<i64>, PipelineError> {
        let Some(legacy_id) = source.find_legacy_user_id(id_key)? else {
            return Ok(None);
        };
        if target.user_exists(legacy_id)? {
            Ok(Some(legacy_id))
        } else {
            debug!(id_key, legacy_id, "Legacy user not yet migrated");
            Ok(None)
        }
    }

    /// Resolves a user reference, creating a placeholder user when nothing matches.
    ///
    /// Tries, in order: `email` in the target, the legacy user carrying
    /// `id_key`, the placeholder email derived from `id_key`. When all
    /// miss, a minimal user named `display_name` holding `position` is
    /// inserted under the placeholder email and counted in
    /// `stats.dependencies_created`.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup or the insert fails.
    pub fn resolve_or_create(
        &mut self,
        source: &mut SourceStore,
        target: &mut TargetStore,
        id_key: &str,
        email: Option<&str>,
        display_name: &str,
        position: Option<i16>,
        stats: &mut JobStats,
    ) -> Result<i64, PipelineError> {
        if let Some(email) = email
            && let Some(user_id) = self.email_owner(target, email)?
        {
            return Ok(user_id);
        }
        if let Some(user_id) = self.legacy_user(source, target, id_key)? {
            return Ok(user_id);
        }

        let placeholder: String = placeholder_email(id_key);
        if let Some(user_id) = self.email_owner(target, &placeholder)? {
            return Ok(user_id);
        }

        let user_id: i64 = self.allocate_user_id(source, target)?;
        let record: UserRecord = UserRecord {
            user_id,
            full_name: Some(display_name.to_string()),
            email: placeholder.clone(),
            position,
            created_at: None,
            updated_at: None,
        };
        if !self.dry_run {
            target.insert_user(&record)?;
        }
        self.claim_email(&placeholder, user_id);
        stats.dependencies_created += 1;
        info!(user_id, email = %placeholder, "Created placeholder user");

        Ok(user_id)
    }
}

/// Keeps clocking rows pointing at categories that exist in the target.
#[derive(Debug)]
pub struct CategoryGuard {
    default_id: i64,
    valid: HashSet<i64>,
}

impl CategoryGuard {
    /// Preloads the target category ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load(target: &mut TargetStore, default_id: i64) -> Result<Self, PipelineError> {
        let valid: HashSet<i64> = target.list_category_ids()?.into_iter().collect();
        Ok(Self { default_id, valid })
    }

    #[must_use]
    pub const fn default_id(&self) -> i64 {
        self.default_id
    }

    /// Creates the default category if the target lacks it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn ensure_default(
        &mut self,
        target: &mut TargetStore,
        dry_run: bool,
        stats: &mut JobStats,
    ) -> Result<(), PipelineError> {
        if self.valid.contains(&self.default_id) {
            return Ok(());
        }
        if !dry_run {
            target.insert_category(&CategoryRecord {
                category_id: self.default_id,
                category_description: Some(DEFAULT_CATEGORY_DESCRIPTION.to_string()),
                is_productive: false,
                is_billable: false,
                is_used: false,
                is_direct: false,
            })?;
        }
        self.valid.insert(self.default_id);
        stats.dependencies_created += 1;
        info!(category_id = self.default_id, "Created default category");
        Ok(())
    }

    /// `candidate` when it is a known category, else the default.
    ///
    /// A substitution counts as `fixed` plus an [`DataIssue::InvalidCategory`].
    pub fn check(&self, candidate: i64, stats: &mut JobStats) -> i64 {
        if self.valid.contains(&candidate) {
            return candidate;
        }
        debug!(
            candidate,
            default = self.default_id,
            "Unknown category replaced by default"
        );
        stats.fixed += 1;
        stats.note(DataIssue::InvalidCategory);
        self.default_id
    }
}
