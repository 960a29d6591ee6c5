//! The shared CRUD operation set.
//!
//! Free generic functions over any [`EntityBase`](crate::entity::EntityBase)
//! implementor, grouped by concern: [`basic`] (existence, counting),
//! [`read`], [`create`], [`update`], [`delete`]. Every function takes the
//! connection it should run on (`&impl ConnectionTrait`), so the same code
//! runs autocommit on [`Db::conn`](crate::db::Db::conn) or inside
//! [`Db::transaction`](crate::db::Db::transaction). Operations never commit.
//!
//! Naming convention carried across the set: `*_by_where` variants take a
//! prebuilt `sea_orm::Condition` escape hatch, everything else takes the
//! declarative [`Where`](crate::filter::Where) clauses or plain ids.

use std::sync::LazyLock;

use dashmap::DashSet;

use crate::entity::EntityBase;
use crate::error::DataError;

pub mod basic;
pub mod create;
pub mod delete;
pub mod read;
pub mod update;

pub use basic::{count, count_by_where, exists, exists_by_id};
pub use create::{bulk_insert, bulk_insert_returning, insert, save, upsert};
pub use delete::{delete_all, delete_by_id, delete_by_ids, delete_by_where};
pub use read::{get, get_by_ids, get_by_where, select, select_by_where};
pub use update::{
    ChangeSet, update_all, update_by_id, update_by_ids, update_by_where,
    update_by_where_returning,
};

/// How a mutating operation reaches the rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// One set-based statement. Atomic on its own and the cheaper path.
    #[default]
    Statement,
    /// Load the rows and mutate them one by one through their active
    /// models, running `ActiveModelBehavior` hooks per row. Per-row
    /// statements share whatever connection they are given; run inside
    /// [`Db::transaction`](crate::db::Db::transaction) when the batch must
    /// be atomic.
    Instance,
}

/// Verbosity of operation diagnostics. Controls logging only; errors
/// propagate regardless.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WarnMode {
    #[default]
    Always,
    Debug,
    Error,
    /// Log once per (entity, operation) pair for the process lifetime.
    Once,
    Ignore,
}

static WARNED_ONCE: LazyLock<DashSet<String>> = LazyLock::new(DashSet::new);

pub(crate) fn emit(mode: WarnMode, entity: &str, op: &str, msg: &str) {
    match mode {
        WarnMode::Always => tracing::warn!(entity, op, "{msg}"),
        WarnMode::Debug => tracing::debug!(entity, op, "{msg}"),
        WarnMode::Error => tracing::error!(entity, op, "{msg}"),
        WarnMode::Once => {
            if WARNED_ONCE.insert(format!("{entity}::{op}")) {
                tracing::warn!(entity, op, "{msg}");
            }
        }
        WarnMode::Ignore => {}
    }
}

/// Map a storage error through the constraint translator, tagging primary
/// key violations with this entity's id column.
pub(crate) fn storage<E: EntityBase>(err: sea_orm::DbErr) -> DataError {
    use sea_orm::IdenStatic;
    crate::violation::translate(err, E::id_column().as_str())
}

/// Translate a storage failure and log it at the requested verbosity.
pub(crate) fn fail<E: EntityBase>(warn: WarnMode, op: &'static str, err: sea_orm::DbErr) -> DataError {
    let translated = storage::<E>(err);
    emit(warn, E::TYPE_TAG, op, &translated.to_string());
    translated
}
