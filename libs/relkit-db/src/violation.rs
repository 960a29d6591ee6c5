//! Constraint-violation translator: `sea_orm::DbErr` → [`DataError`].
//!
//! The only module that inspects engine diagnostics. Classification uses
//! `DbErr::sql_err()` where the driver already did the work and falls back
//! to message parsing for the cases it does not cover (NOT NULL and CHECK).
//! Anything unrecognized passes through untouched as `DataError::Storage`.

use std::sync::{LazyLock, OnceLock};

use regex::Regex;
use sea_orm::{DbErr, SqlErr};

use crate::error::DataError;

// Postgres: `null value in column "name" of relation "tasks" violates ...`
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static PG_NOT_NULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"null value in column "([^"]+)""#).expect("static regex should not panic")
});

// SQLite: `NOT NULL constraint failed: tasks.name`
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static SQLITE_NOT_NULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"NOT NULL constraint failed: (?:\w+\.)?(\w+)")
        .expect("static regex should not panic")
});

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static CHECK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)check constraint").expect("static regex should not panic")
});

// Deployment-internal table prefix, registered once at connect time and
// stripped from foreign-key diagnostics.
static TABLE_PREFIX: OnceLock<String> = OnceLock::new();

pub(crate) fn set_table_prefix(prefix: &str) {
    if TABLE_PREFIX.set(prefix.to_owned()).is_err() {
        tracing::debug!(prefix, "table prefix already registered");
    }
}

fn table_prefix() -> &'static str {
    TABLE_PREFIX.get().map_or("", String::as_str)
}

/// Translate a storage error, classifying constraint violations.
///
/// `id_column` is the entity's primary-key column name; a unique violation
/// that references it is reported as [`DataError::PrimaryKey`] rather than
/// [`DataError::Unique`].
#[must_use]
pub fn translate(err: DbErr, id_column: &str) -> DataError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            if references_column(&detail, id_column) {
                DataError::PrimaryKey(clean_detail(&detail))
            } else {
                DataError::Unique(clean_detail(&detail))
            }
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            DataError::ForeignKey(clean_detail(&detail))
        }
        _ => classify_message(err),
    }
}

fn classify_message(err: DbErr) -> DataError {
    let msg = err.to_string();
    if let Some(column) = not_null_column(&msg) {
        return DataError::NullViolation { column };
    }
    if CHECK.is_match(&msg) {
        return DataError::Check(clean_detail(&msg));
    }
    DataError::Storage(err)
}

fn not_null_column(msg: &str) -> Option<String> {
    PG_NOT_NULL
        .captures(msg)
        .or_else(|| SQLITE_NOT_NULL.captures(msg))
        .map(|c| c[1].to_owned())
}

// Unique diagnostics name the column as `tasks.id` (sqlite), `(id)=` in the
// detail line, or `_pkey` in the constraint name (postgres).
fn references_column(detail: &str, column: &str) -> bool {
    detail.contains(&format!(".{column}"))
        || detail.contains(&format!("({column})"))
        || detail.contains("_pkey")
}

// Normalize engine diagnostics before they reach callers: drop the
// redundant `Key ` prefix, use single quotes, and hide the deployment's
// table prefix.
fn clean_detail(detail: &str) -> String {
    let mut d = detail.strip_prefix("Key ").unwrap_or(detail).replace('"', "'");
    let prefix = table_prefix();
    if !prefix.is_empty() {
        d = d.replace(&format!("table '{prefix}"), "table '");
    }
    d
}
