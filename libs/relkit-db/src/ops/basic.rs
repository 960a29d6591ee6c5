//! Existence checks and row counting.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, PaginatorTrait, QueryFilter};

use super::{WarnMode, fail};
use crate::entity::EntityBase;
use crate::error::DataError;
use crate::filter::{Where, build_condition};

/// Check whether a row with the given id exists.
///
/// # Errors
/// Returns [`DataError::Storage`] on storage failure.
pub async fn exists_by_id<E, C>(conn: &C, id: &str, warn: WarnMode) -> Result<bool, DataError>
where
    E: EntityBase,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let n = E::find()
        .filter(E::id_column().eq(id))
        .count(conn)
        .await
        .map_err(|e| fail::<E>(warn, "exists_by_id", e))?;
    Ok(n > 0)
}

/// Check whether any row matches the filter clauses.
///
/// # Errors
/// Returns [`DataError::Schema`] for invalid clauses, [`DataError::Storage`]
/// on storage failure.
pub async fn exists<E, C>(conn: &C, filters: &[Where], warn: WarnMode) -> Result<bool, DataError>
where
    E: EntityBase,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let cond = build_condition(filters, E::field_map())?;
    let n = exec_count::<E, C>(conn, cond, "exists", warn).await?;
    Ok(n > 0)
}

/// Count all rows of the entity's table.
///
/// # Errors
/// Returns [`DataError::Storage`] on storage failure.
pub async fn count<E, C>(conn: &C, warn: WarnMode) -> Result<u64, DataError>
where
    E: EntityBase,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    E::find()
        .count(conn)
        .await
        .map_err(|e| fail::<E>(warn, "count", e))
}

/// Count rows matching a prebuilt condition.
///
/// # Errors
/// Returns [`DataError::Storage`] on storage failure.
pub async fn count_by_where<E, C>(
    conn: &C,
    cond: Condition,
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    exec_count::<E, C>(conn, cond, "count_by_where", warn).await
}

async fn exec_count<E, C>(
    conn: &C,
    cond: Condition,
    op: &'static str,
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    E::find()
        .filter(cond)
        .count(conn)
        .await
        .map_err(|e| fail::<E>(warn, op, e))
}
