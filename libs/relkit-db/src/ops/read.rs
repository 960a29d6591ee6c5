//! Row retrieval: single rows by id, filtered lists with deferred-join
//! pagination.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, QueryFilter};

use super::{WarnMode, emit, fail};
use crate::config::Limits;
use crate::entity::EntityBase;
use crate::error::DataError;
use crate::filter::{Where, build_condition};
use crate::select::{Page, build_select};

/// Fetch one row by id.
///
/// With `allow_no_result` a miss yields `Ok(None)`; otherwise it is
/// [`DataError::NotFound`].
///
/// # Errors
/// Returns [`DataError::NotFound`] on a disallowed miss,
/// [`DataError::Storage`] on storage failure.
pub async fn get<E, C>(
    conn: &C,
    id: &str,
    allow_no_result: bool,
    warn: WarnMode,
) -> Result<Option<E::Model>, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    let found = E::find()
        .filter(E::id_column().eq(id))
        .one(conn)
        .await
        .map_err(|e| fail::<E>(warn, "get", e))?;
    if found.is_none() && !allow_no_result {
        emit(warn, E::TYPE_TAG, "get", "no row matched the id");
        return Err(DataError::NotFound);
    }
    Ok(found)
}

/// Fetch one row matching a prebuilt condition.
///
/// # Errors
/// Returns [`DataError::NotFound`] on a disallowed miss,
/// [`DataError::Storage`] on storage failure.
pub async fn get_by_where<E, C>(
    conn: &C,
    cond: Condition,
    allow_no_result: bool,
    warn: WarnMode,
) -> Result<Option<E::Model>, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    let found = E::find()
        .filter(cond)
        .one(conn)
        .await
        .map_err(|e| fail::<E>(warn, "get_by_where", e))?;
    if found.is_none() && !allow_no_result {
        emit(warn, E::TYPE_TAG, "get_by_where", "no row matched the condition");
        return Err(DataError::NotFound);
    }
    Ok(found)
}

/// Fetch a page of rows matching the filter clauses.
///
/// An empty clause list selects everything (subject to paging). With
/// `allow_no_result` an empty page is `Ok(vec![])`; otherwise it is
/// [`DataError::NotFound`].
///
/// # Errors
/// Returns [`DataError::Schema`] for invalid clauses, ordering columns or
/// eager hints, [`DataError::NotFound`] on a disallowed empty result,
/// [`DataError::Storage`] on storage failure.
pub async fn select<E, C>(
    conn: &C,
    filters: &[Where],
    page: &Page,
    limits: Limits,
    allow_no_result: bool,
    warn: WarnMode,
) -> Result<Vec<E::Model>, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    let cond = build_condition(filters, E::field_map())?;
    select_by_where::<E, C>(conn, cond, page, limits, allow_no_result, warn).await
}

/// Fetch a page of rows matching a prebuilt condition.
///
/// # Errors
/// Returns [`DataError::Schema`] for invalid ordering columns or eager
/// hints, [`DataError::NotFound`] on a disallowed empty result,
/// [`DataError::Storage`] on storage failure.
pub async fn select_by_where<E, C>(
    conn: &C,
    cond: Condition,
    page: &Page,
    limits: Limits,
    allow_no_result: bool,
    warn: WarnMode,
) -> Result<Vec<E::Model>, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    let rows = build_select::<E>(cond, page, limits)?
        .all(conn)
        .await
        .map_err(|e| fail::<E>(warn, "select", e))?;
    if rows.is_empty() && !allow_no_result {
        emit(warn, E::TYPE_TAG, "select", "no rows matched the condition");
        return Err(DataError::NotFound);
    }
    Ok(rows)
}

/// Fetch all rows whose ids appear in `ids`.
///
/// Order follows the entity's primary key, not the order of `ids`; ids
/// without a row are simply absent from the result.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty id list,
/// [`DataError::NotFound`] when no id matches, [`DataError::Storage`] on
/// storage failure.
pub async fn get_by_ids<E, C>(
    conn: &C,
    ids: &[String],
    warn: WarnMode,
) -> Result<Vec<E::Model>, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Err(DataError::EmptyInput("get_by_ids"));
    }
    let rows = E::find()
        .filter(E::id_column().is_in(ids.iter().map(String::as_str)))
        .all(conn)
        .await
        .map_err(|e| fail::<E>(warn, "get_by_ids", e))?;
    if rows.is_empty() {
        emit(warn, E::TYPE_TAG, "get_by_ids", "no id matched a row");
        return Err(DataError::NotFound);
    }
    Ok(rows)
}
