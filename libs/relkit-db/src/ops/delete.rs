//! Row deletion: by id, by id list, by condition, or table-wide.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    IntoActiveModel, QueryFilter,
};

use super::{ExecMode, WarnMode, emit, fail};
use crate::entity::EntityBase;
use crate::error::DataError;

/// Delete one row by id.
///
/// # Errors
/// Returns [`DataError::NotFound`] when the id matches nothing, a
/// constraint variant on violation (e.g. the row is still referenced),
/// [`DataError::Storage`] on other storage failures.
pub async fn delete_by_id<E, C>(
    conn: &C,
    id: &str,
    mode: ExecMode,
    warn: WarnMode,
) -> Result<(), DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    match mode {
        ExecMode::Statement => {
            let res = E::delete_many()
                .filter(E::id_column().eq(id))
                .exec(conn)
                .await
                .map_err(|e| fail::<E>(warn, "delete_by_id", e))?;
            if res.rows_affected == 0 {
                emit(warn, E::TYPE_TAG, "delete_by_id", "no row matched the id");
                return Err(DataError::NotFound);
            }
        }
        ExecMode::Instance => {
            let Some(model) = E::find()
                .filter(E::id_column().eq(id))
                .one(conn)
                .await
                .map_err(|e| fail::<E>(warn, "delete_by_id", e))?
            else {
                emit(warn, E::TYPE_TAG, "delete_by_id", "no row matched the id");
                return Err(DataError::NotFound);
            };
            model
                .into_active_model()
                .delete(conn)
                .await
                .map_err(|e| fail::<E>(warn, "delete_by_id", e))?;
        }
    }
    Ok(())
}

/// Delete all rows whose ids appear in `ids`; returns the affected count.
///
/// A partial match (some stale ids) is reported through `warn`, not as an
/// error; no match at all is [`DataError::NotFound`].
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty id list,
/// [`DataError::NotFound`] when no id matches, a constraint variant on
/// violation, [`DataError::Storage`] on other storage failures.
pub async fn delete_by_ids<E, C>(
    conn: &C,
    ids: &[String],
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Err(DataError::EmptyInput("delete_by_ids"));
    }
    let res = E::delete_many()
        .filter(E::id_column().is_in(ids.iter().map(String::as_str)))
        .exec(conn)
        .await
        .map_err(|e| fail::<E>(warn, "delete_by_ids", e))?;
    if res.rows_affected == 0 {
        emit(warn, E::TYPE_TAG, "delete_by_ids", "no id matched a row");
        return Err(DataError::NotFound);
    }
    if res.rows_affected < ids.len() as u64 {
        emit(
            warn,
            E::TYPE_TAG,
            "delete_by_ids",
            "some ids matched no row",
        );
    }
    Ok(res.rows_affected)
}

/// Delete all rows matching a prebuilt condition; returns the affected
/// count.
///
/// With `allow_no_result` zero matches is `Ok(0)`; otherwise it is
/// [`DataError::NotFound`].
///
/// # Errors
/// Returns [`DataError::NotFound`] on a disallowed zero-match, a
/// constraint variant on violation, [`DataError::Storage`] on other
/// storage failures.
pub async fn delete_by_where<E, C>(
    conn: &C,
    cond: Condition,
    mode: ExecMode,
    allow_no_result: bool,
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    let removed = match mode {
        ExecMode::Statement => {
            E::delete_many()
                .filter(cond)
                .exec(conn)
                .await
                .map_err(|e| fail::<E>(warn, "delete_by_where", e))?
                .rows_affected
        }
        ExecMode::Instance => {
            let rows = E::find()
                .filter(cond)
                .all(conn)
                .await
                .map_err(|e| fail::<E>(warn, "delete_by_where", e))?;
            let mut removed = 0u64;
            for model in rows {
                model
                    .into_active_model()
                    .delete(conn)
                    .await
                    .map_err(|e| fail::<E>(warn, "delete_by_where", e))?;
                removed += 1;
            }
            removed
        }
    };
    if removed == 0 && !allow_no_result {
        emit(warn, E::TYPE_TAG, "delete_by_where", "no row matched the condition");
        return Err(DataError::NotFound);
    }
    Ok(removed)
}

/// Delete every row of the entity's table; returns the affected count.
///
/// # Errors
/// Returns a constraint variant on violation, [`DataError::Storage`] on
/// other storage failures.
pub async fn delete_all<E, C>(conn: &C, warn: WarnMode) -> Result<u64, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    let res = E::delete_many()
        .exec(conn)
        .await
        .map_err(|e| fail::<E>(warn, "delete_all", e))?;
    Ok(res.rows_affected)
}
