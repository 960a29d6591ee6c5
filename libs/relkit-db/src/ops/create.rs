//! Row creation: single inserts, bulk inserts, save and upsert.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, IdenStatic,
    IntoActiveModel, Iterable, PaginatorTrait, QueryFilter, Value,
};

use super::{WarnMode, fail};
use crate::entity::EntityBase;
use crate::error::DataError;

/// Fill in a generated id when the caller did not set one. Explicit ids
/// are honored verbatim.
fn ensure_id<E>(am: &mut E::ActiveModel)
where
    E: EntityBase,
{
    if am.get(E::id_column()).is_not_set() {
        am.set(E::id_column(), E::gen_id().into());
    }
}

/// Insert one row and return the stored model (engine defaults included).
///
/// # Errors
/// Returns [`DataError::EmptyInput`] if no field is set, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn insert<E, C>(
    conn: &C,
    mut am: E::ActiveModel,
    warn: WarnMode,
) -> Result<E::Model, DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    if !am.is_changed() {
        return Err(DataError::EmptyInput("insert"));
    }
    ensure_id::<E>(&mut am);
    E::insert(am)
        .exec_with_returning(conn)
        .await
        .map_err(|e| fail::<E>(warn, "insert", e))
}

/// Insert many rows in one statement; returns the inserted row count.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty batch, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn bulk_insert<E, C>(
    conn: &C,
    models: Vec<E::ActiveModel>,
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    let batch = prepare_batch::<E>(models)?;
    E::insert_many(batch)
        .exec_without_returning(conn)
        .await
        .map_err(|e| fail::<E>(warn, "bulk_insert", e))
}

/// Insert many rows in one statement and return the stored models.
///
/// On engines without `RETURNING` the batch is inserted and fetched back by
/// its ids; callers must not rely on row order.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty batch, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn bulk_insert_returning<E, C>(
    conn: &C,
    models: Vec<E::ActiveModel>,
    warn: WarnMode,
) -> Result<Vec<E::Model>, DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    let batch = prepare_batch::<E>(models)?;
    if conn.get_database_backend().support_returning() {
        return E::insert_many(batch)
            .exec_with_returning_many(conn)
            .await
            .map_err(|e| fail::<E>(warn, "bulk_insert_returning", e));
    }
    let ids: Vec<Value> = batch
        .iter()
        .filter_map(|am| am.get(E::id_column()).into_value())
        .collect();
    E::insert_many(batch)
        .exec_without_returning(conn)
        .await
        .map_err(|e| fail::<E>(warn, "bulk_insert_returning", e))?;
    E::find()
        .filter(E::id_column().is_in(ids))
        .all(conn)
        .await
        .map_err(|e| fail::<E>(warn, "bulk_insert_returning", e))
}

fn prepare_batch<E>(models: Vec<E::ActiveModel>) -> Result<Vec<E::ActiveModel>, DataError>
where
    E: EntityBase,
{
    if models.is_empty() {
        return Err(DataError::EmptyInput("bulk_insert"));
    }
    let mut batch = models;
    for am in &mut batch {
        ensure_id::<E>(am);
    }
    Ok(batch)
}

/// Insert-or-update by lookup: update when a row with the model's id
/// exists, insert otherwise. Unlike [`upsert`] this runs `ActiveModelBehavior`
/// hooks on the path it takes, at the cost of an extra round trip.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] if no field is set, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn save<E, C>(
    conn: &C,
    mut am: E::ActiveModel,
    warn: WarnMode,
) -> Result<E::Model, DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    if !am.is_changed() {
        return Err(DataError::EmptyInput("save"));
    }
    if let Some(id) = am.get(E::id_column()).into_value() {
        let taken = E::find()
            .filter(E::id_column().eq(id))
            .count(conn)
            .await
            .map_err(|e| fail::<E>(warn, "save", e))?
            > 0;
        if taken {
            return am.update(conn).await.map_err(|e| fail::<E>(warn, "save", e));
        }
        return E::insert(am)
            .exec_with_returning(conn)
            .await
            .map_err(|e| fail::<E>(warn, "save", e));
    }
    ensure_id::<E>(&mut am);
    E::insert(am)
        .exec_with_returning(conn)
        .await
        .map_err(|e| fail::<E>(warn, "save", e))
}

/// Atomic insert-or-update in one statement (`ON CONFLICT (id) DO UPDATE`).
///
/// All set non-key columns become the conflict update set, so repeating an
/// upsert with the same payload is idempotent.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] if no non-key field is set, a
/// constraint variant on violation, [`DataError::Storage`] on other
/// storage failures.
pub async fn upsert<E, C>(
    conn: &C,
    mut am: E::ActiveModel,
    warn: WarnMode,
) -> Result<E::Model, DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    ensure_id::<E>(&mut am);
    let id_col = E::id_column();
    let id_name = id_col.as_str();
    let update_cols: Vec<E::Column> = E::Column::iter()
        .filter(|c| c.as_str() != id_name && am.get(*c).is_set())
        .collect();
    if update_cols.is_empty() {
        return Err(DataError::EmptyInput("upsert"));
    }
    let on_conflict = OnConflict::column(E::id_column())
        .update_columns(update_cols)
        .to_owned();
    E::insert(am)
        .on_conflict(on_conflict)
        .exec_with_returning(conn)
        .await
        .map_err(|e| fail::<E>(warn, "upsert", e))
}
