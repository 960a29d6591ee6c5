//! Row updates: by id, by id list, by condition, or table-wide.
//!
//! Field changes travel as a [`ChangeSet`], applied either to a set-based
//! `UPDATE` statement or to loaded active models depending on
//! [`ExecMode`].

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, UpdateMany, Value,
};

use super::{ExecMode, WarnMode, emit, fail};
use crate::entity::EntityBase;
use crate::error::DataError;

/// Ordered set of column assignments for an update.
#[must_use]
pub struct ChangeSet<E: EntityTrait> {
    values: Vec<(E::Column, Value)>,
}

impl<E: EntityTrait> Default for ChangeSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ChangeSet<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn set(mut self, col: E::Column, value: impl Into<Value>) -> Self {
        self.values.push((col, value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    fn apply_stmt(&self, mut stmt: UpdateMany<E>) -> UpdateMany<E> {
        for (col, value) in &self.values {
            stmt = stmt.col_expr(*col, Expr::value(value.clone()));
        }
        stmt
    }

    fn apply_model(&self, am: &mut impl ActiveModelTrait<Entity = E>) {
        for (col, value) in &self.values {
            am.set(*col, value.clone());
        }
    }
}

impl<E: EntityTrait> std::fmt::Debug for ChangeSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use sea_orm::IdenStatic;
        let cols: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        f.debug_struct("ChangeSet").field("columns", &cols).finish()
    }
}

fn non_empty<E: EntityTrait>(cs: &ChangeSet<E>, op: &'static str) -> Result<(), DataError> {
    if cs.is_empty() {
        return Err(DataError::EmptyInput(op));
    }
    Ok(())
}

/// Update one row by id.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty change set,
/// [`DataError::NotFound`] when the id matches nothing, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn update_by_id<E, C>(
    conn: &C,
    id: &str,
    changes: &ChangeSet<E>,
    mode: ExecMode,
    warn: WarnMode,
) -> Result<(), DataError>
where
    E: EntityBase,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    non_empty(changes, "update_by_id")?;
    match mode {
        ExecMode::Statement => {
            let res = changes
                .apply_stmt(E::update_many().filter(E::id_column().eq(id)))
                .exec(conn)
                .await
                .map_err(|e| fail::<E>(warn, "update_by_id", e))?;
            if res.rows_affected == 0 {
                emit(warn, E::TYPE_TAG, "update_by_id", "no row matched the id");
                return Err(DataError::NotFound);
            }
        }
        ExecMode::Instance => {
            let Some(model) = E::find()
                .filter(E::id_column().eq(id))
                .one(conn)
                .await
                .map_err(|e| fail::<E>(warn, "update_by_id", e))?
            else {
                emit(warn, E::TYPE_TAG, "update_by_id", "no row matched the id");
                return Err(DataError::NotFound);
            };
            let mut am = model.into_active_model();
            changes.apply_model(&mut am);
            am.update(conn)
                .await
                .map_err(|e| fail::<E>(warn, "update_by_id", e))?;
        }
    }
    Ok(())
}

/// Update all rows whose ids appear in `ids`; returns the affected count.
///
/// A partial match (some stale ids) is reported through `warn`, not as an
/// error; no match at all is [`DataError::NotFound`].
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for empty inputs,
/// [`DataError::NotFound`] when no id matches, a constraint variant on
/// violation, [`DataError::Storage`] on other storage failures.
pub async fn update_by_ids<E, C>(
    conn: &C,
    ids: &[String],
    changes: &ChangeSet<E>,
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    non_empty(changes, "update_by_ids")?;
    if ids.is_empty() {
        return Err(DataError::EmptyInput("update_by_ids"));
    }
    let res = changes
        .apply_stmt(E::update_many().filter(E::id_column().is_in(ids.iter().map(String::as_str))))
        .exec(conn)
        .await
        .map_err(|e| fail::<E>(warn, "update_by_ids", e))?;
    if res.rows_affected == 0 {
        emit(warn, E::TYPE_TAG, "update_by_ids", "no id matched a row");
        return Err(DataError::NotFound);
    }
    if res.rows_affected < ids.len() as u64 {
        emit(
            warn,
            E::TYPE_TAG,
            "update_by_ids",
            "some ids matched no row",
        );
    }
    Ok(res.rows_affected)
}

/// Update all rows matching a prebuilt condition; returns the affected
/// count.
///
/// With `allow_no_result` zero matches is `Ok(0)`; otherwise it is
/// [`DataError::NotFound`].
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty change set,
/// [`DataError::NotFound`] on a disallowed zero-match, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn update_by_where<E, C>(
    conn: &C,
    cond: Condition,
    changes: &ChangeSet<E>,
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
    non_empty(changes, "update_by_where")?;
    let touched = match mode {
        ExecMode::Statement => {
            changes
                .apply_stmt(E::update_many().filter(cond))
                .exec(conn)
                .await
                .map_err(|e| fail::<E>(warn, "update_by_where", e))?
                .rows_affected
        }
        ExecMode::Instance => {
            let rows = E::find()
                .filter(cond)
                .all(conn)
                .await
                .map_err(|e| fail::<E>(warn, "update_by_where", e))?;
            let mut touched = 0u64;
            for model in rows {
                let mut am = model.into_active_model();
                changes.apply_model(&mut am);
                am.update(conn)
                    .await
                    .map_err(|e| fail::<E>(warn, "update_by_where", e))?;
                touched += 1;
            }
            touched
        }
    };
    if touched == 0 && !allow_no_result {
        emit(warn, E::TYPE_TAG, "update_by_where", "no row matched the condition");
        return Err(DataError::NotFound);
    }
    Ok(touched)
}

/// Update all rows matching a prebuilt condition and return the stored
/// models.
///
/// On engines without `RETURNING` the matching ids are collected first,
/// updated, and fetched back. Zero matches yields an empty vec.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty change set, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn update_by_where_returning<E, C>(
    conn: &C,
    cond: Condition,
    changes: &ChangeSet<E>,
    warn: WarnMode,
) -> Result<Vec<E::Model>, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    non_empty(changes, "update_by_where_returning")?;
    if conn.get_database_backend().support_returning() {
        return changes
            .apply_stmt(E::update_many().filter(cond))
            .exec_with_returning(conn)
            .await
            .map_err(|e| fail::<E>(warn, "update_by_where_returning", e));
    }
    let rows = E::find()
        .filter(cond)
        .all(conn)
        .await
        .map_err(|e| fail::<E>(warn, "update_by_where_returning", e))?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Value> = rows.iter().map(|m| m.get(E::id_column())).collect();
    changes
        .apply_stmt(E::update_many().filter(E::id_column().is_in(ids.clone())))
        .exec(conn)
        .await
        .map_err(|e| fail::<E>(warn, "update_by_where_returning", e))?;
    E::find()
        .filter(E::id_column().is_in(ids))
        .all(conn)
        .await
        .map_err(|e| fail::<E>(warn, "update_by_where_returning", e))
}

/// Update every row of the entity's table; returns the affected count.
///
/// # Errors
/// Returns [`DataError::EmptyInput`] for an empty change set, a constraint
/// variant on violation, [`DataError::Storage`] on other storage failures.
pub async fn update_all<E, C>(
    conn: &C,
    changes: &ChangeSet<E>,
    warn: WarnMode,
) -> Result<u64, DataError>
where
    E: EntityBase,
    C: ConnectionTrait,
{
    non_empty(changes, "update_all")?;
    let res = changes
        .apply_stmt(E::update_many())
        .exec(conn)
        .await
        .map_err(|e| fail::<E>(warn, "update_all", e))?;
    Ok(res.rows_affected)
}
