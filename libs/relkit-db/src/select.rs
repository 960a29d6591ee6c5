//! Paginated query builder using deferred-join pagination.
//!
//! Instead of `LIMIT/OFFSET` over full rows, the builder pages over a
//! key-only subquery and joins the full rows back on primary-key equality.
//! On wide tables with deep offsets the engine then walks an index instead
//! of materializing and discarding full rows.

use sea_orm::sea_query::{Alias, Expr, JoinType, Query};
use sea_orm::{Condition, Order, QueryOrder, QuerySelect, QueryTrait, Select};

use crate::config::Limits;
use crate::entity::EntityBase;
use crate::error::DataError;

const KEY_SUBQUERY_ALIAS: &str = "page_keys";

/// Pagination and ordering request for a select.
///
/// The default is the first page at the configured limit, ordered by the
/// primary key descending (newest ids first).
#[derive(Clone, Debug)]
pub struct Page {
    pub offset: u64,
    /// `None` means "use the configured default limit".
    pub limit: Option<u64>,
    /// Columns to order by, applied in order. The primary key is always
    /// appended as a tie-break so pagination stays deterministic when the
    /// sort columns carry duplicates.
    pub order_by: Vec<String>,
    pub descending: bool,
    /// Eager-load hints dispatched to [`EntityBase::apply_relation`].
    pub eager: Vec<String>,
    /// Skip limit/offset entirely (exports, maintenance scans).
    pub disable_limit: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: None,
            order_by: Vec::new(),
            descending: true,
            eager: Vec::new(),
            disable_limit: false,
        }
    }
}

impl Page {
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order_by.push(column.into());
        self.descending = descending;
        self
    }

    #[must_use]
    pub fn eager(mut self, relation: impl Into<String>) -> Self {
        self.eager.push(relation.into());
        self
    }

    #[must_use]
    pub fn unlimited(mut self) -> Self {
        self.disable_limit = true;
        self
    }
}

/// Build a deferred-join select. Returns the query; never executes it.
///
/// The filter, ordering, limit and offset all live in a key-only subquery;
/// the outer query joins the entity table to it on primary-key equality and
/// re-applies the same ordering (a join does not preserve subquery order).
///
/// # Errors
/// Returns [`DataError::Schema`] for an unknown order-by column or an
/// eager-load hint the entity does not declare.
pub fn build_select<E>(cond: Condition, page: &Page, limits: Limits) -> Result<Select<E>, DataError>
where
    E: EntityBase,
{
    let fmap = E::field_map();
    let id_col = E::id_column();
    let dir = if page.descending {
        Order::Desc
    } else {
        Order::Asc
    };

    let mut order_cols: Vec<E::Column> = Vec::with_capacity(page.order_by.len());
    for name in &page.order_by {
        order_cols.push(fmap.resolve(name)?.col);
    }

    let mut sub = Query::select();
    sub.column((E::default(), id_col))
        .from(E::default())
        .cond_where(cond);
    for col in &order_cols {
        sub.order_by((E::default(), *col), dir.clone());
    }
    sub.order_by((E::default(), id_col), dir.clone());
    if !page.disable_limit {
        let limit = page.limit.unwrap_or(limits.default).clamp(1, limits.max);
        sub.limit(limit).offset(page.offset);
    }

    let mut select = E::find();
    if !page.eager.is_empty() {
        for name in &page.eager {
            if !E::relation_names().contains(&name.as_str()) {
                return Err(DataError::Schema(format!("unknown relation: {name}")));
            }
            select = E::apply_relation(select, name)?;
        }
        // A join to a to-many relation repeats the parent row once per
        // child; collapse so the page still holds each entity once.
        select = select.distinct();
    }

    let keys = Alias::new(KEY_SUBQUERY_ALIAS);
    QueryTrait::query(&mut select).join_subquery(
        JoinType::InnerJoin,
        sub,
        keys.clone(),
        Expr::col((E::default(), id_col)).equals((keys, id_col)),
    );

    for col in order_cols {
        select = select.order_by(col, dir.clone());
    }
    select = select.order_by(id_col, dir);
    Ok(select)
}
