//! Filter predicates → `sea_orm::Condition` compiler.
//!
//! Callers describe row predicates as a flat list of [`Where`] clauses
//! (implicitly AND-combined) instead of writing SQL or ORM expressions.
//! Compilation validates every column and value against the entity's
//! [`FieldMap`] before any I/O happens.

use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition, EntityTrait};
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::fields::{FieldKind, FieldMap, coerce, like_contains};

/// Comparison operators accepted in a [`Where`] clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    /// Case-blind substring match; the operand is wrapped in `%...%` and
    /// LIKE metacharacters inside it are escaped.
    Like,
    Gt,
    Ge,
    Lt,
    Le,
    /// Inclusive range; requires a [`FilterValue::Range`] operand.
    Between,
}

/// Wire-facing scalar operand of a filter clause.
///
/// Untagged: booleans, integers, floats and strings deserialize from their
/// natural JSON forms; a two-element array deserializes as a range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Range(Box<FilterValue>, Box<FilterValue>),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_owned())
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// One predicate: `column op value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Where {
    pub column: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Where {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for the common equality clause.
    pub fn eq(column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    /// Inclusive range clause.
    pub fn between(
        column: impl Into<String>,
        lo: impl Into<FilterValue>,
        hi: impl Into<FilterValue>,
    ) -> Self {
        Self::new(
            column,
            FilterOp::Between,
            FilterValue::Range(Box::new(lo.into()), Box::new(hi.into())),
        )
    }
}

/// Compile a clause list into a conjunctive `Condition`.
///
/// An empty slice compiles to `Condition::all()` with no clauses, which is
/// a no-op filter (matches every row).
///
/// # Errors
/// Returns [`DataError::Schema`] for an unknown column, a kind/value
/// mismatch, a `like` on a non-string column, or a `between` without a
/// range operand.
pub fn build_condition<E>(filters: &[Where], fmap: &FieldMap<E>) -> Result<Condition, DataError>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut cond = Condition::all();
    for w in filters {
        let field = fmap.resolve(&w.column)?;
        let col = field.col;
        let expr = match w.op {
            FilterOp::Like => {
                let FilterValue::String(s) = &w.value else {
                    return Err(DataError::Schema(format!(
                        "`like` needs a string operand for column: {}",
                        w.column
                    )));
                };
                if field.kind != FieldKind::String {
                    return Err(DataError::Schema(format!(
                        "`like` is only valid on string columns: {}",
                        w.column
                    )));
                }
                // Explicit ESCAPE: sqlite has no default escape character.
                col.like(LikeExpr::new(like_contains(s)).escape('\\'))
            }
            FilterOp::Between => {
                let FilterValue::Range(lo, hi) = &w.value else {
                    return Err(DataError::Schema(format!(
                        "`between` needs a [low, high] operand for column: {}",
                        w.column
                    )));
                };
                let lo = coerce(field.kind, lo)?;
                let hi = coerce(field.kind, hi)?;
                col.between(lo, hi)
            }
            FilterOp::Eq => col.eq(coerce(field.kind, &w.value)?),
            FilterOp::Ne => col.ne(coerce(field.kind, &w.value)?),
            FilterOp::Gt => col.gt(coerce(field.kind, &w.value)?),
            FilterOp::Ge => col.gte(coerce(field.kind, &w.value)?),
            FilterOp::Lt => col.lt(coerce(field.kind, &w.value)?),
            FilterOp::Le => col.lte(coerce(field.kind, &w.value)?),
        };
        cond = cond.add(expr);
    }
    Ok(cond)
}
