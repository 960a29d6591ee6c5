//! Per-entity field registry: maps exposed column names to typed `SeaORM`
//! columns. Built once at startup so that unknown-column and type-mismatch
//! errors surface before any statement reaches the engine.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use sea_orm::EntityTrait;

use crate::error::DataError;
use crate::filter::FilterValue;

/// Logical column types supported in filters and ordering.
///
/// Used for value coercion (converting wire-facing [`FilterValue`] scalars
/// into `sea_orm::Value`) and early validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    I64,
    F64,
    Bool,
    Uuid,
    DateTimeUtc,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "String"),
            FieldKind::I64 => write!(f, "I64"),
            FieldKind::F64 => write!(f, "F64"),
            FieldKind::Bool => write!(f, "Bool"),
            FieldKind::Uuid => write!(f, "Uuid"),
            FieldKind::DateTimeUtc => write!(f, "DateTimeUtc"),
        }
    }
}

#[derive(Clone)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub kind: FieldKind,
}

/// Startup-time registry `exposed name -> (column, kind)` for one entity.
#[derive(Clone)]
#[must_use]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, name: impl Into<String>, col: E::Column, kind: FieldKind) -> Self {
        self.map
            .insert(name.into().to_lowercase(), Field { col, kind });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(&name.to_lowercase())
    }

    /// Resolve a column name or fail with a schema error naming it.
    ///
    /// # Errors
    /// Returns [`DataError::Schema`] if the name is not registered.
    pub fn resolve(&self, name: &str) -> Result<&Field<E>, DataError> {
        self.get(name)
            .ok_or_else(|| DataError::Schema(format!("unknown column: {name}")))
    }

    #[must_use]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

/* ---------- coercion ---------- */

fn mismatch(kind: FieldKind, got: &FilterValue) -> DataError {
    let got = match got {
        FilterValue::Bool(_) => "bool",
        FilterValue::Int(_) => "integer",
        FilterValue::Float(_) => "float",
        FilterValue::String(_) => "string",
        FilterValue::Range(_, _) => "range",
    };
    DataError::Schema(format!("type mismatch: expected {kind}, got {got}"))
}

/// Coerce a wire-facing scalar into a `sea_orm::Value` of the column's kind.
///
/// String-carried kinds (uuid, datetime) are parsed here so that malformed
/// values fail as schema errors instead of engine errors.
///
/// # Errors
/// Returns [`DataError::Schema`] on a kind/value mismatch or parse failure.
pub fn coerce(kind: FieldKind, v: &FilterValue) -> Result<sea_orm::Value, DataError> {
    Ok(match (kind, v) {
        (FieldKind::String, FilterValue::String(s)) => {
            sea_orm::Value::String(Some(Box::new(s.clone())))
        }
        (FieldKind::I64, FilterValue::Int(i)) => sea_orm::Value::BigInt(Some(*i)),
        (FieldKind::F64, FilterValue::Float(f)) => sea_orm::Value::Double(Some(*f)),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::F64, FilterValue::Int(i)) => sea_orm::Value::Double(Some(*i as f64)),
        (FieldKind::Bool, FilterValue::Bool(b)) => sea_orm::Value::Bool(Some(*b)),
        (FieldKind::Uuid, FilterValue::String(s)) => {
            let u = s
                .parse::<uuid::Uuid>()
                .map_err(|_| DataError::Schema(format!("invalid uuid: {s}")))?;
            sea_orm::Value::Uuid(Some(Box::new(u)))
        }
        (FieldKind::DateTimeUtc, FilterValue::String(s)) => {
            let dt = chrono::DateTime::parse_from_rfc3339(s)
                .map_err(|_| DataError::Schema(format!("invalid datetime: {s}")))?
                .with_timezone(&Utc);
            sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(dt)))
        }
        (kind, v) => return Err(mismatch(kind, v)),
    })
}

/* ---------- LIKE helpers ---------- */

pub(crate) fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// Substring match pattern: `%escaped%`.
pub(crate) fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}
