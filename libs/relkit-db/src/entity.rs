//! Base contract shared by all stored entity types, plus the process-wide
//! registry used for schema setup and diagnostics.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Iterable, Select};

use crate::error::DataError;
use crate::fields::FieldMap;
use crate::ident;

/// Contract every stored entity implements on top of `EntityTrait`.
///
/// The primary key is a single string column carrying ids from
/// [`gen_unique_id`](crate::ident::gen_unique_id). Row timestamps
/// (`created_at`, `updated_at`) are owned by the storage engine: the
/// application never writes them, engine defaults and triggers do.
pub trait EntityBase: EntityTrait
where
    Self::Column: ColumnTrait + Copy,
{
    /// Source of the three-character id prefix.
    const TYPE_TAG: &'static str;

    /// Primary-key column.
    fn id_column() -> Self::Column;

    /// Registry of columns exposed to filtering and ordering.
    fn field_map() -> &'static FieldMap<Self>;

    /// Relation names accepted as eager-load hints.
    fn relation_names() -> &'static [&'static str] {
        &[]
    }

    /// Apply one validated eager-load hint to a select.
    ///
    /// Entities with declared relations override this to add the joins
    /// the hint stands for. The select is collapsed to distinct entity
    /// rows afterwards, so a join to a to-many relation never multiplies
    /// the page.
    ///
    /// # Errors
    /// The default implementation rejects every name with
    /// [`DataError::Schema`].
    fn apply_relation(select: Select<Self>, name: &str) -> Result<Select<Self>, DataError> {
        let _ = select;
        Err(DataError::Schema(format!("unknown relation: {name}")))
    }

    /// Generate a fresh primary-key value for this entity type.
    #[must_use]
    fn gen_id() -> String {
        ident::gen_unique_id(Self::TYPE_TAG)
    }
}

/// Descriptor of one registered entity type.
#[derive(Clone, Debug)]
pub struct EntityInfo {
    pub type_tag: &'static str,
    pub table: String,
    pub columns: Vec<String>,
    pub relations: &'static [&'static str],
}

/// Process-start registry of concrete entity types.
///
/// Registration is explicit; there is no reflective discovery. Duplicate
/// type tags or table names are rejected so id prefixes stay unambiguous.
#[derive(Default)]
#[must_use]
pub struct EntityRegistry {
    by_tag: HashMap<&'static str, EntityInfo>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type.
    ///
    /// # Errors
    /// Returns [`DataError::Schema`] on a duplicate type tag or table name.
    pub fn register<E>(&mut self) -> Result<(), DataError>
    where
        E: EntityBase,
        E::Column: ColumnTrait + Copy,
    {
        let table = E::default().table_name().to_owned();
        if self.by_tag.contains_key(E::TYPE_TAG) {
            return Err(DataError::Schema(format!(
                "duplicate type tag: {}",
                E::TYPE_TAG
            )));
        }
        if self.by_tag.values().any(|info| info.table == table) {
            return Err(DataError::Schema(format!("duplicate table: {table}")));
        }
        let columns = E::Column::iter().map(|c| c.as_str().to_owned()).collect();
        self.by_tag.insert(
            E::TYPE_TAG,
            EntityInfo {
                type_tag: E::TYPE_TAG,
                table,
                columns,
                relations: E::relation_names(),
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn get(&self, type_tag: &str) -> Option<&EntityInfo> {
        self.by_tag.get(type_tag)
    }

    #[must_use]
    pub fn entities(&self) -> impl Iterator<Item = &EntityInfo> {
        self.by_tag.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("tags", &self.by_tag.keys().collect::<Vec<_>>())
            .finish()
    }
}
