#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared sqlite fixtures: a `tasks` table with engine-owned timestamps
//! (insert defaults plus an update trigger) and a `notes` table referencing
//! it, so referential-integrity paths can be exercised.

use relkit_db::{Db, DbConfig};
use sea_orm::{ConnectionTrait, Set};

pub mod task {
    use std::sync::LazyLock;

    use relkit_db::{DataError, EntityBase, FieldKind, FieldMap};
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tasks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub point: i64,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::note::Entity")]
        Notes,
    }

    impl Related<super::note::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Notes.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    static FIELDS: LazyLock<FieldMap<Entity>> = LazyLock::new(|| {
        FieldMap::new()
            .insert("id", Column::Id, FieldKind::String)
            .insert("name", Column::Name, FieldKind::String)
            .insert("point", Column::Point, FieldKind::I64)
            .insert("created_at", Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updated_at", Column::UpdatedAt, FieldKind::DateTimeUtc)
    });

    impl EntityBase for Entity {
        const TYPE_TAG: &'static str = "task";

        fn id_column() -> Column {
            Column::Id
        }

        fn field_map() -> &'static FieldMap<Self> {
            &FIELDS
        }

        fn relation_names() -> &'static [&'static str] {
            &["notes"]
        }

        fn apply_relation(
            select: sea_orm::Select<Self>,
            name: &str,
        ) -> Result<sea_orm::Select<Self>, DataError> {
            match name {
                "notes" => Ok(select.left_join(super::note::Entity)),
                other => Err(DataError::Schema(format!("unknown relation: {other}"))),
            }
        }
    }
}

pub mod note {
    use std::sync::LazyLock;

    use relkit_db::{EntityBase, FieldKind, FieldMap};
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub task_id: String,
        pub body: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::task::Entity",
            from = "Column::TaskId",
            to = "super::task::Column::Id"
        )]
        Task,
    }

    impl Related<super::task::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Task.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    static FIELDS: LazyLock<FieldMap<Entity>> = LazyLock::new(|| {
        FieldMap::new()
            .insert("id", Column::Id, FieldKind::String)
            .insert("task_id", Column::TaskId, FieldKind::String)
            .insert("body", Column::Body, FieldKind::String)
    });

    impl EntityBase for Entity {
        const TYPE_TAG: &'static str = "note";

        fn id_column() -> Column {
            Column::Id
        }

        fn field_map() -> &'static FieldMap<Self> {
            &FIELDS
        }
    }
}

// Millisecond timestamps so updated-at refreshes are observable without
// sleeping across a full second.
const SCHEMA: &[&str] = &[
    "PRAGMA foreign_keys = ON",
    "CREATE TABLE tasks (
id TEXT NOT NULL PRIMARY KEY,
name TEXT NOT NULL UNIQUE,
point INTEGER NOT NULL DEFAULT 0,
created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%d %H:%M:%f', 'now')),
updated_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%d %H:%M:%f', 'now'))
)",
    "CREATE TRIGGER tasks_touch_updated_at AFTER UPDATE ON tasks
FOR EACH ROW
BEGIN
UPDATE tasks SET updated_at = STRFTIME('%Y-%m-%d %H:%M:%f', 'now') WHERE id = NEW.id;
END",
    "CREATE TABLE notes (
id TEXT NOT NULL PRIMARY KEY,
task_id TEXT NOT NULL REFERENCES tasks (id),
body TEXT NOT NULL
)",
];

/// In-memory sqlite with one pooled connection so every statement (and the
/// PRAGMA) sees the same database.
pub async fn setup() -> Db {
    let cfg = DbConfig {
        dsn: "sqlite::memory:".to_owned(),
        max_conns: 1,
        ..DbConfig::default()
    };
    let db = Db::connect(&cfg).await.expect("failed to connect");
    for stmt in SCHEMA {
        db.conn()
            .execute_unprepared(stmt)
            .await
            .expect("failed to apply schema");
    }
    db
}

pub fn new_task(name: &str, point: i64) -> task::ActiveModel {
    task::ActiveModel {
        name: Set(name.to_owned()),
        point: Set(point),
        ..task::ActiveModel::default()
    }
}

pub fn new_note(task_id: &str, body: &str) -> note::ActiveModel {
    note::ActiveModel {
        task_id: Set(task_id.to_owned()),
        body: Set(body.to_owned()),
        ..note::ActiveModel::default()
    }
}

/// Insert `n` tasks named `t0..t(n-1)`, point = index modulo 3 so several
/// rows share a point value. Returns ids in insertion order.
pub async fn seed_tasks(db: &Db, n: i64) -> Vec<String> {
    let mut ids = Vec::new();
    for i in 0..n {
        let model =
            relkit_db::ops::insert::<task::Entity, _>(
                db.conn(),
                new_task(&format!("t{i}"), i % 3),
                relkit_db::WarnMode::Always,
            )
            .await
            .expect("seed insert failed");
        ids.push(model.id);
    }
    ids
}
