#![allow(clippy::unwrap_used, clippy::expect_used)]
#![cfg(feature = "sqlite")]

mod common;

use std::time::Duration;

use common::{new_task, seed_tasks, setup, task};
use relkit_db::{ChangeSet, DataError, EntityBase, ExecMode, WarnMode, ops};
use sea_orm::Set;

#[tokio::test]
async fn insert_generates_tagged_id_and_engine_timestamps() {
    let db = setup().await;

    let model = ops::insert::<task::Entity, _>(db.conn(), new_task("alpha", 3), WarnMode::Always)
        .await
        .unwrap();

    assert!(model.id.starts_with("tas"), "id was {}", model.id);
    assert!(model.id.contains('_'));
    assert_eq!(model.name, "alpha");
    assert_eq!(model.point, 3);
    // Column defaults fill these in; the returned row must carry them.
    assert_eq!(model.created_at, model.updated_at);

    let fetched = ops::get::<task::Entity, _>(db.conn(), &model.id, false, WarnMode::Always)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, model);
}

#[tokio::test]
async fn insert_keeps_caller_supplied_id() {
    let db = setup().await;

    let mut am = new_task("alpha", 0);
    am.id = Set("task-custom".to_owned());
    let model = ops::insert::<task::Entity, _>(db.conn(), am, WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(model.id, "task-custom");
}

#[tokio::test]
async fn insert_rejects_unchanged_model() {
    let db = setup().await;

    let err = ops::insert::<task::Entity, _>(db.conn(), task::ActiveModel::default(), WarnMode::Always)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::EmptyInput(_)), "got {err:?}");
}

#[tokio::test]
async fn get_missing_row() {
    let db = setup().await;

    let none = ops::get::<task::Entity, _>(db.conn(), "absent", true, WarnMode::Always)
        .await
        .unwrap();
    assert!(none.is_none());

    let err = ops::get::<task::Entity, _>(db.conn(), "absent", false, WarnMode::Ignore)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound));
}

#[tokio::test]
async fn get_by_ids_semantics() {
    let db = setup().await;
    let ids = seed_tasks(&db, 3).await;

    let rows = ops::get_by_ids::<task::Entity, _>(db.conn(), &ids, WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    // Partial matches are fine, a fully-missing set is not.
    let mixed = vec![ids[0].clone(), "absent".to_owned()];
    let rows = ops::get_by_ids::<task::Entity, _>(db.conn(), &mixed, WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let err = ops::get_by_ids::<task::Entity, _>(db.conn(), &["absent".to_owned()], WarnMode::Ignore)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound));

    let err = ops::get_by_ids::<task::Entity, _>(db.conn(), &[], WarnMode::Always)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::EmptyInput(_)));
}

#[tokio::test]
async fn save_inserts_then_updates() {
    let db = setup().await;

    let created = ops::save::<task::Entity, _>(db.conn(), new_task("alpha", 1), WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(
        ops::count::<task::Entity, _>(db.conn(), WarnMode::Always)
            .await
            .unwrap(),
        1
    );

    let mut am = new_task("alpha-renamed", 2);
    am.id = Set(created.id.clone());
    let saved = ops::save::<task::Entity, _>(db.conn(), am, WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(saved.id, created.id);
    assert_eq!(saved.name, "alpha-renamed");
    assert_eq!(
        ops::count::<task::Entity, _>(db.conn(), WarnMode::Always)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn upsert_is_idempotent_on_id() {
    let db = setup().await;

    let created = ops::upsert::<task::Entity, _>(db.conn(), new_task("alpha", 1), WarnMode::Always)
        .await
        .unwrap();

    let mut am = new_task("alpha", 9);
    am.id = Set(created.id.clone());
    let updated = ops::upsert::<task::Entity, _>(db.conn(), am, WarnMode::Always)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.point, 9);
    assert_eq!(
        ops::count::<task::Entity, _>(db.conn(), WarnMode::Always)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn bulk_insert_counts_and_returns() {
    let db = setup().await;

    let inserted = ops::bulk_insert::<task::Entity, _>(
        db.conn(),
        vec![new_task("a", 1), new_task("b", 2)],
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert_eq!(inserted, 2);

    let models = ops::bulk_insert_returning::<task::Entity, _>(
        db.conn(),
        vec![new_task("c", 3), new_task("d", 4)],
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert_eq!(models.len(), 2);
    assert!(models.iter().all(|m| m.id.starts_with("tas")));
    let mut names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["c", "d"]);

    let err = ops::bulk_insert::<task::Entity, _>(db.conn(), Vec::new(), WarnMode::Always)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::EmptyInput(_)));
}

#[tokio::test]
async fn update_by_id_statement_and_instance_agree() {
    let db = setup().await;
    let ids = seed_tasks(&db, 2).await;

    let changes = ChangeSet::new().set(task::Column::Point, 42_i64);
    ops::update_by_id::<task::Entity, _>(
        db.conn(),
        &ids[0],
        &changes,
        ExecMode::Statement,
        WarnMode::Always,
    )
    .await
    .unwrap();
    ops::update_by_id::<task::Entity, _>(
        db.conn(),
        &ids[1],
        &changes,
        ExecMode::Instance,
        WarnMode::Always,
    )
    .await
    .unwrap();

    for id in &ids {
        let row = ops::get::<task::Entity, _>(db.conn(), id, false, WarnMode::Always)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.point, 42);
    }
}

#[tokio::test]
async fn update_by_id_missing_row_is_not_found() {
    let db = setup().await;

    let changes = ChangeSet::new().set(task::Column::Point, 1_i64);
    for mode in [ExecMode::Statement, ExecMode::Instance] {
        let err = ops::update_by_id::<task::Entity, _>(
            db.conn(),
            "absent",
            &changes,
            mode,
            WarnMode::Ignore,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DataError::NotFound));
    }
}

#[tokio::test]
async fn update_rejects_empty_change_set() {
    let db = setup().await;
    let ids = seed_tasks(&db, 1).await;

    let empty = ChangeSet::<task::Entity>::new();
    let err = ops::update_by_id::<task::Entity, _>(
        db.conn(),
        &ids[0],
        &empty,
        ExecMode::Statement,
        WarnMode::Always,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::EmptyInput(_)));
}

#[tokio::test]
async fn update_refreshes_updated_at() {
    let db = setup().await;
    let ids = seed_tasks(&db, 1).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let changes = ChangeSet::new().set(task::Column::Point, 7_i64);
    ops::update_by_id::<task::Entity, _>(
        db.conn(),
        &ids[0],
        &changes,
        ExecMode::Statement,
        WarnMode::Always,
    )
    .await
    .unwrap();

    let row = ops::get::<task::Entity, _>(db.conn(), &ids[0], false, WarnMode::Always)
        .await
        .unwrap()
        .unwrap();
    assert!(
        row.updated_at > row.created_at,
        "updated_at {} not past created_at {}",
        row.updated_at,
        row.created_at
    );
}

#[tokio::test]
async fn update_by_ids_reports_matched_rows() {
    let db = setup().await;
    let ids = seed_tasks(&db, 3).await;

    let changes = ChangeSet::new().set(task::Column::Point, 5_i64);
    let mixed = vec![ids[0].clone(), ids[1].clone(), "absent".to_owned()];
    let touched = ops::update_by_ids::<task::Entity, _>(db.conn(), &mixed, &changes, WarnMode::Once)
        .await
        .unwrap();
    assert_eq!(touched, 2);

    let err = ops::update_by_ids::<task::Entity, _>(db.conn(), &[], &changes, WarnMode::Always)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::EmptyInput(_)));
}

#[tokio::test]
async fn update_by_ids_with_only_stale_ids_is_not_found() {
    let db = setup().await;
    seed_tasks(&db, 2).await;

    let stale = vec!["absent-1".to_owned(), "absent-2".to_owned()];
    let changes = ChangeSet::new().set(task::Column::Point, 5_i64);
    let err = ops::update_by_ids::<task::Entity, _>(db.conn(), &stale, &changes, WarnMode::Ignore)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn update_by_where_zero_matches_honors_the_flag() {
    let db = setup().await;
    seed_tasks(&db, 2).await;

    let cond = || {
        relkit_db::build_condition(
            &[relkit_db::Where::eq("point", 999_i64)],
            task::Entity::field_map(),
        )
        .unwrap()
    };
    let changes = ChangeSet::new().set(task::Column::Point, 5_i64);

    let touched = ops::update_by_where::<task::Entity, _>(
        db.conn(),
        cond(),
        &changes,
        ExecMode::Statement,
        true,
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert_eq!(touched, 0);

    let err = ops::update_by_where::<task::Entity, _>(
        db.conn(),
        cond(),
        &changes,
        ExecMode::Statement,
        false,
        WarnMode::Ignore,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::NotFound));
}

#[tokio::test]
async fn update_by_where_returning_yields_new_rows() {
    let db = setup().await;
    // points cycle 0,1,2: t0 and t3 carry 0
    seed_tasks(&db, 4).await;

    let cond = relkit_db::build_condition(
        &[relkit_db::Where::eq("point", 0_i64)],
        task::Entity::field_map(),
    )
    .unwrap();
    let rows = ops::update_by_where_returning::<task::Entity, _>(
        db.conn(),
        cond,
        &ChangeSet::new().set(task::Column::Point, 100_i64),
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|m| m.point == 100));
}

#[tokio::test]
async fn update_all_touches_every_row() {
    let db = setup().await;
    seed_tasks(&db, 3).await;

    let touched = ops::update_all::<task::Entity, _>(
        db.conn(),
        &ChangeSet::new().set(task::Column::Point, 1_i64),
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert_eq!(touched, 3);
}

#[tokio::test]
async fn delete_by_id_both_modes() {
    let db = setup().await;
    let ids = seed_tasks(&db, 2).await;

    ops::delete_by_id::<task::Entity, _>(db.conn(), &ids[0], ExecMode::Statement, WarnMode::Always)
        .await
        .unwrap();
    ops::delete_by_id::<task::Entity, _>(db.conn(), &ids[1], ExecMode::Instance, WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(
        ops::count::<task::Entity, _>(db.conn(), WarnMode::Always)
            .await
            .unwrap(),
        0
    );

    let err =
        ops::delete_by_id::<task::Entity, _>(db.conn(), &ids[0], ExecMode::Statement, WarnMode::Ignore)
            .await
            .unwrap_err();
    assert!(matches!(err, DataError::NotFound));
}

#[tokio::test]
async fn delete_by_ids_and_all() {
    let db = setup().await;
    let ids = seed_tasks(&db, 4).await;

    let mixed = vec![ids[0].clone(), "absent".to_owned()];
    let removed = ops::delete_by_ids::<task::Entity, _>(db.conn(), &mixed, WarnMode::Debug)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let err = ops::delete_by_ids::<task::Entity, _>(db.conn(), &[], WarnMode::Always)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::EmptyInput(_)));

    let removed = ops::delete_all::<task::Entity, _>(db.conn(), WarnMode::Always)
        .await
        .unwrap();
    assert_eq!(removed, 3);
}

#[tokio::test]
async fn delete_by_ids_with_only_stale_ids_is_not_found() {
    let db = setup().await;
    seed_tasks(&db, 2).await;

    let stale = vec!["absent-1".to_owned(), "absent-2".to_owned()];
    let err = ops::delete_by_ids::<task::Entity, _>(db.conn(), &stale, WarnMode::Ignore)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound), "got {err:?}");

    assert_eq!(
        ops::count::<task::Entity, _>(db.conn(), WarnMode::Always)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn delete_by_where_zero_matches_honors_the_flag() {
    let db = setup().await;
    seed_tasks(&db, 2).await;

    let cond = || {
        relkit_db::build_condition(
            &[relkit_db::Where::eq("point", 999_i64)],
            task::Entity::field_map(),
        )
        .unwrap()
    };

    let removed = ops::delete_by_where::<task::Entity, _>(
        db.conn(),
        cond(),
        ExecMode::Statement,
        true,
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert_eq!(removed, 0);

    let err = ops::delete_by_where::<task::Entity, _>(
        db.conn(),
        cond(),
        ExecMode::Statement,
        false,
        WarnMode::Ignore,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::NotFound));
}

#[tokio::test]
async fn exists_and_count() {
    let db = setup().await;
    let ids = seed_tasks(&db, 3).await;

    assert!(
        ops::exists_by_id::<task::Entity, _>(db.conn(), &ids[0], WarnMode::Always)
            .await
            .unwrap()
    );
    assert!(
        !ops::exists_by_id::<task::Entity, _>(db.conn(), "absent", WarnMode::Always)
            .await
            .unwrap()
    );

    let hit = ops::exists::<task::Entity, _>(
        db.conn(),
        &[relkit_db::Where::eq("name", "t1")],
        WarnMode::Always,
    )
    .await
    .unwrap();
    assert!(hit);

    assert_eq!(
        ops::count::<task::Entity, _>(db.conn(), WarnMode::Always)
            .await
            .unwrap(),
        3
    );
}
