//! Entity round trips against a live PostgreSQL.
//! Skipped unless `DATABASE_URL` is set and `SKIP_DB_TESTS` is not.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{db, subscription};

// Migrations run once per test process, not once per test
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

async fn setup_test_db() -> Result<DatabaseConnection> {
    MIGRATED
        .get_or_init(|| async {
            let db = db::connect().await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;
    db::connect().await
}

#[tokio::test]
async fn subscription_entity_round_trip() -> Result<()> {
    if !db_tests_enabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let model = subscription::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        service_name: "Yandex Plus".into(),
        price: 400,
        start_date: Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap(),
        end_date: Some(Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()),
    };
    let inserted = model.clone().into_active_model().insert(&db).await?;
    assert_eq!(inserted, model);

    let found = subscription::Entity::find()
        .filter(subscription::Column::UserId.eq(model.user_id))
        .all(&db)
        .await?;
    assert_eq!(found, vec![model.clone()]);

    let res = subscription::Entity::delete_by_id(model.id).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);
    assert!(subscription::Entity::find_by_id(model.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn price_check_constraint_rejects_non_positive() -> Result<()> {
    if !db_tests_enabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let model = subscription::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        service_name: "Broken".into(),
        price: 0,
        start_date: Utc::now(),
        end_date: None,
    };
    assert!(model.into_active_model().insert(&db).await.is_err());
    Ok(())
}
