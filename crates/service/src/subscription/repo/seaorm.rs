use sea_orm::{ActiveValue::{NotSet, Set}, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter};
use uuid::Uuid;

use models::subscription::{self, ActiveModel, Column, Entity};

use crate::errors::ServiceError;
use crate::subscription::domain::SummaryFilter;
use crate::subscription::query::summary_select;
use crate::subscription::repository::SubscriptionRepository;

/// PostgreSQL-backed repository. `db` is a pooled handle; clones share the pool.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, sub: &subscription::Model) -> Result<(), ServiceError> {
        Entity::insert(sub.clone().into_active_model())
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<subscription::Model, ServiceError> {
        Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("subscription"))
    }

    async fn update(&self, sub: &subscription::Model) -> Result<(), ServiceError> {
        let changes = ActiveModel {
            id: NotSet,
            user_id: NotSet,
            service_name: Set(sub.service_name.clone()),
            price: Set(sub.price),
            start_date: Set(sub.start_date),
            end_date: Set(sub.end_date),
        };
        let res = Entity::update_many()
            .set(changes)
            .filter(Column::Id.eq(sub.id))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("subscription"));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let res = Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("subscription"));
        }
        Ok(())
    }

    async fn summary(&self, filter: &SummaryFilter) -> Result<i64, ServiceError> {
        // SUM over zero rows is NULL
        let total = summary_select(filter)
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await?
            .flatten()
            .unwrap_or(0);
        Ok(total)
    }
}
