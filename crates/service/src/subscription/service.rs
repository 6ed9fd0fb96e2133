use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::subscription;

use super::domain::{CreateSubscriptionInput, SummaryFilter, UpdateSubscriptionInput};
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Subscription business service independent of web framework.
///
/// Inputs arrive already validated; the service owns identity assignment and
/// the read-modify-write shape of updates.
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Persist a new subscription under a freshly minted id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::Utc;
    /// use service::subscription::{domain::CreateSubscriptionInput, repository::mock::MockSubscriptionRepository, SubscriptionService};
    /// let svc = SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()));
    /// let input = CreateSubscriptionInput {
    ///     user_id: uuid::Uuid::new_v4(),
    ///     service_name: "Netflix".into(),
    ///     price: 500,
    ///     start_date: Utc::now(),
    ///     end_date: None,
    /// };
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// let created = rt.block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.service_name, "Netflix");
    /// ```
    #[instrument(skip(self, input), fields(user_id = %input.user_id, service_name = %input.service_name))]
    pub async fn create(&self, input: CreateSubscriptionInput) -> Result<subscription::Model, ServiceError> {
        let sub = subscription::Model {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            service_name: input.service_name,
            price: input.price,
            start_date: input.start_date,
            end_date: input.end_date,
        };
        self.repo.create(&sub).await.map_err(|e| e.context("create subscription"))?;
        info!(subscription_id = %sub.id, "subscription_created");
        Ok(sub)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<subscription::Model, ServiceError> {
        self.repo.get_by_id(id).await.map_err(|e| e.context("get subscription"))
    }

    /// Replace the mutable fields of an existing subscription. `user_id` never changes.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateSubscriptionInput) -> Result<subscription::Model, ServiceError> {
        let mut sub = self.repo.get_by_id(id).await.map_err(|e| e.context("load subscription for update"))?;
        input.apply_to(&mut sub);
        self.repo.update(&sub).await.map_err(|e| e.context("update subscription"))?;
        info!(subscription_id = %id, "subscription_updated");
        Ok(sub)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(|e| e.context("delete subscription"))?;
        info!(subscription_id = %id, "subscription_deleted");
        Ok(())
    }

    /// Sum of `price` over every subscription the filter matches; 0 if none do.
    #[instrument(skip(self))]
    pub async fn summary(&self, filter: SummaryFilter) -> Result<i64, ServiceError> {
        self.repo.summary(&filter).await.map_err(|e| e.context("summarize subscriptions"))
    }
}
