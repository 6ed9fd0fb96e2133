use async_trait::async_trait;
use uuid::Uuid;

use models::subscription;

use super::domain::SummaryFilter;
use crate::errors::ServiceError;

/// Persistence contract for subscriptions.
///
/// `get_by_id`, `update` and `delete` report a missing row as [`ServiceError::NotFound`].
/// `summary` returns 0 when nothing matches.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, sub: &subscription::Model) -> Result<(), ServiceError>;
    async fn get_by_id(&self, id: Uuid) -> Result<subscription::Model, ServiceError>;
    /// Overwrites the mutable columns of the row with `sub.id`; `user_id` is never written.
    async fn update(&self, sub: &subscription::Model) -> Result<(), ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
    async fn summary(&self, filter: &SummaryFilter) -> Result<i64, ServiceError>;
}

/// In-memory repository for tests. Can be switched into failure modes to exercise error paths.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Mode {
        #[default]
        Normal,
        FailDb,
        Panic,
    }

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        rows: Mutex<HashMap<Uuid, subscription::Model>>, // key: id
        mode: Mutex<Mode>,
        latency: Mutex<Option<Duration>>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl MockSubscriptionRepository {
        /// Every subsequent call fails with a database error.
        pub fn fail_with_db_error(&self) { *lock(&self.mode) = Mode::FailDb; }

        /// Every subsequent call panics.
        pub fn panic_on_access(&self) { *lock(&self.mode) = Mode::Panic; }

        /// Every subsequent call waits `delay` before doing anything.
        pub fn respond_after(&self, delay: Duration) { *lock(&self.latency) = Some(delay); }

        pub fn insert(&self, sub: subscription::Model) { lock(&self.rows).insert(sub.id, sub); }

        pub fn snapshot(&self) -> Vec<subscription::Model> { lock(&self.rows).values().cloned().collect() }

        pub fn len(&self) -> usize { lock(&self.rows).len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        async fn check(&self) -> Result<(), ServiceError> {
            let delay = *lock(&self.latency);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match *lock(&self.mode) {
                Mode::Normal => Ok(()),
                Mode::FailDb => Err(ServiceError::Db("connection refused".into())),
                Mode::Panic => panic!("mock repository asked to panic"),
            }
        }
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn create(&self, sub: &subscription::Model) -> Result<(), ServiceError> {
            self.check().await?;
            let mut rows = lock(&self.rows);
            if rows.contains_key(&sub.id) {
                return Err(ServiceError::Db(format!("duplicate key value violates unique constraint: {}", sub.id)));
            }
            rows.insert(sub.id, sub.clone());
            Ok(())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<subscription::Model, ServiceError> {
            self.check().await?;
            lock(&self.rows).get(&id).cloned().ok_or_else(|| ServiceError::not_found("subscription"))
        }

        async fn update(&self, sub: &subscription::Model) -> Result<(), ServiceError> {
            self.check().await?;
            let mut rows = lock(&self.rows);
            let row = rows.get_mut(&sub.id).ok_or_else(|| ServiceError::not_found("subscription"))?;
            row.service_name = sub.service_name.clone();
            row.price = sub.price;
            row.start_date = sub.start_date;
            row.end_date = sub.end_date;
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
            self.check().await?;
            lock(&self.rows).remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("subscription"))
        }

        async fn summary(&self, filter: &SummaryFilter) -> Result<i64, ServiceError> {
            self.check().await?;
            Ok(lock(&self.rows)
                .values()
                .filter(|s| filter.matches(s))
                .map(|s| i64::from(s.price))
                .sum())
        }
    }
}
