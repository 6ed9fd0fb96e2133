use chrono::{DateTime, Utc};
use uuid::Uuid;

use models::subscription;

/// Validated create payload. `id` is not part of it: the service mints one.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubscriptionInput {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Validated update payload: every mutable field, replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSubscriptionInput {
    pub service_name: String,
    pub price: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl UpdateSubscriptionInput {
    /// Overwrite the mutable fields of `sub`, leaving `id` and `user_id` alone.
    pub fn apply_to(self, sub: &mut subscription::Model) {
        sub.service_name = self.service_name;
        sub.price = self.price;
        sub.start_date = self.start_date;
        sub.end_date = self.end_date;
    }
}

/// Conjunctive filter for the price summary. `None` fields add no predicate.
///
/// Both date bounds apply to `start_date`: `end_date` is an upper bound on when a
/// subscription started, not on when it ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl SummaryFilter {
    /// In-process evaluation of the same predicate the SQL query applies.
    pub fn matches(&self, sub: &subscription::Model) -> bool {
        self.user_id.map_or(true, |u| sub.user_id == u)
            && self.service_name.as_deref().map_or(true, |n| sub.service_name == n)
            && self.start_date.map_or(true, |from| sub.start_date >= from)
            && self.end_date.map_or(true, |until| sub.start_date <= until)
    }
}
