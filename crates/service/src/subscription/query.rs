use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Select};

use models::subscription::{Column, Entity};

use super::domain::SummaryFilter;

/// Alias of the aggregate column in the summary projection.
pub const TOTAL_PRICE_ALIAS: &str = "total_price";

/// Predicates in a fixed order: user, service, lower bound, upper bound.
pub fn summary_condition(filter: &SummaryFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(user_id) = filter.user_id {
        cond = cond.add(Column::UserId.eq(user_id));
    }
    if let Some(name) = &filter.service_name {
        cond = cond.add(Column::ServiceName.eq(name.as_str()));
    }
    if let Some(from) = filter.start_date {
        cond = cond.add(Column::StartDate.gte(from));
    }
    if let Some(until) = filter.end_date {
        cond = cond.add(Column::StartDate.lte(until));
    }
    cond
}

/// `SELECT SUM(price) AS total_price FROM subscriptions [WHERE ...]`, all values bound as parameters.
pub fn summary_select(filter: &SummaryFilter) -> Select<Entity> {
    let select = Entity::find()
        .select_only()
        .column_as(Column::Price.sum(), TOTAL_PRICE_ALIAS);
    let cond = summary_condition(filter);
    if cond.is_empty() {
        select
    } else {
        select.filter(cond)
    }
}
