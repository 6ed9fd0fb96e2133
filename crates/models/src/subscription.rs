use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const SERVICE_NAME_MIN_LEN: usize = 2;
pub const SERVICE_NAME_MAX_LEN: usize = 100;

/// A user's subscription to a paid service.
///
/// `price` is in minor currency units. `end_date` of `None` means open-ended and is
/// left out of the JSON representation entirely.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: DateTimeUtc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Length is counted in characters, not bytes.
pub fn validate_service_name(name: &str) -> Result<(), ModelError> {
    let len = name.chars().count();
    if !(SERVICE_NAME_MIN_LEN..=SERVICE_NAME_MAX_LEN).contains(&len) {
        return Err(ModelError::Validation(format!(
            "service_name must be between {SERVICE_NAME_MIN_LEN} and {SERVICE_NAME_MAX_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

/// Accepts any integer the JSON layer produced and narrows it to the column type.
pub fn validate_price(price: i64) -> Result<i32, ModelError> {
    if price <= 0 {
        return Err(ModelError::Validation("price must be greater than 0".into()));
    }
    i32::try_from(price)
        .map_err(|_| ModelError::Validation(format!("price must not exceed {}", i32::MAX)))
}
