use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::payload::{CreateSubscriptionRequest, SummaryResponse, UpdateSubscriptionRequest};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Stored subscription as returned by the API. `end_date` is omitted when open-ended.
#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    #[schema(example = "2025-07-01T00:00:00Z")]
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub message: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::summary,
    ),
    components(
        schemas(
            HealthResponse,
            SubscriptionDoc,
            ErrorDoc,
            CreateSubscriptionRequest,
            UpdateSubscriptionRequest,
            SummaryResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
