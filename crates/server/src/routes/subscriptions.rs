use axum::{
    body::Bytes,
    extract::{rejection::{BytesRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use models::subscription;

use crate::errors::JsonApiError;
use crate::payload::{decode_body, parse_uuid, CreateSubscriptionRequest, SummaryQuery, SummaryResponse, UpdateSubscriptionRequest};
use crate::routes::ServerState;

// Bodies are read as raw bytes so JSON is accepted without a JSON content type.
// Path<String> so a malformed id gets our message rather than the extractor's
fn subscription_id(path: Result<Path<String>, PathRejection>) -> Result<Uuid, JsonApiError> {
    let Path(raw) = path?;
    parse_uuid(&raw, "id")
}

#[utoipa::path(
    post, path = "/subscriptions", tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<subscription::Model>), JsonApiError> {
    let input = decode_body::<CreateSubscriptionRequest>(&body?)?.into_input()?;
    let created = state.subscriptions.create(input).await?;
    info!(id = %created.id, user_id = %created.user_id, "created subscription");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<subscription::Model>, JsonApiError> {
    let id = subscription_id(path)?;
    Ok(Json(state.subscriptions.get_by_id(id).await?))
}

#[utoipa::path(
    put, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = subscription_id(path)?;
    let input = decode_body::<UpdateSubscriptionRequest>(&body?)?.into_input()?;
    state.subscriptions.update(id, input).await?;
    info!(id = %id, "updated subscription");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = subscription_id(path)?;
    state.subscriptions.delete(id).await?;
    info!(id = %id, "deleted subscription");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/subscriptions/summary", tag = "subscriptions",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Total price of matching subscriptions", body = SummaryResponse),
        (status = 400, description = "Malformed filter", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn summary(
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, JsonApiError> {
    let Query(q) = query?;
    let filter = q.into_filter()?;
    let total_price = state.subscriptions.summary(filter).await?;
    Ok(Json(SummaryResponse { total_price }))
}
