//! Wire shapes for request bodies and query strings, and their conversion into validated
//! service inputs. Every field is optional on the wire so a missing field produces a
//! field-specific 400 instead of a generic decode failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use models::subscription::{validate_price, validate_service_name};
use service::subscription::domain::{CreateSubscriptionInput, SummaryFilter, UpdateSubscriptionInput};

use crate::errors::JsonApiError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: Option<String>,
    #[schema(example = "Yandex Plus")]
    pub service_name: Option<String>,
    #[schema(example = 400)]
    pub price: Option<i64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2025-07-01")]
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    #[schema(example = "Yandex Plus")]
    pub service_name: Option<String>,
    #[schema(example = 450)]
    pub price: Option<i64>,
    #[schema(example = "2025-07-01")]
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Summary filters. Empty values count as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Owner UUID.
    pub user_id: Option<String>,
    /// Exact service name.
    pub service_name: Option<String>,
    /// Lower bound on `start_date`, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Upper bound on `start_date`, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub total_price: i64,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, JsonApiError> {
    value.ok_or_else(|| JsonApiError::bad_request(format!("{field} is required")))
}

/// Decode a JSON body whatever `Content-Type` the client sent.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, JsonApiError> {
    serde_json::from_slice(body).map_err(|e| JsonApiError::bad_request(format!("invalid JSON body: {e}")))
}

pub fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|_| JsonApiError::bad_request(format!("{field} must be a valid UUID")))
}

/// RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, JsonApiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_date(raw, field)
        .map_err(|_| JsonApiError::bad_request(format!("{field} must be an RFC 3339 timestamp or YYYY-MM-DD")))
}

// Exactly `dddd-dd-dd`; chrono alone also takes `2025-1-1` and `+2025-01-01`
fn is_date_shaped(raw: &str) -> bool {
    raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn parse_date(raw: &str, field: &str) -> Result<DateTime<Utc>, JsonApiError> {
    Some(raw)
        .filter(|r| is_date_shaped(r))
        .and_then(|r| NaiveDate::parse_from_str(r, DATE_FORMAT).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| JsonApiError::bad_request(format!("{field} must use the YYYY-MM-DD format")))
}

fn checked_service_name(name: Option<String>) -> Result<String, JsonApiError> {
    let name = required(name, "service_name")?;
    validate_service_name(&name).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    Ok(name)
}

fn checked_price(price: Option<i64>) -> Result<i32, JsonApiError> {
    validate_price(required(price, "price")?).map_err(|e| JsonApiError::bad_request(e.to_string()))
}

fn optional_timestamp(raw: Option<String>, field: &str) -> Result<Option<DateTime<Utc>>, JsonApiError> {
    raw.map(|v| parse_timestamp(&v, field)).transpose()
}

impl CreateSubscriptionRequest {
    pub fn into_input(self) -> Result<CreateSubscriptionInput, JsonApiError> {
        let user_id = parse_uuid(&required(self.user_id, "user_id")?, "user_id")?;
        let service_name = checked_service_name(self.service_name)?;
        let price = checked_price(self.price)?;
        let start_date = parse_timestamp(&required(self.start_date, "start_date")?, "start_date")?;
        let end_date = optional_timestamp(self.end_date, "end_date")?;
        Ok(CreateSubscriptionInput { user_id, service_name, price, start_date, end_date })
    }
}

impl UpdateSubscriptionRequest {
    pub fn into_input(self) -> Result<UpdateSubscriptionInput, JsonApiError> {
        let service_name = checked_service_name(self.service_name)?;
        let price = checked_price(self.price)?;
        let start_date = parse_timestamp(&required(self.start_date, "start_date")?, "start_date")?;
        let end_date = optional_timestamp(self.end_date, "end_date")?;
        Ok(UpdateSubscriptionInput { service_name, price, start_date, end_date })
    }
}

impl SummaryQuery {
    pub fn into_filter(self) -> Result<SummaryFilter, JsonApiError> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Ok(SummaryFilter {
            user_id: present(self.user_id).map(|v| parse_uuid(&v, "user_id")).transpose()?,
            service_name: present(self.service_name),
            start_date: present(self.start_date).map(|v| parse_date(&v, "start_date")).transpose()?,
            end_date: present(self.end_date).map(|v| parse_date(&v, "end_date")).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::TimeZone;

    fn valid_create() -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            user_id: Some("60601fee-2bf1-4721-ae6f-7636e79a0cba".into()),
            service_name: Some("Yandex Plus".into()),
            price: Some(400),
            start_date: Some("2025-07-01".into()),
            end_date: None,
        }
    }

    fn message(err: JsonApiError) -> String {
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        err.message.unwrap_or_default()
    }

    #[test]
    fn valid_create_payload_converts() {
        let input = valid_create().into_input().unwrap();
        assert_eq!(input.price, 400);
        assert_eq!(input.start_date, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(input.end_date, None);
    }

    #[test]
    fn accepts_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-07-01T03:00:00+03:00", "start_date").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_bad_fields() {
        let req = CreateSubscriptionRequest { price: Some(0), ..valid_create() };
        assert!(message(req.into_input().unwrap_err()).contains("price"));

        let req = CreateSubscriptionRequest { service_name: Some("N".into()), ..valid_create() };
        assert!(message(req.into_input().unwrap_err()).contains("service_name"));

        let req = CreateSubscriptionRequest { service_name: Some("x".repeat(101)), ..valid_create() };
        assert!(message(req.into_input().unwrap_err()).contains("service_name"));

        let req = CreateSubscriptionRequest { start_date: None, ..valid_create() };
        assert_eq!(message(req.into_input().unwrap_err()), "start_date is required");

        let req = CreateSubscriptionRequest { user_id: Some("not-a-uuid".into()), ..valid_create() };
        assert_eq!(message(req.into_input().unwrap_err()), "user_id must be a valid UUID");

        let req = CreateSubscriptionRequest { end_date: Some("07-2025".into()), ..valid_create() };
        assert!(message(req.into_input().unwrap_err()).contains("end_date"));

        let req = CreateSubscriptionRequest { price: Some(i64::from(i32::MAX) + 1), ..valid_create() };
        assert!(message(req.into_input().unwrap_err()).contains("price"));
    }

    #[test]
    fn dates_must_be_zero_padded() {
        for raw in ["2025-1-1", "+2025-01-01", "2025-01-1", " 2025-01-01", "2025/01/01"] {
            assert!(parse_date(raw, "start_date").is_err(), "{raw}");
            assert!(parse_timestamp(raw, "start_date").is_err(), "{raw}");
        }
        assert!(parse_date("2025-02-30", "start_date").is_err());
        assert!(parse_date("2025-02-28", "start_date").is_ok());
    }

    #[test]
    fn uuids_are_not_trimmed() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string(), "id").unwrap(), id);
        assert!(parse_uuid(&format!(" {id}"), "id").is_err());
        assert!(parse_uuid(&format!("{id}\n"), "id").is_err());
    }

    #[test]
    fn body_decoding_reports_bad_json() {
        let req: CreateSubscriptionRequest = decode_body(br#"{"service_name":"Netflix","price":5}"#).unwrap();
        assert_eq!(req.price, Some(5));
        let err = decode_body::<CreateSubscriptionRequest>(b"{\"price\":").unwrap_err();
        assert!(message(err).starts_with("invalid JSON body"));
        assert!(decode_body::<CreateSubscriptionRequest>(br#"{"price":"5"}"#).is_err());
    }

    #[test]
    fn update_payload_requires_every_mutable_field() {
        let req = UpdateSubscriptionRequest {
            service_name: Some("Netflix Premium".into()),
            price: None,
            start_date: Some("2024-01-01".into()),
            end_date: None,
        };
        assert_eq!(message(req.into_input().unwrap_err()), "price is required");
    }

    #[test]
    fn start_after_end_is_accepted() {
        let req = CreateSubscriptionRequest { end_date: Some("2024-01-01".into()), ..valid_create() };
        let input = req.into_input().unwrap();
        assert!(input.end_date.unwrap() < input.start_date);
    }

    #[test]
    fn summary_query_treats_empty_as_absent() {
        let q = SummaryQuery { user_id: Some(String::new()), service_name: Some(String::new()), ..Default::default() };
        assert_eq!(q.into_filter().unwrap(), SummaryFilter::default());
    }

    #[test]
    fn summary_query_dates_are_date_only() {
        let q = SummaryQuery { start_date: Some("2025-01-01".into()), ..Default::default() };
        assert_eq!(q.into_filter().unwrap().start_date, Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));

        let q = SummaryQuery { start_date: Some("2025-01-01T00:00:00Z".into()), ..Default::default() };
        assert!(message(q.into_filter().unwrap_err()).contains("start_date"));

        let q = SummaryQuery { user_id: Some("42".into()), ..Default::default() };
        assert!(q.into_filter().is_err());
    }
}
