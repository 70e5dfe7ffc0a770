use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::IntoParams;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::ApiError;
use crate::notifications::NotificationResponse;

const ACTOR_HEADER: &str = "x-actor-name";
const DEFAULT_ACTOR: &str = "Default";

/// 200 response with the success envelope around `data`.
pub fn success_response<T: Serialize>(message: impl Into<String>, data: &T) -> Response {
    let payload = serde_json::to_value(data).unwrap_or(Value::Null);
    (
        StatusCode::OK,
        Json(NotificationResponse::success(message, Some(payload))),
    )
        .into_response()
}

/// 201 response with the success envelope around `data`.
pub fn created_response<T: Serialize>(message: impl Into<String>, data: &T) -> Response {
    let payload = serde_json::to_value(data).unwrap_or(Value::Null);
    (
        StatusCode::CREATED,
        Json(NotificationResponse::success(message, Some(payload))),
    )
        .into_response()
}

/// 200 response with the success envelope and no payload.
pub fn message_response(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(NotificationResponse::success(message, None)),
    )
        .into_response()
}

/// Validate a request payload, joining every field error (including nested
/// line errors) into one message.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|errors| {
        let mut messages = Vec::new();
        collect_messages(&errors, &mut messages);
        ApiError::Validation(messages.join(", "))
    })
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{field} is invalid"),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(nested_by_index) => {
                for nested in nested_by_index.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

/// Monetary amounts must not be negative.
pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("non_negative_amount"));
    }
    Ok(())
}

/// Name of the requesting user, taken from the `x-actor-name` header with a
/// fallback, used to stamp audit columns.
#[derive(Clone, Debug)]
pub struct RequestActor(String);

impl RequestActor {
    pub fn name(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ACTOR);
        Ok(RequestActor(name.to_string()))
    }
}

/// Pagination parameters for list operations
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Page clamped to at least 1.
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Page size clamped to 1..=100.
    pub fn per_page(&self) -> u64 {
        self.per_page.clamp(1, 100)
    }
}

/// Standard pagination response metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        Self {
            items,
            pagination: PaginationMeta::new(page, per_page, total),
        }
    }
}
