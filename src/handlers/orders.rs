use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{
    created_response, message_response, success_response, validate_non_negative_amount,
    validate_payload, PaginatedResponse, PaginationParams, RequestActor,
};
use crate::entities::OrderStatus;
use crate::errors::ApiError;
use crate::services::orders::{CreateOrderInput, OrderLineInput, UpdateOrderInput};
use crate::AppState;

/// One order line as submitted by the client. `total_price` is never
/// accepted from the payload; it is derived before saving.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub id: Option<i64>,
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom(
        function = "validate_non_negative_amount",
        message = "Unit price cannot be negative"
    ))]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    #[validate]
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

/// Full replacement of the order: persisted lines absent from `lines` are
/// removed, lines without an id are added.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    #[validate]
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

impl From<OrderLineRequest> for OrderLineInput {
    fn from(payload: OrderLineRequest) -> Self {
        Self {
            id: payload.id,
            product_id: payload.product_id,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
        }
    }
}

impl From<CreateOrderRequest> for CreateOrderInput {
    fn from(payload: CreateOrderRequest) -> Self {
        Self {
            customer_id: payload.customer_id,
            order_date: payload.order_date,
            status: payload.status,
            lines: payload.lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<UpdateOrderRequest> for UpdateOrderInput {
    fn from(payload: UpdateOrderRequest) -> Self {
        Self {
            customer_id: payload.customer_id,
            order_date: payload.order_date,
            status: payload.status,
            lines: payload.lines.into_iter().map(Into::into).collect(),
        }
    }
}

async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (items, total) = state.services.orders.list(page, per_page).await?;
    let body = PaginatedResponse::new(items, page, per_page, total);
    Ok(success_response("Orders loaded successfully", &body))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let order = state.services.orders.get(id).await?;
    Ok(success_response("Order loaded successfully", &order))
}

async fn create_order(
    State(state): State<AppState>,
    actor: RequestActor,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let order = state
        .services
        .orders
        .create(actor.name(), payload.into())
        .await?;
    Ok(created_response("Order created successfully", &order))
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let order = state
        .services
        .orders
        .update(actor.name(), id, payload.into())
        .await?;
    Ok(success_response("Order updated successfully", &order))
}

async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.orders.delete(id).await?;
    Ok(message_response("Order deleted successfully"))
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
}
