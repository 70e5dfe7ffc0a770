use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{
    created_response, message_response, success_response, validate_payload, PaginatedResponse,
    PaginationParams, RequestActor,
};
use crate::errors::ApiError;
use crate::services::customers::CustomerInput;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name is required and cannot exceed 100 characters"
    ))]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 20,
        message = "Mobile is required and cannot exceed 20 characters"
    ))]
    pub mobile: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Address is required and cannot exceed 500 characters"
    ))]
    pub address: String,
}

impl From<CustomerRequest> for CustomerInput {
    fn from(payload: CustomerRequest) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            mobile: payload.mobile,
            address: payload.address,
        }
    }
}

async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (items, total) = state.services.customers.list(page, per_page).await?;
    let body = PaginatedResponse::new(items, page, per_page, total);
    Ok(success_response("Customers loaded successfully", &body))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let customer = state.services.customers.get(id).await?;
    Ok(success_response("Customer loaded successfully", &customer))
}

async fn create_customer(
    State(state): State<AppState>,
    actor: RequestActor,
    Json(payload): Json<CustomerRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let customer = state
        .services
        .customers
        .create(actor.name(), payload.into())
        .await?;
    Ok(created_response("Customer created successfully", &customer))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
    Json(payload): Json<CustomerRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let customer = state
        .services
        .customers
        .update(actor.name(), id, payload.into())
        .await?;
    Ok(success_response("Customer updated successfully", &customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.customers.delete(id).await?;
    Ok(message_response("Customer deleted successfully"))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
}
