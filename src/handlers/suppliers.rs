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
use crate::services::suppliers::SupplierInput;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SupplierRequest {
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

impl From<SupplierRequest> for SupplierInput {
    fn from(payload: SupplierRequest) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            mobile: payload.mobile,
            address: payload.address,
        }
    }
}

async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (items, total) = state.services.suppliers.list(page, per_page).await?;
    let body = PaginatedResponse::new(items, page, per_page, total);
    Ok(success_response("Suppliers loaded successfully", &body))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let supplier = state.services.suppliers.get(id).await?;
    Ok(success_response("Supplier loaded successfully", &supplier))
}

async fn create_supplier(
    State(state): State<AppState>,
    actor: RequestActor,
    Json(payload): Json<SupplierRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let supplier = state
        .services
        .suppliers
        .create(actor.name(), payload.into())
        .await?;
    Ok(created_response("Supplier created successfully", &supplier))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
    Json(payload): Json<SupplierRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let supplier = state
        .services
        .suppliers
        .update(actor.name(), id, payload.into())
        .await?;
    Ok(success_response("Supplier updated successfully", &supplier))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.suppliers.delete(id).await?;
    Ok(message_response("Supplier deleted successfully"))
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier)
                .put(update_supplier)
                .delete(delete_supplier),
        )
}
