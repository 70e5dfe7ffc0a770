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
use crate::services::categories::CategoryInput;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Category name is required and cannot exceed 100 characters"
    ))]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: String,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(payload: CategoryRequest) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
        }
    }
}

async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (items, total) = state.services.categories.list(page, per_page).await?;
    let body = PaginatedResponse::new(items, page, per_page, total);
    Ok(success_response("Categories loaded successfully", &body))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let category = state.services.categories.get(id).await?;
    Ok(success_response("Category loaded successfully", &category))
}

async fn create_category(
    State(state): State<AppState>,
    actor: RequestActor,
    Json(payload): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let category = state
        .services
        .categories
        .create(actor.name(), payload.into())
        .await?;
    Ok(created_response("Category created successfully", &category))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
    Json(payload): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let category = state
        .services
        .categories
        .update(actor.name(), id, payload.into())
        .await?;
    Ok(success_response("Category updated successfully", &category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.categories.delete(id).await?;
    Ok(message_response("Category deleted successfully"))
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}
