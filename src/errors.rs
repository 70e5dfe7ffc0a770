use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use tracing::error;

use crate::notifications::NotificationResponse;

/// Errors produced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),
}

/// Errors surfaced at the HTTP boundary. Rendered as the notification
/// envelope with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err {
                ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Message safe to echo to the client. Database failures are reported
    /// generically; the detail only goes to the log.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Service(ServiceError::Database(_)) => {
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = NotificationResponse::error(self.client_message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(ServiceError::NotFound("Customer not found".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_message(), "Customer not found");
    }

    #[test]
    fn database_errors_are_not_echoed_to_clients() {
        let err = ApiError::from(ServiceError::Database(DbErr::Custom(
            "connection refused on 10.0.0.5".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.client_message().contains("10.0.0.5"));
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = ApiError::from(ServiceError::Conflict(
            "Order was modified by another request".into(),
        ));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
