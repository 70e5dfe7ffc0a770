//! Uniform notification envelope for JSON endpoints.
//!
//! Every API response carries the same shape:
//! `{ success, message, data, notificationType }`, with `notificationType`
//! derived from the outcome flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    /// Payload of the operation; `null` when there is nothing to return.
    pub data: Option<Value>,
    pub notification_type: NotificationKind,
}

impl NotificationResponse {
    pub fn new(success: bool, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success,
            message: message.into(),
            data,
            notification_type: if success {
                NotificationKind::Success
            } else {
                NotificationKind::Error
            },
        }
    }

    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self::new(true, message, data)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, message, None)
    }
}
