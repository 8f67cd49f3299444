//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Handlers that can fail outside the page's own
//! error states return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;

/// HTMX event carrying an alert message for the shopper.
pub const CART_ERROR_EVENT: &str = "cart-error";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart action could not reach the backend or read its answer.
    ///
    /// `alert` is the message the page shows the shopper.
    #[error("{alert} ({source})")]
    CartAction {
        alert: &'static str,
        #[source]
        source: BackendError,
    },

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CartAction { .. } => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Session(_) | Self::CartAction { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        match self {
            // The page alerts the message and keeps the drawer as it is
            Self::CartAction { alert, .. } => (
                status,
                AppendHeaders([
                    ("HX-Trigger", alert_trigger(alert)),
                    ("HX-Reswap", "none".to_string()),
                ]),
                alert,
            )
                .into_response(),
            // Don't expose internal error details to clients
            Self::Session(_) => (status, "Internal server error").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// `HX-Trigger` payload that makes the page `alert()` the message.
fn alert_trigger(message: &str) -> String {
    serde_json::json!({ CART_ERROR_EVENT: message }).to_string()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
