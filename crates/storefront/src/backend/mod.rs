//! REST client for the shop backend.
//!
//! # Endpoints
//!
//! ```text
//! GET  /products/{id}                 - Product record (or `null`)
//! POST /customers/add/{id}            - Add product to the customer's cart
//! POST /customers/remove/{productId}  - Remove product from the customer's cart
//! ```
//!
//! Every request carries `Authorization: Bearer <token>` when the shopper has
//! a token in their session. The backend is the source of truth for the cart;
//! the storefront never caches its answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//!
//! let product = client.get_product(ProductId::new(1), token.as_ref()).await?;
//! let cart = client.add_to_cart(ProductId::new(1), token.as_ref()).await?;
//! ```

pub mod responses;

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use shopfront_core::{CartSnapshot, Product, ProductId};

use crate::config::BackendConfig;

/// How much of an error body is kept for logs.
const ERROR_BODY_LEN: usize = 500;

/// Errors that can occur when talking to the shop backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Cart reply did not have the expected shape.
    #[error("Unexpected cart response: {0}")]
    MalformedCart(String),
}

impl BackendError {
    /// Short message that is safe to show to shoppers.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Http(_) => "Failed to fetch",
            Self::Status { .. } => "Network response was not ok",
            Self::Parse(_) | Self::MalformedCart(_) => "Unexpected response from server",
        }
    }
}

/// Client for the shop backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&SecretString>) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self
            .inner
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => {
                debug!(path, "No auth token in session, calling backend anonymously");
                builder
            }
        }
    }

    /// Fetch a product by ID.
    ///
    /// Returns `Ok(None)` when the backend answers with a `null` body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not a product record.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        id: ProductId,
        token: Option<&SecretString>,
    ) -> Result<Option<Product>, BackendError> {
        let response = self
            .request(Method::GET, &format!("/products/{id}"), token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&body),
                "Backend returned non-success status for product"
            );
            return Err(BackendError::Status {
                status,
                body: truncate(&body),
            });
        }

        let product: Option<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse product response"
            );
            e
        })?;

        Ok(product)
    }

    /// Add a product to the customer's cart and return the new cart.
    ///
    /// Duplicate lines in the backend's answer are collapsed.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MalformedCart` when the reply has the wrong
    /// shape, or another variant on transport or JSON failure.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn add_to_cart(
        &self,
        id: ProductId,
        token: Option<&SecretString>,
    ) -> Result<CartSnapshot, BackendError> {
        let reply = self
            .post_cart_action(&format!("/customers/add/{id}"), token)
            .await?;
        responses::cart_after_add(reply)
    }

    /// Remove a product from the customer's cart and return the new cart.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MalformedCart` when the reply has the wrong
    /// shape, or another variant on transport or JSON failure.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn remove_from_cart(
        &self,
        id: ProductId,
        token: Option<&SecretString>,
    ) -> Result<CartSnapshot, BackendError> {
        let reply = self
            .post_cart_action(&format!("/customers/remove/{id}"), token)
            .await?;
        responses::cart_after_remove(reply)
    }

    /// POST a cart action and decode the reply as JSON.
    ///
    /// The status code is not checked: the reply shape decides success.
    async fn post_cart_action(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<Value, BackendError> {
        let response = self.request(Method::POST, path, token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = %status, "Cart action response received");

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                status = %status,
                body = %truncate(&body),
                "Failed to parse cart response"
            );
            BackendError::Parse(e)
        })
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LEN).collect()
}
