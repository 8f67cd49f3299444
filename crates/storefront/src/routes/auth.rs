//! Backend token route handlers.
//!
//! Login happens against the shop backend elsewhere; the resulting bearer
//! token is handed to the storefront so it can act on the customer's cart.

use axum::{Form, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{clear_auth_token, set_auth_token};

/// Token form data.
#[derive(Deserialize)]
pub struct TokenForm {
    pub token: String,
}

/// Store the backend bearer token in the session.
#[instrument(skip(session, form))]
pub async fn store_token(session: Session, Form(form): Form<TokenForm>) -> Result<StatusCode> {
    let token = form.token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("token must not be empty".to_string()));
    }

    set_auth_token(&session, token).await?;
    tracing::info!("Backend token stored in session");
    Ok(StatusCode::NO_CONTENT)
}

/// Drop the backend bearer token from the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_auth_token(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
