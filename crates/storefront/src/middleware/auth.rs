//! Backend bearer token extractor.
//!
//! The shop backend authenticates customers with a bearer token issued at
//! login. The storefront keeps it in the session and hands it to the backend
//! client on every call. A missing token is not an error: the backend gets an
//! anonymous request and decides for itself.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::SecretString;
use tower_sessions::Session;

use crate::models::session_keys;

/// Extractor that reads the optional backend bearer token from the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(BearerToken(token): BearerToken) -> impl IntoResponse {
///     state.backend().get_product(id, token.as_ref()).await
/// }
/// ```
pub struct BearerToken(pub Option<SecretString>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<String>(session_keys::AUTH_TOKEN)
                .await
                .ok()
                .flatten()
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            None => None,
        };

        Ok(Self(token))
    }
}

/// Store the backend bearer token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_TOKEN, token).await
}

/// Remove the backend bearer token from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_token(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(session_keys::AUTH_TOKEN).await?;
    Ok(())
}
