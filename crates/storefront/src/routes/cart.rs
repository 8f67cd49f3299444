//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The backend owns the cart; each add or remove replaces the session's cart
//! mirror with the snapshot the backend answered with and re-renders the
//! drawer fragment.
//!
//! Concurrent actions are not sequenced: whichever backend reply is written
//! to the session last is what the shopper sees.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{CartLine, CartMirror, ProductId};

use crate::backend::BackendError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::BearerToken;
use crate::models::{load_mirror, load_signal, save_mirror, save_signal};
use crate::state::AppState;

/// Alert shown when adding to the cart fails.
pub const ADD_FAILED_MESSAGE: &str = "Errore durante l'aggiunta al carrello.";

/// Alert shown when removing from the cart fails.
pub const REMOVE_FAILED_MESSAGE: &str = "Errore durante la rimozione dal carrello.";

/// HTMX event fired after the cart changed.
const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub quantity: u32,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            price: line.price.to_string(),
            image_url: line.image_url.clone().unwrap_or_default(),
            quantity: line.quantity,
        }
    }
}

/// Cart drawer display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub open: bool,
}

impl From<&CartMirror> for CartView {
    fn from(mirror: &CartMirror) -> Self {
        Self {
            lines: mirror.lines().iter().map(CartLineView::from).collect(),
            total: mirror.total().to_string(),
            open: mirror.is_open(),
        }
    }
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

impl CartDrawerTemplate {
    fn from_mirror(mirror: &CartMirror) -> Self {
        Self {
            cart: CartView::from(mirror),
        }
    }
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart drawer.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let mirror = load_mirror(&session).await?;
    Ok(CartDrawerTemplate::from_mirror(&mirror))
}

/// Add a product to the cart (HTMX).
///
/// The cart signal is bumped before the backend is called and stays bumped
/// if the call fails.
#[instrument(skip(state, session, token))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    BearerToken(token): BearerToken,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    let signal = load_signal(&session).await?.added();
    save_signal(&session, signal).await?;
    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("product_id", &id.to_string())]),
    );

    match state.backend().add_to_cart(id, token.as_ref()).await {
        Ok(snapshot) => {
            let mut mirror = load_mirror(&session).await?;
            mirror.apply_added(snapshot);
            save_mirror(&session, &mirror).await?;
            Ok(cart_updated(&mirror))
        }
        Err(e) => cart_failure(&session, e, ADD_FAILED_MESSAGE).await,
    }
}

/// Remove a product from the cart (HTMX).
///
/// Closes the drawer when the cart comes back empty.
#[instrument(skip(state, session, token))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    BearerToken(token): BearerToken,
    Path(product_id): Path<ProductId>,
) -> Result<Response> {
    let signal = load_signal(&session).await?.removed();
    save_signal(&session, signal).await?;
    add_breadcrumb(
        "cart",
        "Remove from cart",
        Some(&[("product_id", &product_id.to_string())]),
    );

    match state
        .backend()
        .remove_from_cart(product_id, token.as_ref())
        .await
    {
        Ok(snapshot) => {
            let mut mirror = load_mirror(&session).await?;
            mirror.apply_removed(snapshot);
            save_mirror(&session, &mirror).await?;
            tracing::debug!(lines = mirror.lines().len(), "Cart after removal");
            Ok(cart_updated(&mirror))
        }
        Err(e) => cart_failure(&session, e, REMOVE_FAILED_MESSAGE).await,
    }
}

/// Close the cart drawer.
#[instrument(skip(session))]
pub async fn close(session: Session) -> Result<impl IntoResponse> {
    let mut mirror = load_mirror(&session).await?;
    mirror.close();
    save_mirror(&session, &mirror).await?;
    Ok(CartDrawerTemplate::from_mirror(&mirror))
}

/// Get the cart signal badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let signal = load_signal(&session).await?;
    Ok(CartCountTemplate {
        count: signal.count(),
    })
}

/// Redirect to the checkout page.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config().checkout_path)
}

fn cart_updated(mirror: &CartMirror) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartDrawerTemplate::from_mirror(mirror),
    )
        .into_response()
}

/// Turn a failed cart action into a response.
///
/// A reply with the wrong shape is only logged and the drawer is re-rendered
/// unchanged; the badge still refreshes since the signal already moved.
/// Anything else alerts the shopper.
async fn cart_failure(
    session: &Session,
    err: BackendError,
    alert: &'static str,
) -> Result<Response> {
    if let BackendError::MalformedCart(detail) = &err {
        tracing::error!(detail = %detail, "Unexpected cart response format");
        let mirror = load_mirror(session).await?;
        return Ok(cart_updated(&mirror));
    }

    Err(AppError::CartAction { alert, source: err })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{CartSnapshot, Price};

    use super::*;

    #[test]
    fn test_cart_view_formats_prices() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(
            CartSnapshot::new(vec![CartLine {
                product_id: ProductId::new(1),
                name: "A".to_string(),
                price: Price::from_cents(1000),
                image_url: None,
                quantity: 2,
            }])
            .unwrap(),
        );

        let view = CartView::from(&mirror);

        assert!(view.open);
        assert_eq!(view.total, "20 €");
        assert_eq!(view.lines[0].price, "10 €");
        assert_eq!(view.lines[0].quantity, 2);
    }

    #[test]
    fn test_empty_drawer_renders_placeholder() {
        let html = CartDrawerTemplate::from_mirror(&CartMirror::default())
            .render()
            .unwrap();

        assert!(html.contains("Nessun prodotto nel carrello"));
        assert!(!html.contains("Totale parziale"));
    }

    #[test]
    fn test_filled_drawer_renders_lines_and_total() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(
            CartSnapshot::new(vec![CartLine {
                product_id: ProductId::new(4),
                name: "Sapone".to_string(),
                price: Price::from_cents(350),
                image_url: Some("https://cdn.example.com/sapone.jpg".to_string()),
                quantity: 3,
            }])
            .unwrap(),
        );

        let html = CartDrawerTemplate::from_mirror(&mirror).render().unwrap();

        assert!(html.contains("Sapone"));
        assert!(html.contains("Quantità: 3"));
        assert!(html.contains("Totale parziale: 10.5 €"));
        assert!(html.contains("/cart/remove/4"));
        assert!(html.contains("drawer--open"));
    }
}
