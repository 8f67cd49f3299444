//! Product route handlers.
//!
//! The product page is served in two steps: the page shell renders right
//! away with a loading indicator, then HTMX swaps in the details fragment
//! once the backend has answered.
//!
//! Each shell starts a new view with an empty, closed cart drawer. The badge
//! count carries over between pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{Product, ProductId};

use crate::filters;
use crate::middleware::BearerToken;
use crate::models::{load_signal, reset_mirror};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub description: String,
    pub brand: String,
    pub stock: i64,
    pub category: String,
}

impl ProductView {
    /// Build the view for the product requested at `id`.
    ///
    /// The add-to-cart button always targets the requested ID, whatever ID
    /// the backend echoes in the record.
    #[must_use]
    pub fn new(id: ProductId, product: Product) -> Self {
        Self {
            id,
            name: product.name,
            price: product.price.to_string(),
            image_url: product.image_url.unwrap_or_default(),
            description: product.description,
            brand: product.brand,
            stock: product.stock,
            category: product.category,
        }
    }
}

/// What the details fragment shows.
#[derive(Clone)]
pub enum ProductState {
    Loaded(ProductView),
    NotFound,
    Error(String),
}

/// Product page template (shell with loading indicator).
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product_id: ProductId,
    pub cart: CartView,
    pub count: u32,
}

/// Product details fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_details.html")]
pub struct ProductDetailsTemplate {
    pub state: ProductState,
}

/// Display the product page shell.
#[instrument(skip(session))]
pub async fn show(
    session: Session,
    Path(id): Path<ProductId>,
) -> crate::error::Result<impl IntoResponse> {
    let mirror = reset_mirror(&session).await?;
    let signal = load_signal(&session).await?;

    Ok(ProductShowTemplate {
        product_id: id,
        cart: CartView::from(&mirror),
        count: signal.count(),
    })
}

/// Display the product details fragment (for HTMX).
///
/// Backend failures render an inline error instead of failing the request.
#[instrument(skip(state, token))]
pub async fn details(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<ProductId>,
) -> impl IntoResponse {
    let page = match state.backend().get_product(id, token.as_ref()).await {
        Ok(Some(product)) => ProductState::Loaded(ProductView::new(id, product)),
        Ok(None) => ProductState::NotFound,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching product details");
            ProductState::Error(e.user_message().to_string())
        }
    };

    ProductDetailsTemplate { state: page }
}
