//! Product record as served by the shop backend.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product snapshot.
///
/// Fetched once per page view and never mutated. Every field except the
/// price is optional on the wire; missing text fields come back empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    /// Units in stock.
    #[serde(default, rename = "inMagazzino")]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Crema viso",
            "price": 24.9,
            "imageUrl": "https://cdn.example.com/crema.jpg",
            "description": "Idratante",
            "brand": "Verde",
            "inMagazzino": 12,
            "category": "Skincare"
        }))
        .unwrap();

        assert_eq!(product.id, Some(ProductId::new(3)));
        assert_eq!(product.name, "Crema viso");
        assert_eq!(product.price, Price::from_cents(2490));
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.com/crema.jpg")
        );
        assert_eq!(product.stock, 12);
        assert_eq!(product.category, "Skincare");
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let product: Product = serde_json::from_value(json!({ "price": 5 })).unwrap();

        assert_eq!(product.id, None);
        assert!(product.name.is_empty());
        assert!(product.image_url.is_none());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let result = serde_json::from_value::<Product>(json!({ "name": "No price" }));
        assert!(result.is_err());
    }
}
