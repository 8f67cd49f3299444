//! Backend product identifiers.
//!
//! The shop backend numbers its products with plain integers. They show up
//! in URL paths (`/products/{id}`) and in cart lines (`productId`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A backend product ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serde_is_transparent() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId::new(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_product_id_rejects_non_numbers() {
        assert!(serde_json::from_str::<ProductId>("\"seven\"").is_err());
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::new(123).to_string(), "123");
    }
}
