//! Core types for the shopfront storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{
    CartLine, CartMirror, CartSignal, CartSnapshot, TotalOverflow, cart_total, dedup_lines,
};
pub use id::ProductId;
pub use price::Price;
pub use product::Product;
