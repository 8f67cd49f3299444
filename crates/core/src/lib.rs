//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront:
//! - [`Product`] - product snapshot served by the shop backend
//! - [`CartLine`] and [`CartMirror`] - backend cart snapshots and their local copy
//! - [`Price`] - euro amounts on decimal arithmetic
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices, product and cart records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
