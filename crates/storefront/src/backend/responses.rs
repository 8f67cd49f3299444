//! Shape checks for the backend's cart replies.
//!
//! Both cart endpoints answer with an array whose first element carries the
//! cart lines under `products`:
//!
//! ```json
//! [{ "products": [{ "productId": 1, "name": "A", "price": 10, "quantity": 2 }] }]
//! ```
//!
//! Add replies must carry the `products` array. Remove replies may leave it
//! out (or send `null`) when the cart was emptied. A snapshot whose subtotal
//! overflows is treated like any other malformed reply.

use serde_json::{Map, Value};

use shopfront_core::{CartLine, CartSnapshot};

use super::BackendError;

/// How much of an unexpected payload ends up in the error message.
const SNIPPET_LEN: usize = 200;

/// Extract the cart snapshot from the reply to an add.
///
/// # Errors
///
/// Returns `BackendError::MalformedCart` unless the reply is a non-empty
/// array whose first element has a `products` array of cart lines with a
/// representable subtotal.
pub fn cart_after_add(reply: Value) -> Result<CartSnapshot, BackendError> {
    let mut entry = first_entry(reply)?;
    match entry.remove("products") {
        Some(products @ Value::Array(_)) => parse_lines(products),
        Some(other) => Err(malformed("`products` is not an array", &other)),
        None => Err(malformed("missing `products`", &Value::Object(entry))),
    }
}

/// Extract the cart snapshot from the reply to a remove.
///
/// # Errors
///
/// Returns `BackendError::MalformedCart` unless the reply is a non-empty
/// array whose first element is an object. A missing or `null` `products`
/// field is read as an empty cart.
pub fn cart_after_remove(reply: Value) -> Result<CartSnapshot, BackendError> {
    let mut entry = first_entry(reply)?;
    match entry.remove("products") {
        None | Some(Value::Null) => Ok(CartSnapshot::default()),
        Some(products @ Value::Array(_)) => parse_lines(products),
        Some(other) => Err(malformed("`products` is not an array", &other)),
    }
}

fn first_entry(reply: Value) -> Result<Map<String, Value>, BackendError> {
    let Value::Array(entries) = reply else {
        return Err(malformed("expected an array", &reply));
    };

    match entries.into_iter().next() {
        Some(Value::Object(entry)) => Ok(entry),
        Some(other) => Err(malformed("first element is not an object", &other)),
        None => Err(BackendError::MalformedCart("empty array".to_string())),
    }
}

fn parse_lines(products: Value) -> Result<CartSnapshot, BackendError> {
    let snippet = snippet(&products);
    let lines: Vec<CartLine> = serde_json::from_value(products)
        .map_err(|e| BackendError::MalformedCart(format!("invalid cart line ({e}): {snippet}")))?;
    CartSnapshot::new(lines).map_err(|e| BackendError::MalformedCart(format!("{e}: {snippet}")))
}

fn malformed(reason: &str, value: &Value) -> BackendError {
    BackendError::MalformedCart(format!("{reason}: {}", snippet(value)))
}

fn snippet(value: &Value) -> String {
    value.to_string().chars().take(SNIPPET_LEN).collect()
}
