//! Cart lines and the storefront's mirror of the backend cart.
//!
//! The backend owns the cart. After every add or remove it answers with a
//! full snapshot of the cart lines, which may list the same product more than
//! once. A [`CartSnapshot`] is that answer with duplicates collapsed and the
//! subtotal computed; the [`CartMirror`] holds the latest one for the page
//! the shopper is looking at.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Price, ProductId};

const fn default_quantity() -> u32 {
    1
}

/// The subtotal of a cart does not fit in a [`Price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart total overflows")]
pub struct TotalOverflow;

/// A single line of the backend cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    /// Price of the line (unit price times quantity), `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.price.checked_mul(self.quantity)
    }
}

/// Collapse lines sharing a product ID into one.
///
/// The last occurrence of a product wins, and it takes the position where
/// that product was first seen. Applying this twice gives the same result as
/// applying it once.
#[must_use]
pub fn dedup_lines<I>(lines: I) -> Vec<CartLine>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut positions: HashMap<ProductId, usize> = HashMap::new();
    let mut unique: Vec<CartLine> = Vec::new();

    for line in lines {
        match positions.entry(line.product_id) {
            Entry::Occupied(slot) => {
                if let Some(existing) = unique.get_mut(*slot.get()) {
                    *existing = line;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(line);
            }
        }
    }

    unique
}

/// Sum of price times quantity over `lines`. Zero for an empty cart, `None`
/// when the sum does not fit.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Option<Price> {
    lines
        .iter()
        .try_fold(Price::ZERO, |total, line| total.checked_add(line.line_total()?))
}

/// A backend cart answer, deduplicated and totalled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
    total: Price,
}

impl CartSnapshot {
    /// Deduplicate `lines` and compute their subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`TotalOverflow`] when a line total or the subtotal overflows.
    pub fn new<I>(lines: I) -> Result<Self, TotalOverflow>
    where
        I: IntoIterator<Item = CartLine>,
    {
        let lines = dedup_lines(lines);
        let total = cart_total(&lines).ok_or(TotalOverflow)?;
        Ok(Self { lines, total })
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }
}

/// Local copy of the cart the backend last reported, plus drawer state.
///
/// Lives for one product page view: every page shell starts from the
/// default, empty and closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMirror {
    lines: Vec<CartLine>,
    total: Price,
    open: bool,
}

impl CartMirror {
    /// Replace the mirror with the snapshot returned by an add.
    ///
    /// The drawer opens so the shopper sees what was added.
    pub fn apply_added(&mut self, snapshot: CartSnapshot) {
        self.replace(snapshot);
        self.open = true;
    }

    /// Replace the mirror with the snapshot returned by a remove.
    ///
    /// The drawer closes once the cart is empty and otherwise stays as it was.
    pub fn apply_removed(&mut self, snapshot: CartSnapshot) {
        self.replace(snapshot);
        if self.lines.is_empty() {
            self.open = false;
        }
    }

    /// Hide the drawer without touching the lines.
    pub const fn close(&mut self) {
        self.open = false;
    }

    fn replace(&mut self, snapshot: CartSnapshot) {
        self.lines = snapshot.lines;
        self.total = snapshot.total;
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Counter of cart actions the shopper has triggered in this session.
///
/// Bumped before the backend call is made and never rolled back, so it can
/// drift from the real cart when a call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSignal(u32);

impl CartSignal {
    #[must_use]
    pub const fn added(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub const fn removed(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    #[must_use]
    pub const fn count(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(lines: Vec<CartLine>) -> CartSnapshot {
        CartSnapshot::new(lines).unwrap()
    }

    fn line(id: i64, name: &str, cents: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_cents(cents),
            image_url: None,
            quantity,
        }
    }

    #[test]
    fn test_dedup_keeps_last_occurrence_at_first_position() {
        let lines = vec![
            line(1, "A", 1000, 1),
            line(2, "B", 500, 1),
            line(1, "A", 1000, 3),
        ];

        let unique = dedup_lines(lines);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].product_id, ProductId::new(1));
        assert_eq!(unique[0].quantity, 3);
        assert_eq!(unique[1].product_id, ProductId::new(2));
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let lines = vec![
            line(3, "C", 100, 1),
            line(1, "A", 1000, 1),
            line(3, "C", 100, 2),
            line(2, "B", 500, 4),
            line(1, "A", 1000, 5),
        ];

        let once = dedup_lines(lines);
        let twice = dedup_lines(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_lines(Vec::new()).is_empty());
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let lines = vec![line(1, "A", 1000, 2), line(2, "B", 250, 3)];
        assert_eq!(cart_total(&lines), Some(Price::from_cents(2750)));
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[]), Some(Price::ZERO));
    }

    #[test]
    fn test_total_overflow_is_none() {
        let max: Price = serde_json::from_value(json!("79228162514264337593543950335")).unwrap();
        let huge = CartLine {
            price: max,
            ..line(1, "A", 0, 2)
        };

        assert_eq!(huge.line_total(), None);
        assert_eq!(cart_total(&[huge]), None);

        let single = CartLine {
            price: max,
            ..line(1, "A", 0, 1)
        };
        assert_eq!(cart_total(&[single, line(2, "B", 100, 1)]), None);
    }

    #[test]
    fn test_snapshot_rejects_overflowing_total() {
        let max: Price = serde_json::from_value(json!("79228162514264337593543950335")).unwrap();
        let huge = CartLine {
            price: max,
            ..line(1, "A", 0, 2)
        };

        assert_eq!(CartSnapshot::new(vec![huge]), Err(TotalOverflow));
    }

    #[test]
    fn test_snapshot_totals_deduplicated_lines() {
        let snap = snapshot(vec![line(1, "A", 1000, 1), line(1, "A", 1000, 2)]);

        assert_eq!(snap.lines().len(), 1);
        assert_eq!(snap.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_apply_added_opens_drawer_and_recomputes_total() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(snapshot(vec![line(1, "A", 1000, 2)]));

        assert!(mirror.is_open());
        assert_eq!(mirror.lines().len(), 1);
        assert_eq!(mirror.total().to_string(), "20 €");
    }

    #[test]
    fn test_apply_added_dedups_snapshot() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(snapshot(vec![line(1, "A", 1000, 1), line(1, "A", 1000, 2)]));

        assert_eq!(mirror.lines().len(), 1);
        assert_eq!(mirror.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_apply_removed_to_empty_closes_drawer() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(snapshot(vec![line(1, "A", 1000, 1)]));
        mirror.apply_removed(snapshot(Vec::new()));

        assert!(!mirror.is_open());
        assert!(mirror.is_empty());
        assert_eq!(mirror.total(), Price::ZERO);
    }

    #[test]
    fn test_apply_removed_keeps_drawer_state_when_lines_remain() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(snapshot(vec![line(1, "A", 1000, 1), line(2, "B", 500, 1)]));
        mirror.apply_removed(snapshot(vec![line(2, "B", 500, 1)]));
        assert!(mirror.is_open());

        mirror.close();
        mirror.apply_removed(snapshot(vec![line(2, "B", 500, 1)]));
        assert!(!mirror.is_open());
    }

    #[test]
    fn test_cart_line_defaults_quantity_to_one() {
        let line: CartLine =
            serde_json::from_value(json!({ "productId": 9, "name": "X", "price": 3 })).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total(), Some(Price::from_cents(300)));
    }

    #[test]
    fn test_mirror_round_trips_through_json() {
        let mut mirror = CartMirror::default();
        mirror.apply_added(snapshot(vec![line(1, "A", 1050, 2)]));

        let stored = serde_json::to_value(&mirror).unwrap();
        let restored: CartMirror = serde_json::from_value(stored).unwrap();

        assert_eq!(restored, mirror);
    }

    #[test]
    fn test_signal_saturates_at_zero() {
        let signal = CartSignal::default().added().added().removed();
        assert_eq!(signal.count(), 1);
        assert_eq!(signal.removed().removed().count(), 0);
    }
}
