//! Single-restaurant shopping cart.
//!
//! A [`CartStore`] is an ordered list of line items that all belong to one
//! restaurant. The restaurant binding is set by the first successful
//! [`CartStore::add_item`] and cleared whenever the cart becomes empty:
//!
//! ```text
//! Unbound (empty) --add_item--> Bound --remove last / clear--> Unbound
//! ```
//!
//! Line items are keyed by menu item id alone. Menu item ids are unique
//! across the platform, and the binding already pins every line to a single
//! restaurant.
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tastebud_core::{CartStore, MenuItem, MenuItemId, Price, RestaurantId};
//!
//! let pad_thai = MenuItem {
//!     id: MenuItemId::new(1),
//!     restaurant_id: RestaurantId::new(7),
//!     name: "Pad Thai".into(),
//!     description: String::new(),
//!     price: Price::usd(Decimal::new(1250, 2)),
//!     category: None,
//!     available: true,
//! };
//!
//! let mut cart = CartStore::new();
//! cart.add_item(&pad_thai, "Bangkok Street").unwrap();
//! cart.add_item(&pad_thai, "Bangkok Street").unwrap();
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().display(), "$25.00");
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{MenuItem, MenuItemId, Price, RestaurantId, RestaurantRef};

/// A menu item plus the quantity the diner wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub item: MenuItem,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// An `{item id, quantity}` pair handed to checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

/// The item belongs to a different restaurant than the one the cart is bound to.
///
/// Returned as a value from [`CartStore::add_item`]; the cart is untouched
/// and the caller decides whether to offer clearing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error(
    "cart holds items from {} (restaurant {}), cannot add an item from restaurant {}",
    cart_restaurant.name,
    cart_restaurant.id,
    attempted_restaurant_id
)]
pub struct DifferentRestaurant {
    pub cart_restaurant: RestaurantRef,
    pub attempted_restaurant_id: RestaurantId,
}

/// A stored cart that violates the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartRestoreError {
    #[error("line for item {0} has zero quantity")]
    ZeroQuantity(MenuItemId),
    #[error("item {item} belongs to restaurant {found}, cart is bound to {expected}")]
    ForeignItem {
        item: MenuItemId,
        found: RestaurantId,
        expected: RestaurantId,
    },
    #[error("item {0} appears in more than one line")]
    DuplicateItem(MenuItemId),
    #[error("cart has items but no restaurant binding")]
    Unbound,
    #[error("cart is bound to restaurant {0} but has no items")]
    EmptyButBound(RestaurantId),
}

/// Cart for one browser session, bound to at most one restaurant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredCart")]
pub struct CartStore {
    restaurant: Option<RestaurantRef>,
    lines: Vec<CartLineItem>,
}

impl CartStore {
    /// Create an empty, unbound cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            restaurant: None,
            lines: Vec::new(),
        }
    }

    /// Add one unit of `item`.
    ///
    /// Binds an empty cart to the item's restaurant, increments an existing
    /// line, or appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`DifferentRestaurant`] without changing the cart when the
    /// cart is bound to another restaurant.
    pub fn add_item(
        &mut self,
        item: &MenuItem,
        restaurant_name: &str,
    ) -> Result<(), DifferentRestaurant> {
        match &self.restaurant {
            Some(bound) if bound.id != item.restaurant_id => {
                return Err(DifferentRestaurant {
                    cart_restaurant: bound.clone(),
                    attempted_restaurant_id: item.restaurant_id,
                });
            }
            Some(_) => {}
            None => {
                self.restaurant = Some(RestaurantRef {
                    id: item.restaurant_id,
                    name: restaurant_name.to_owned(),
                });
            }
        }

        match self.lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLineItem {
                item: item.clone(),
                quantity: 1,
            }),
        }

        Ok(())
    }

    /// Remove the line for `item_id`, unbinding the cart if it is now empty.
    pub fn remove_item(&mut self, item_id: MenuItemId) {
        self.lines.retain(|line| line.item.id != item_id);
        if self.lines.is_empty() {
            self.restaurant = None;
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. There is no upper bound;
    /// values beyond `u32::MAX` saturate.
    pub fn update_quantity(&mut self, item_id: MenuItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(item_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == item_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart and drop the restaurant binding.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.restaurant = None;
    }

    /// Sum of `unit price * quantity` over all lines. Not rounded.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of all quantities, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, item_id: MenuItemId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.item.id == item_id)
    }

    /// The restaurant the cart is bound to, if any.
    #[must_use]
    pub const fn restaurant(&self) -> Option<&RestaurantRef> {
        self.restaurant.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The `{item id, quantity}` pairs submitted at checkout.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|line| OrderLine {
                item_id: line.item.id,
                quantity: line.quantity,
            })
            .collect()
    }
}

/// Deserialization shape for [`CartStore`]; validated before use.
#[derive(Deserialize)]
struct StoredCart {
    restaurant: Option<RestaurantRef>,
    lines: Vec<CartLineItem>,
}

impl TryFrom<StoredCart> for CartStore {
    type Error = CartRestoreError;

    fn try_from(stored: StoredCart) -> Result<Self, Self::Error> {
        let Some(restaurant) = stored.restaurant else {
            if stored.lines.is_empty() {
                return Ok(Self::new());
            }
            return Err(CartRestoreError::Unbound);
        };

        if stored.lines.is_empty() {
            return Err(CartRestoreError::EmptyButBound(restaurant.id));
        }

        let mut seen = HashSet::with_capacity(stored.lines.len());
        for line in &stored.lines {
            if line.quantity == 0 {
                return Err(CartRestoreError::ZeroQuantity(line.item.id));
            }
            if line.item.restaurant_id != restaurant.id {
                return Err(CartRestoreError::ForeignItem {
                    item: line.item.id,
                    found: line.item.restaurant_id,
                    expected: restaurant.id,
                });
            }
            if !seen.insert(line.item.id) {
                return Err(CartRestoreError::DuplicateItem(line.item.id));
            }
        }

        Ok(Self {
            restaurant: Some(restaurant),
            lines: stored.lines,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: i64, restaurant: i64, cents: i64) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            restaurant_id: RestaurantId::new(restaurant),
            name: format!("Item {id}"),
            description: String::new(),
            price: Price::usd(Decimal::new(cents, 2)),
            category: None,
            available: true,
        }
    }

    #[test]
    fn test_add_binds_and_appends() {
        let mut cart = CartStore::new();
        assert!(cart.restaurant().is_none());

        cart.add_item(&item(1, 10, 500), "Taqueria").unwrap();
        cart.add_item(&item(2, 10, 300), "ignored once bound").unwrap();

        let bound = cart.restaurant().unwrap();
        assert_eq!(bound.id, RestaurantId::new(10));
        assert_eq!(bound.name, "Taqueria");
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].item.id, MenuItemId::new(1));
        assert_eq!(cart.lines()[1].item.id, MenuItemId::new(2));
    }

    #[test]
    fn test_repeated_add_increments_quantity() {
        let mut cart = CartStore::new();
        let taco = item(1, 10, 500);
        for _ in 0..3 {
            cart.add_item(&taco, "Taqueria").unwrap();
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(taco.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_item_count_matches_number_of_adds() {
        let mut cart = CartStore::new();
        let menu = [item(1, 4, 100), item(2, 4, 250), item(3, 4, 999)];
        let picks = [0, 1, 0, 2, 2, 2, 1];
        for &pick in &picks {
            cart.add_item(&menu[pick], "Diner").unwrap();
        }
        assert_eq!(cart.item_count(), picks.len() as u64);
    }

    #[test]
    fn test_different_restaurant_leaves_cart_unchanged() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 1000), "First").unwrap();
        let before = cart.clone();

        let err = cart.add_item(&item(2, 2, 500), "Second").unwrap_err();
        assert_eq!(err.cart_restaurant.id, RestaurantId::new(1));
        assert_eq!(err.cart_restaurant.name, "First");
        assert_eq!(err.attempted_restaurant_id, RestaurantId::new(2));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        for quantity in [0, -1, i64::MIN] {
            let mut updated = CartStore::new();
            updated.add_item(&item(1, 1, 100), "R").unwrap();
            updated.add_item(&item(2, 1, 200), "R").unwrap();
            let mut removed = updated.clone();

            updated.update_quantity(MenuItemId::new(1), quantity);
            removed.remove_item(MenuItemId::new(1));
            assert_eq!(updated, removed);
        }
    }

    #[test]
    fn test_update_quantity_sets_value_without_upper_bound() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 100), "R").unwrap();

        cart.update_quantity(MenuItemId::new(1), 250);
        assert_eq!(cart.item_count(), 250);

        cart.update_quantity(MenuItemId::new(1), i64::MAX);
        assert_eq!(cart.line(MenuItemId::new(1)).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_update_quantity_unknown_item_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 100), "R").unwrap();
        let before = cart.clone();
        cart.update_quantity(MenuItemId::new(99), 5);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_removing_last_item_unbinds() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 100), "R").unwrap();
        cart.remove_item(MenuItemId::new(1));

        assert!(cart.is_empty());
        assert!(cart.restaurant().is_none());
        cart.add_item(&item(5, 2, 100), "Other").unwrap();
        assert_eq!(cart.restaurant().unwrap().id, RestaurantId::new(2));
    }

    #[test]
    fn test_removing_one_of_many_keeps_binding() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 100), "R").unwrap();
        cart.add_item(&item(2, 1, 100), "R").unwrap();
        cart.remove_item(MenuItemId::new(1));
        assert_eq!(cart.restaurant().unwrap().id, RestaurantId::new(1));
    }

    #[test]
    fn test_total_returns_after_add_then_remove() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 1299), "R").unwrap();
        cart.update_quantity(MenuItemId::new(1), 2);
        let before = cart.total();

        cart.add_item(&item(2, 1, 450), "R").unwrap();
        assert_eq!(cart.total().amount, Decimal::new(3048, 2));
        cart.remove_item(MenuItemId::new(2));
        assert_eq!(cart.total(), before);
    }

    #[test]
    fn test_walkthrough_example() {
        let a = item(1, 1, 1000);
        let b = item(2, 2, 800);
        let mut cart = CartStore::new();

        cart.add_item(&a, "One").unwrap();
        assert_eq!(cart.total().amount, Decimal::new(1000, 2));
        assert_eq!(cart.item_count(), 1);

        cart.add_item(&a, "One").unwrap();
        assert_eq!(cart.total().amount, Decimal::new(2000, 2));
        assert_eq!(cart.item_count(), 2);

        assert!(cart.add_item(&b, "Two").is_err());
        assert_eq!(cart.total().amount, Decimal::new(2000, 2));

        cart.clear();
        assert!(cart.total().is_zero());
        assert_eq!(cart.item_count(), 0);
        assert!(cart.restaurant().is_none());
    }

    #[test]
    fn test_order_lines() {
        let mut cart = CartStore::new();
        cart.add_item(&item(3, 1, 100), "R").unwrap();
        cart.add_item(&item(4, 1, 100), "R").unwrap();
        cart.add_item(&item(3, 1, 100), "R").unwrap();

        assert_eq!(
            cart.order_lines(),
            vec![
                OrderLine {
                    item_id: MenuItemId::new(3),
                    quantity: 2
                },
                OrderLine {
                    item_id: MenuItemId::new(4),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_session_roundtrip_preserves_cart() {
        let mut cart = CartStore::new();
        cart.add_item(&item(1, 1, 100), "R").unwrap();
        cart.add_item(&item(2, 1, 250), "R").unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        let restored: CartStore = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);

        let empty: CartStore = serde_json::from_str(r#"{"restaurant":null,"lines":[]}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_restore_rejects_broken_invariants() {
        let line = |id: i64, restaurant: i64, quantity: u32| CartLineItem {
            item: item(id, restaurant, 100),
            quantity,
        };
        let bound = Some(RestaurantRef {
            id: RestaurantId::new(1),
            name: "R".into(),
        });

        let cases = [
            (bound.clone(), vec![line(1, 1, 0)], CartRestoreError::ZeroQuantity(MenuItemId::new(1))),
            (
                bound.clone(),
                vec![line(1, 1, 1), line(2, 2, 1)],
                CartRestoreError::ForeignItem {
                    item: MenuItemId::new(2),
                    found: RestaurantId::new(2),
                    expected: RestaurantId::new(1),
                },
            ),
            (
                bound.clone(),
                vec![line(1, 1, 1), line(1, 1, 2)],
                CartRestoreError::DuplicateItem(MenuItemId::new(1)),
            ),
            (
                bound.clone(),
                vec![line(1, 1, 1), line(3, 1, 1), line(3, 1, 4)],
                CartRestoreError::DuplicateItem(MenuItemId::new(3)),
            ),
            (None, vec![line(1, 1, 1)], CartRestoreError::Unbound),
            (bound, vec![], CartRestoreError::EmptyButBound(RestaurantId::new(1))),
        ];

        for (restaurant, lines, expected) in cases {
            let err = CartStore::try_from(StoredCart { restaurant, lines }).unwrap_err();
            assert_eq!(err, expected);
        }
    }
}
