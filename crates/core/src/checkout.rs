//! Checkout: display pricing and order drafting.
//!
//! Prices computed here are for display only. The backend re-prices every
//! order from its own menu table, so nothing in this module is authoritative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{CartStore, OrderLine};
use crate::types::{PaymentMethod, Price, RestaurantId};

/// Fees and tax applied on top of the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Flat delivery fee, charged only for a non-empty cart.
    pub delivery_fee: Decimal,
    /// Tax rate applied to the subtotal (0.08 = 8%).
    pub tax_rate: Decimal,
    /// Flat service fee, charged only for a non-empty cart.
    pub service_fee: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(399, 2),
            tax_rate: Decimal::new(8, 2),
            service_fee: Decimal::ZERO,
        }
    }
}

/// Order summary shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub tax: Price,
    pub service_fee: Price,
    pub total: Price,
}

impl PricingPolicy {
    /// Price the current cart.
    #[must_use]
    pub fn quote(&self, cart: &CartStore) -> PriceBreakdown {
        let subtotal = cart.total();
        let currency = subtotal.currency_code;
        let flat = |fee: Decimal| {
            if cart.is_empty() {
                Price::zero(currency)
            } else {
                Price::new(fee, currency)
            }
        };

        let delivery_fee = flat(self.delivery_fee);
        let service_fee = flat(self.service_fee);
        let tax = subtotal.scale(self.tax_rate);
        let total = Price::new(
            subtotal.amount + delivery_fee.amount + tax.amount + service_fee.amount,
            currency,
        );

        PriceBreakdown {
            subtotal,
            delivery_fee,
            tax,
            service_fee,
            total,
        }
    }
}

/// Why a cart could not be turned into an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("delivery address is required")]
    MissingDeliveryAddress,
}

/// What the diner fills in on the checkout page.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
}

/// An order ready to submit to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub restaurant_id: RestaurantId,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub items: Vec<OrderLine>,
}

impl OrderDraft {
    /// Build an order from the cart and checkout form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart and
    /// [`CheckoutError::MissingDeliveryAddress`] when the address is blank.
    pub fn from_cart(cart: &CartStore, form: &CheckoutForm) -> Result<Self, CheckoutError> {
        let restaurant = cart.restaurant().ok_or(CheckoutError::EmptyCart)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let delivery_address = form.delivery_address.trim();
        if delivery_address.is_empty() {
            return Err(CheckoutError::MissingDeliveryAddress);
        }

        Ok(Self {
            restaurant_id: restaurant.id,
            payment_method: form.payment_method,
            delivery_address: delivery_address.to_owned(),
            items: cart.order_lines(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{MenuItem, MenuItemId};

    fn cart_with(cents: i64, quantity: i64) -> CartStore {
        let item = MenuItem {
            id: MenuItemId::new(1),
            restaurant_id: RestaurantId::new(9),
            name: "Bibimbap".into(),
            description: String::new(),
            price: Price::usd(Decimal::new(cents, 2)),
            category: None,
            available: true,
        };
        let mut cart = CartStore::new();
        cart.add_item(&item, "Seoul Kitchen").unwrap();
        cart.update_quantity(item.id, quantity);
        cart
    }

    fn form(address: &str) -> CheckoutForm {
        CheckoutForm {
            delivery_address: address.to_string(),
            payment_method: PaymentMethod::CreditCard,
        }
    }

    #[test]
    fn test_quote_default_policy() {
        let quote = PricingPolicy::default().quote(&cart_with(1000, 2));
        assert_eq!(quote.subtotal.amount, Decimal::new(2000, 2));
        assert_eq!(quote.delivery_fee.amount, Decimal::new(399, 2));
        assert_eq!(quote.tax.amount, Decimal::new(160, 2));
        assert!(quote.service_fee.is_zero());
        assert_eq!(quote.total.display(), "$25.59");
    }

    #[test]
    fn test_quote_empty_cart_is_free() {
        let policy = PricingPolicy {
            service_fee: Decimal::new(299, 2),
            ..PricingPolicy::default()
        };
        let quote = policy.quote(&CartStore::new());
        assert!(quote.subtotal.is_zero());
        assert!(quote.delivery_fee.is_zero());
        assert!(quote.service_fee.is_zero());
        assert!(quote.total.is_zero());
    }

    #[test]
    fn test_quote_includes_service_fee() {
        let policy = PricingPolicy {
            service_fee: Decimal::new(150, 2),
            ..PricingPolicy::default()
        };
        let quote = policy.quote(&cart_with(500, 1));
        // 5.00 + 3.99 + 0.40 + 1.50
        assert_eq!(quote.total.amount, Decimal::new(1089, 2));
    }

    #[test]
    fn test_draft_from_cart() {
        let draft = OrderDraft::from_cart(&cart_with(700, 3), &form("  12 Elm St  ")).unwrap();
        assert_eq!(draft.restaurant_id, RestaurantId::new(9));
        assert_eq!(draft.delivery_address, "12 Elm St");
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, 3);
    }

    #[test]
    fn test_draft_errors() {
        assert_eq!(
            OrderDraft::from_cart(&CartStore::new(), &form("12 Elm St")),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(
            OrderDraft::from_cart(&cart_with(700, 1), &form("   ")),
            Err(CheckoutError::MissingDeliveryAddress)
        );
    }
}
