//! Cart records and quantity rules.

use serde::{Deserialize, Serialize};

use crate::types::{CartId, CartItemId, Price, ProductId};

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit_price: Price,
    pub quantity: u32,
    /// Stock stated by the backend at fetch time; the quantity controls
    /// clamp against this before any mutation is sent.
    pub stock: u32,
    pub line_total: Price,
}

/// Totals computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub tax: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

/// The server-held cart for the current customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Clamp a requested quantity into the valid range `1..=stock`.
///
/// Returns `None` when the product is out of stock, in which case the
/// mutation must not be sent at all.
///
/// ```
/// use meridian_core::clamp_quantity;
///
/// assert_eq!(clamp_quantity(0, 5), Some(1));
/// assert_eq!(clamp_quantity(3, 5), Some(3));
/// assert_eq!(clamp_quantity(99, 5), Some(5));
/// assert_eq!(clamp_quantity(1, 0), None);
/// ```
#[must_use]
pub fn clamp_quantity(requested: u32, stock: u32) -> Option<u32> {
    if stock == 0 {
        return None;
    }
    Some(requested.clamp(1, stock))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::CurrencyCode;

    fn price(paise: i64) -> Price {
        Price::new(Decimal::new(paise, 2), CurrencyCode::Inr)
    }

    fn cart_with_quantities(quantities: &[u32]) -> Cart {
        let items = quantities
            .iter()
            .enumerate()
            .map(|(i, &quantity)| CartItem {
                id: CartItemId::new(i64::try_from(i).unwrap_or(0)),
                product_id: ProductId::new(1),
                name: "Item".to_owned(),
                slug: "item".to_owned(),
                image: None,
                unit_price: price(10_000),
                quantity,
                stock: 10,
                line_total: price(10_000 * i64::from(quantity)),
            })
            .collect();
        Cart {
            id: CartId::new(1),
            items,
            totals: CartTotals {
                subtotal: price(0),
                tax: price(0),
                shipping: price(0),
                grand_total: price(0),
            },
        }
    }

    #[test]
    fn test_item_count_sums_quantities() {
        assert_eq!(cart_with_quantities(&[2, 3]).item_count(), 5);
        assert_eq!(cart_with_quantities(&[]).item_count(), 0);
    }

    #[test]
    fn test_clamp_never_below_one() {
        assert_eq!(clamp_quantity(0, 8), Some(1));
        assert_eq!(clamp_quantity(1, 8), Some(1));
    }

    #[test]
    fn test_clamp_never_above_stock() {
        assert_eq!(clamp_quantity(9, 8), Some(8));
        assert_eq!(clamp_quantity(u32::MAX, 8), Some(8));
    }

    #[test]
    fn test_clamp_in_range_passes_through() {
        assert_eq!(clamp_quantity(4, 8), Some(4));
        assert_eq!(clamp_quantity(8, 8), Some(8));
    }

    #[test]
    fn test_clamp_out_of_stock() {
        assert_eq!(clamp_quantity(1, 0), None);
        assert_eq!(clamp_quantity(0, 0), None);
    }
}
