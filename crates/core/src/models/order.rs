//! Order records.
//!
//! Orders are immutable once placed; the backend appends to the status
//! history and payment records, and the storefront renders them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::address::Address;
use crate::models::cart::CartTotals;
use crate::types::{OrderId, OrderItemId, OrderStatus, PaymentId, PaymentStatus, Price, ProductId};

/// A line in a placed order. Prices are frozen at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// One entry in an order's status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusEvent {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

/// A payment attempt recorded against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    /// Gateway identifier, e.g. `razorpay`.
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_payment_id: Option<String>,
    pub status: PaymentStatus,
    pub amount: Price,
    pub at: DateTime<Utc>,
}

/// An immutable-once-placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Customer-facing order number, e.g. `MRD-2026-000123`.
    pub number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub totals: CartTotals,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub status_history: Vec<OrderStatusEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
}

impl Order {
    /// Whether the customer may still cancel this order.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// Total number of units in the order.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether payment is still outstanding and can be retried.
    #[must_use]
    pub const fn awaiting_payment(&self) -> bool {
        matches!(
            self.payment_status,
            PaymentStatus::Pending | PaymentStatus::Failed
        ) && !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::address::AddressKind;
    use crate::types::{AddressId, CurrencyCode, Phone, PostalCode};

    fn price(paise: i64) -> Price {
        Price::new(Decimal::new(paise, 2), CurrencyCode::Inr)
    }

    fn sample_address(kind: AddressKind) -> Address {
        Address {
            id: AddressId::new(1),
            kind,
            full_name: "Asha Rao".to_owned(),
            line1: "12 MG Road".to_owned(),
            line2: None,
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            postal_code: PostalCode::parse("560001").expect("valid PIN"),
            phone: Phone::parse("9876543210").expect("valid phone"),
            is_default: true,
        }
    }

    fn sample_order(status: OrderStatus, payment_status: PaymentStatus) -> Order {
        Order {
            id: OrderId::new(1),
            number: "MRD-2026-000001".to_owned(),
            status,
            payment_status,
            items: Vec::new(),
            totals: CartTotals {
                subtotal: price(49_900),
                tax: price(8_982),
                shipping: price(4_900),
                grand_total: price(63_782),
            },
            shipping_address: sample_address(AddressKind::Shipping),
            billing_address: sample_address(AddressKind::Billing),
            placed_at: Utc::now(),
            status_history: Vec::new(),
            payment: None,
        }
    }

    #[test]
    fn test_can_cancel_tracks_status() {
        assert!(sample_order(OrderStatus::Confirmed, PaymentStatus::Paid).can_cancel());
        assert!(!sample_order(OrderStatus::Shipped, PaymentStatus::Paid).can_cancel());
    }

    #[test]
    fn test_awaiting_payment() {
        assert!(sample_order(OrderStatus::Pending, PaymentStatus::Pending).awaiting_payment());
        assert!(sample_order(OrderStatus::Pending, PaymentStatus::Failed).awaiting_payment());
        assert!(!sample_order(OrderStatus::Pending, PaymentStatus::Paid).awaiting_payment());
        assert!(!sample_order(OrderStatus::Cancelled, PaymentStatus::Pending).awaiting_payment());
    }
}
