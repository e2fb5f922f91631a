//! Checkout wizard state.
//!
//! The wizard walks shipping address → billing address → review →
//! payment. A step is reachable only once every earlier step has its
//! required selection; deep links to later steps clamp back to the
//! furthest permitted one.

use serde::{Deserialize, Serialize};

use meridian_core::{AddressId, OrderId};

/// The four wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    ShippingAddress,
    BillingAddress,
    Review,
    Payment,
}

impl CheckoutStep {
    /// URL slug for the `step` query parameter.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::ShippingAddress => "shipping",
            Self::BillingAddress => "billing",
            Self::Review => "review",
            Self::Payment => "payment",
        }
    }

    /// Parse a `step` query parameter.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "shipping" => Some(Self::ShippingAddress),
            "billing" => Some(Self::BillingAddress),
            "review" => Some(Self::Review),
            "payment" => Some(Self::Payment),
            _ => None,
        }
    }

    /// Progress label for the step indicator.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ShippingAddress => "Shipping address",
            Self::BillingAddress => "Billing address",
            Self::Review => "Review",
            Self::Payment => "Payment",
        }
    }

    /// 1-based position for the step indicator.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::ShippingAddress => 1,
            Self::BillingAddress => 2,
            Self::Review => 3,
            Self::Payment => 4,
        }
    }
}

/// Wizard selections held in the session between steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Selected shipping address.
    pub shipping_address_id: Option<AddressId>,
    /// Selected billing address, when not billing to the shipping one.
    pub billing_address_id: Option<AddressId>,
    /// Bill to the shipping address instead of a separate one.
    pub bill_to_shipping: bool,
    /// Order created at the review step, awaiting payment.
    pub pending_order_id: Option<OrderId>,
}

impl CheckoutState {
    /// The billing address the order will carry, resolving the
    /// bill-to-shipping shortcut.
    #[must_use]
    pub const fn resolved_billing_address_id(&self) -> Option<AddressId> {
        if self.bill_to_shipping {
            self.shipping_address_id
        } else {
            self.billing_address_id
        }
    }

    /// Whether the billing step has a selection.
    #[must_use]
    pub const fn billing_selected(&self) -> bool {
        self.resolved_billing_address_id().is_some()
    }

    /// The furthest step the wizard allows entering.
    #[must_use]
    pub fn furthest_step(&self) -> CheckoutStep {
        if self.shipping_address_id.is_none() {
            CheckoutStep::ShippingAddress
        } else if !self.billing_selected() {
            CheckoutStep::BillingAddress
        } else if self.pending_order_id.is_none() {
            CheckoutStep::Review
        } else {
            CheckoutStep::Payment
        }
    }

    /// Clamp a requested step to the furthest permitted one.
    #[must_use]
    pub fn clamp_step(&self, requested: CheckoutStep) -> CheckoutStep {
        requested.min(self.furthest_step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_wizard_starts_at_shipping() {
        let state = CheckoutState::default();
        assert_eq!(state.furthest_step(), CheckoutStep::ShippingAddress);
        // Deep links to later steps clamp back
        assert_eq!(
            state.clamp_step(CheckoutStep::Payment),
            CheckoutStep::ShippingAddress
        );
    }

    #[test]
    fn test_shipping_selection_unlocks_billing_only() {
        let state = CheckoutState {
            shipping_address_id: Some(AddressId::new(1)),
            ..CheckoutState::default()
        };
        assert_eq!(state.furthest_step(), CheckoutStep::BillingAddress);
        assert_eq!(
            state.clamp_step(CheckoutStep::Review),
            CheckoutStep::BillingAddress
        );
        // Earlier steps stay reachable
        assert_eq!(
            state.clamp_step(CheckoutStep::ShippingAddress),
            CheckoutStep::ShippingAddress
        );
    }

    #[test]
    fn test_bill_to_shipping_counts_as_billing_selection() {
        let state = CheckoutState {
            shipping_address_id: Some(AddressId::new(1)),
            bill_to_shipping: true,
            ..CheckoutState::default()
        };
        assert_eq!(state.furthest_step(), CheckoutStep::Review);
        assert_eq!(state.resolved_billing_address_id(), Some(AddressId::new(1)));
    }

    #[test]
    fn test_separate_billing_address() {
        let state = CheckoutState {
            shipping_address_id: Some(AddressId::new(1)),
            billing_address_id: Some(AddressId::new(2)),
            ..CheckoutState::default()
        };
        assert_eq!(state.furthest_step(), CheckoutStep::Review);
        assert_eq!(state.resolved_billing_address_id(), Some(AddressId::new(2)));
    }

    #[test]
    fn test_payment_requires_pending_order() {
        let mut state = CheckoutState {
            shipping_address_id: Some(AddressId::new(1)),
            bill_to_shipping: true,
            ..CheckoutState::default()
        };
        assert_eq!(
            state.clamp_step(CheckoutStep::Payment),
            CheckoutStep::Review
        );

        state.pending_order_id = Some(OrderId::new(7));
        assert_eq!(state.furthest_step(), CheckoutStep::Payment);
        assert_eq!(
            state.clamp_step(CheckoutStep::Payment),
            CheckoutStep::Payment
        );
    }

    #[test]
    fn test_step_slug_roundtrip() {
        for step in [
            CheckoutStep::ShippingAddress,
            CheckoutStep::BillingAddress,
            CheckoutStep::Review,
            CheckoutStep::Payment,
        ] {
            assert_eq!(CheckoutStep::from_slug(step.slug()), Some(step));
        }
        assert_eq!(CheckoutStep::from_slug("bogus"), None);
    }
}
