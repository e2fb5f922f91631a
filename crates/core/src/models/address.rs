//! Address book records.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AddressId, Phone, PostalCode};

/// Whether an address is used for shipping or billing.
///
/// The backend keeps at most one default address per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Shipping,
    Billing,
}

impl AddressKind {
    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Billing => "Billing",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A saved postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub kind: AddressKind,
    pub full_name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: PostalCode,
    pub phone: Phone,
    pub is_default: bool,
}

impl Address {
    /// Single-line summary for order confirmations and dropdowns.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.line1, self.city, self.state, self.postal_code
        )
    }
}

/// Mirror the backend's default-flip on an already-fetched list.
///
/// Marks `id` as the default and clears the flag on every other address
/// of the *same kind*. Addresses of the other kind are left untouched,
/// matching the backend's one-default-per-kind rule. Returns `true` if
/// the id was found in the list.
pub fn promote_default(addresses: &mut [Address], id: AddressId) -> bool {
    let Some(kind) = addresses
        .iter()
        .find(|address| address.id == id)
        .map(|address| address.kind)
    else {
        return false;
    };

    for address in addresses.iter_mut().filter(|a| a.kind == kind) {
        address.is_default = address.id == id;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: i64, kind: AddressKind, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            kind,
            full_name: "Asha Rao".to_owned(),
            line1: "12 MG Road".to_owned(),
            line2: None,
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            postal_code: PostalCode::parse("560001").expect("valid PIN"),
            phone: Phone::parse("9876543210").expect("valid phone"),
            is_default,
        }
    }

    #[test]
    fn test_promote_default_flips_within_kind_only() {
        let mut addresses = vec![
            address(1, AddressKind::Shipping, true),
            address(2, AddressKind::Shipping, false),
            address(3, AddressKind::Billing, true),
        ];

        assert!(promote_default(&mut addresses, AddressId::new(2)));

        // Shipping default moved from 1 to 2
        assert!(!addresses[0].is_default);
        assert!(addresses[1].is_default);
        // Billing default untouched
        assert!(addresses[2].is_default);
    }

    #[test]
    fn test_promote_default_unknown_id_is_noop() {
        let mut addresses = vec![address(1, AddressKind::Shipping, true)];
        assert!(!promote_default(&mut addresses, AddressId::new(99)));
        assert!(addresses[0].is_default);
    }

    #[test]
    fn test_promote_default_idempotent() {
        let mut addresses = vec![
            address(1, AddressKind::Billing, true),
            address(2, AddressKind::Billing, false),
        ];
        assert!(promote_default(&mut addresses, AddressId::new(1)));
        assert!(addresses[0].is_default);
        assert!(!addresses[1].is_default);
    }

    #[test]
    fn test_summary() {
        let a = address(1, AddressKind::Shipping, false);
        assert_eq!(a.summary(), "12 MG Road, Bengaluru, Karnataka 560001");
    }
}
