//! Customer account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, Phone, UserId};

/// A customer account, as returned by `/auth/me`.
///
/// This is the one record the storefront caches across requests (in the
/// session, alongside the token pair).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name for the header greeting.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_trims_when_last_name_empty() {
        let json = r#"{
            "id": 1,
            "email": "a@b.c",
            "first_name": "Asha",
            "last_name": "",
            "created_at": "2026-01-15T10:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).expect("deserialize");
        assert_eq!(user.full_name(), "Asha");
        assert!(user.phone.is_none());
    }
}
