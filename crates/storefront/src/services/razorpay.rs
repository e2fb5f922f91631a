//! Razorpay checkout handoff.
//!
//! The backend creates the Razorpay order; this module covers the two
//! storefront-side pieces: building the options object the hosted
//! checkout widget is opened with, and verifying the signature Razorpay
//! sends back before the result is reported to the backend.
//!
//! Signature scheme (Razorpay standard checkout):
//! `signature = hex(HMAC_SHA256(key_secret, "{razorpay_order_id}|{razorpay_payment_id}"))`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use meridian_client::services::CheckoutSession;
use meridian_core::User;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The provided signature is not valid lowercase hex of the right length.
    #[error("malformed signature")]
    Malformed,
    /// The computed digest does not match the provided signature.
    #[error("signature mismatch")]
    Mismatch,
}

/// Razorpay gateway helper held in application state.
pub struct RazorpayGateway {
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayGateway {
    /// Create a gateway helper from configuration.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// Build the options object for `new Razorpay(options).open()`.
    ///
    /// Embedded into the payment page inside a nonce-protected inline
    /// script, which adds a `handler` that posts the signed result to
    /// the same-origin callback route.
    #[must_use]
    pub fn checkout_options(
        &self,
        session: &CheckoutSession,
        user: &User,
        app_name: &str,
    ) -> serde_json::Value {
        json!({
            "key": self.key_id,
            "order_id": session.razorpay_order_id,
            "amount": session.amount,
            "currency": session.currency.code(),
            "name": app_name,
            "prefill": {
                "name": user.full_name(),
                "email": user.email,
                "contact": user.phone.as_ref().map(meridian_core::Phone::with_country_code),
            },
        })
    }

    /// Verify the callback signature for a payment.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] if the signature is malformed or does
    /// not match the computed digest.
    pub fn verify_signature(
        &self,
        razorpay_order_id: &str,
        razorpay_payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        // 64 lowercase hex chars for SHA-256
        if signature.len() != 64
            || !signature
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(SignatureError::Malformed);
        }

        let message = format!("{razorpay_order_id}|{razorpay_payment_id}");
        let expected = hmac_hex(self.key_secret.expose_secret(), &message);

        if !constant_time_compare(&expected, signature) {
            return Err(SignatureError::Mismatch);
        }

        debug!("razorpay signature verified");
        Ok(())
    }
}

/// Compute `hex(HMAC_SHA256(key, message))`.
fn hmac_hex(key: &str, message: &str) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(key.as_bytes()) else {
        // HMAC accepts keys of any length; new_from_slice cannot fail.
        return String::new();
    };
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compare two strings in constant time.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(key_secret: &str) -> RazorpayGateway {
        RazorpayGateway::new(&RazorpayConfig {
            key_id: "rzp_test_1DP5mmOlF5G5ag".to_string(),
            key_secret: SecretString::from(key_secret.to_owned()),
        })
    }

    #[test]
    fn test_hmac_hex_rfc4231_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            hmac_hex("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_accepts_matching_signature() {
        let gateway = gateway("kE9x!mQ2@bZ7pL4w");
        let signature = hmac_hex("kE9x!mQ2@bZ7pL4w", "order_Mq9zLd|pay_Nt2xWb");
        assert!(
            gateway
                .verify_signature("order_Mq9zLd", "pay_Nt2xWb", &signature)
                .is_ok()
        );
    }

    #[test]
    fn test_verify_rejects_tampered_payment_id() {
        let gateway = gateway("kE9x!mQ2@bZ7pL4w");
        let signature = hmac_hex("kE9x!mQ2@bZ7pL4w", "order_Mq9zLd|pay_Nt2xWb");
        assert!(matches!(
            gateway.verify_signature("order_Mq9zLd", "pay_FORGED", &signature),
            Err(SignatureError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let gateway = gateway("kE9x!mQ2@bZ7pL4w");
        assert!(matches!(
            gateway.verify_signature("order_Mq9zLd", "pay_Nt2xWb", "not-hex"),
            Err(SignatureError::Malformed)
        ));
        // Uppercase hex is rejected too; Razorpay always sends lowercase
        let upper = hmac_hex("kE9x!mQ2@bZ7pL4w", "order_Mq9zLd|pay_Nt2xWb").to_uppercase();
        assert!(matches!(
            gateway.verify_signature("order_Mq9zLd", "pay_Nt2xWb", &upper),
            Err(SignatureError::Malformed)
        ));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
