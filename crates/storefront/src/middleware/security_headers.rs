//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Start locked down and
//! loosen only when specific functionality requires it; the only holes in the
//! CSP are the ones the Razorpay hosted checkout needs.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::middleware::csp::CspNonce;

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: SAMEORIGIN` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: same-origin` - Keep referrers inside the shop
/// - `Content-Security-Policy` - Strict CSP with per-request nonce (see below)
/// - `Permissions-Policy` - Deny sensitive features the shop never uses
/// - `X-DNS-Prefetch-Control: off` - Prevent DNS prefetch leakage
///
/// # CSP Policy
///
/// Locked down except for the Razorpay widget:
/// ```text
/// default-src 'none';
/// script-src 'self' 'nonce-{nonce}' https://checkout.razorpay.com;
/// style-src 'self';
/// font-src 'self';
/// img-src 'self' https: data:;
/// connect-src 'self' https://api.razorpay.com https://lumberjack.razorpay.com;
/// frame-src https://api.razorpay.com https://checkout.razorpay.com;
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self' https://api.razorpay.com;
/// frame-ancestors 'self';
/// upgrade-insecure-requests
/// ```
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map_or_else(String::new, |n| n.value().to_owned());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Prevent clickjacking (Razorpay opens in an iframe we create, not the reverse)
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));

    // Prevent MIME sniffing
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    // Keep referrers inside the shop
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));

    // Strict CSP with the Razorpay exceptions and the per-request nonce
    let csp = format!(
        "default-src 'none'; \
         script-src 'self' 'nonce-{nonce}' https://checkout.razorpay.com; \
         style-src 'self'; \
         font-src 'self'; \
         img-src 'self' https: data:; \
         connect-src 'self' https://api.razorpay.com https://lumberjack.razorpay.com; \
         frame-src https://api.razorpay.com https://checkout.razorpay.com; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self' https://api.razorpay.com; \
         frame-ancestors 'self'; \
         upgrade-insecure-requests"
    );
    if let Ok(value) = HeaderValue::from_str(&csp) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }

    // Deny sensitive features the shop never uses
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             camera=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             payment=(self), \
             usb=()",
        ),
    );

    // Prevent DNS prefetch leakage
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}
