//! Meridian Core - Shared types library.
//!
//! This crate provides the domain types shared between the Meridian
//! components:
//! - `client` - REST API client for the commerce backend
//! - `storefront` - Public-facing e-commerce site
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Records
//! mirror the backend's wire format one-to-one; invariants that the
//! backend enforces (such as one default address per address kind) are
//! not re-checked here, but the pure helpers that mirror those rules for
//! in-place display updates live alongside the records they act on.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails,
//!   phone numbers, postal codes, and statuses
//! - [`models`] - Entity records mirrored from the backend API
//! - [`envelope`] - The backend's JSON response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod envelope;
pub mod models;
pub mod types;

pub use envelope::ApiEnvelope;
pub use models::*;
pub use types::*;
