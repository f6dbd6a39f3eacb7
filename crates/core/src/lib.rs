//! SimpleMART Core - Shared domain types.
//!
//! This crate provides the types used across all SimpleMART components:
//! - `storefront` - Session store, API clients, checkout flow
//! - `cli` - Command-line driver standing in for the storefront views
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no storage,
//! no HTTP clients. The cart merge and quantity rules live here so they can
//! be tested without any persistence backend.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, emails, products, the cart, payment outcomes, user profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
