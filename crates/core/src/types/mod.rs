//! Core types for SimpleMART.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod money;
pub mod product;
pub mod status;
pub mod user;

pub use cart::{Cart, CartLineItem};
pub use email::{Email, EmailError};
pub use id::ProductId;
pub use money::Price;
pub use product::{ALL_CATEGORIES, Product, Rating};
pub use status::{PAYMENT_FAILED_ROUTE, PAYMENT_SUCCESS_ROUTE, PaymentOutcome, UnknownPaymentRoute};
pub use user::{Address, DEFAULT_PROFILE_ID, PersonName, UserProfile};
