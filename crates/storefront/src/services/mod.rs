//! Service layer: API clients and the flows built on them.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod payment;
