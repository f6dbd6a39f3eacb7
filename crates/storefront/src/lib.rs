//! SimpleMART storefront library.
//!
//! The session store with write-through persistence, the catalog, auth, and
//! payment clients, and the flows that tie them together. The `simplemart`
//! binary drives everything through this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod feed;
pub mod services;
pub mod state;
pub mod store;
