//! Pizzeria Core - Shared domain types.
//!
//! This crate provides the types shared by the state model and its callers:
//! - `storefront` - Session state machine and cart/offer aggregate
//! - `cli` - Command-line driver for the state model
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no runtime.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, tokens and phases

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
