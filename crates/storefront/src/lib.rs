//! Pizzeria Storefront - client-side state model.
//!
//! This crate owns the two stateful pieces of the ordering app:
//!
//! - the session state machine (bootstrap, mocked login, logout, username
//!   edits) in [`services::session`]
//! - the cart/offer aggregate with optional persistence and a mocked remote
//!   sync in [`services::cart`]
//!
//! Screens are external collaborators. They read state through
//! [`state::AppState`] and the [`navigation`] gate, and issue commands
//! through the service methods.
//!
//! # Side effects
//!
//! Every command applies its in-memory change first. Persistence and remote
//! sync run afterwards, and their failures are logged (and reported to
//! Sentry when configured) instead of being returned to the caller.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
