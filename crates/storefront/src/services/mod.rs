//! Stateful services layered over the domain models.
//!
//! - [`session`] - authentication state machine and profile updates
//! - [`cart`] - cart/offer aggregate with persistence and remote sync
//! - [`profile`] - edit-profile draft with an unsaved-changes guard

pub mod cart;
pub mod profile;
pub mod session;
