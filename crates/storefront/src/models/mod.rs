//! Domain models for the storefront state model.
//!
//! These are plain data types with their pure transitions. The services in
//! [`crate::services`] own the live instances and add the side effects.

pub mod cart;
pub mod offer;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartSnapshot, SyncStatus};
pub use offer::Offer;
pub use session::{Authenticated, Session};
pub use user::User;
