//! Core types for the Pizzeria app.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod token;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, PriceParseError};
pub use status::*;
pub use token::SessionToken;
