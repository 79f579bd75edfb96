//! Command implementations.

pub mod account;
pub mod cart;

use thiserror::Error;

/// Errors specific to CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No catalog offer has this id.
    #[error("Unknown offer: {0}")]
    UnknownOffer(String),

    /// The offer exists but cannot be selected.
    #[error("Offer is not available: {0}")]
    OfferUnavailable(String),

    /// The backend sync failed.
    #[error("Cart sync failed: {0}")]
    SyncFailed(String),
}
