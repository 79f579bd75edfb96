//! Integration tests for the pizzeria session and cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pizzeria-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - bootstrap, login, profile edits, logout, restore
//! - `cart_flow` - totals, offers, sync, persistence, logout policy
//!
//! Everything runs in-process against [`MemoryStore`] and [`MockBackend`],
//! except the file-store tests, which use a fresh temporary directory.

use std::path::PathBuf;

use pizzeria_storefront::config::StorefrontConfig;
use pizzeria_storefront::state::AppState;
use pizzeria_storefront::store::MemoryStore;
use pizzeria_storefront::sync::MockBackend;

/// App state wired to in-memory collaborators.
pub type TestApp = AppState<MemoryStore, MockBackend>;

/// Defaults with the cart persisted and no artificial latency.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        profile_sync_delay: std::time::Duration::ZERO,
        cart_sync_delay: std::time::Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

/// Build an app over `store` with an instant, succeeding backend.
#[must_use]
pub fn app_with_store(store: &MemoryStore) -> TestApp {
    AppState::new(test_config(), store.clone(), MockBackend::instant())
}

/// Build an app over `store` and `backend`.
#[must_use]
pub fn app_with(store: &MemoryStore, backend: &MockBackend, config: StorefrontConfig) -> TestApp {
    AppState::new(config, store.clone(), backend.clone())
}

/// A data directory nobody else uses.
#[must_use]
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("pizzeria-it-{}", uuid::Uuid::new_v4().simple()))
}
