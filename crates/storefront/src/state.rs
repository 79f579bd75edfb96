//! Application state shared across commands and screens.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::StorefrontConfig;
use crate::models::{Cart, Session};
use crate::navigation::Route;
use crate::services::cart::CartService;
use crate::services::session::SessionService;
use crate::store::{FileStore, KeyValueStore};
use crate::sync::{CartSync, MockBackend, ProfileSync};

/// Application state: the session and the cart over one store and backend.
///
/// This struct is cheaply cloneable via `Arc`; clones share the same session
/// and cart.
pub struct AppState<S = FileStore, B = MockBackend> {
    inner: Arc<AppStateInner<S, B>>,
}

impl<S, B> Clone for AppState<S, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<S, B> {
    config: StorefrontConfig,
    session: SessionService<S, B>,
    cart: CartService<S, B>,
}

impl AppState {
    /// Build the default wiring: a [`FileStore`] under the configured data
    /// directory and a [`MockBackend`] with the configured latencies.
    #[must_use]
    pub fn from_config(config: StorefrontConfig) -> Self {
        let store = FileStore::new(config.data_dir.clone());
        let backend = MockBackend::new(config.profile_sync_delay, config.cart_sync_delay);
        Self::new(config, store, backend)
    }
}

impl<S, B> AppState<S, B>
where
    S: KeyValueStore + Clone,
    B: ProfileSync + CartSync + Clone,
{
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: S, backend: B) -> Self {
        let session = SessionService::new(store.clone(), backend.clone());
        let cart = CartService::new(store, backend, config.cart_persistence);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                cart,
            }),
        }
    }

    /// Restore the persisted session and cart.
    ///
    /// Both restores run once; later calls return the current state.
    #[instrument(skip_all)]
    pub async fn start(&self) -> (Session, Cart) {
        let (session, cart) = tokio::join!(self.inner.session.bootstrap(), self.inner.cart.restore());
        info!(
            phase = %session.phase(),
            cart_items = cart.item_count(),
            "App state ready"
        );
        (session, cart)
    }

    /// Log out, clearing the cart too if configured to.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        self.inner.session.logout().await;
        if self.inner.config.clear_cart_on_logout {
            let _ = self.inner.cart.clear();
        }
    }

    /// Route group for the current session.
    #[must_use]
    pub fn route(&self) -> Route {
        Route::for_session(&self.inner.session.snapshot())
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the session service.
    #[must_use]
    pub fn session(&self) -> &SessionService<S, B> {
        &self.inner.session
    }

    /// Get the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService<S, B> {
        &self.inner.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pizzeria_core::{ItemId, Price};

    use super::*;
    use crate::store::MemoryStore;

    fn app(store: &MemoryStore, config: StorefrontConfig) -> AppState<MemoryStore, MockBackend> {
        AppState::new(config, store.clone(), MockBackend::instant())
    }

    #[tokio::test]
    async fn test_start_moves_route_out_of_loading() {
        let state = app(&MemoryStore::new(), StorefrontConfig::default());
        assert_eq!(state.route(), Route::Loading);

        state.start().await;
        assert_eq!(state.route(), Route::Public);

        state.session().login("a@b.com", "pw").await.unwrap();
        assert_eq!(state.route(), Route::Authenticated);
    }

    #[tokio::test]
    async fn test_logout_keeps_cart_by_default() {
        let state = app(&MemoryStore::new(), StorefrontConfig::default());
        state.start().await;
        state.session().login("a@b.com", "pw").await.unwrap();
        let _ = state.cart().add_item(ItemId::new("a"), "A", Price::from_cents(100));

        state.logout().await;
        assert_eq!(state.route(), Route::Public);
        assert_eq!(state.cart().cart().items().len(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_cart_when_configured() {
        let config = StorefrontConfig {
            clear_cart_on_logout: true,
            ..StorefrontConfig::default()
        };
        let state = app(&MemoryStore::new(), config);
        state.start().await;
        state.session().login("a@b.com", "pw").await.unwrap();
        let _ = state.cart().add_item(ItemId::new("a"), "A", Price::from_cents(100));

        state.logout().await;
        assert!(state.cart().cart().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let state = app(&MemoryStore::new(), StorefrontConfig::default());
        let clone = state.clone();
        let _ = clone.cart().add_item(ItemId::new("a"), "A", Price::from_cents(100));
        assert_eq!(state.cart().cart().items().len(), 1);
    }
}
