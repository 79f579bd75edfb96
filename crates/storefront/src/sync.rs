//! Remote backend collaborators.
//!
//! There is no real backend yet. [`MockBackend`] stands in for it: it waits
//! a fixed delay and echoes its input back. The traits are fallible so the
//! services already handle the failure path a real backend will have.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{info, instrument};

use crate::error::SyncError;
use crate::models::{CartSnapshot, User};

/// Pushes profile changes to the backend.
pub trait ProfileSync: Send + Sync + 'static {
    /// Store the user record remotely.
    fn sync_profile(&self, user: &User) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// Backend reply to a cart sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSyncResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The cart as the backend now holds it.
    pub server_state: CartSnapshot,
}

/// Pushes cart snapshots to the backend.
pub trait CartSync: Send + Sync + 'static {
    /// Store the cart remotely and return the backend's view of it.
    fn sync_cart(
        &self,
        snapshot: CartSnapshot,
    ) -> impl Future<Output = Result<CartSyncResponse, SyncError>> + Send;
}

/// Delayed-echo backend implementing both sync contracts.
///
/// Clones share the failure switch and call counters.
#[derive(Debug, Clone)]
pub struct MockBackend {
    profile_delay: Duration,
    cart_delay: Duration,
    inner: Arc<MockBackendInner>,
}

#[derive(Debug, Default)]
struct MockBackendInner {
    fail: AtomicBool,
    profile_calls: AtomicUsize,
    cart_calls: AtomicUsize,
}

impl MockBackend {
    /// Create a backend with the given simulated latencies.
    #[must_use]
    pub fn new(profile_delay: Duration, cart_delay: Duration) -> Self {
        Self {
            profile_delay,
            cart_delay,
            inner: Arc::new(MockBackendInner::default()),
        }
    }

    /// Create a zero-latency backend.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Create a zero-latency backend that rejects every call.
    #[must_use]
    pub fn failing() -> Self {
        let backend = Self::instant();
        backend.set_failing(true);
        backend
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of profile syncs received.
    #[must_use]
    pub fn profile_calls(&self) -> usize {
        self.inner.profile_calls.load(Ordering::SeqCst)
    }

    /// Number of cart syncs received.
    #[must_use]
    pub fn cart_calls(&self) -> usize {
        self.inner.cart_calls.load(Ordering::SeqCst)
    }

    async fn respond(&self, delay: Duration) -> Result<(), SyncError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Rejected("mock backend is failing".to_string()));
        }
        Ok(())
    }
}

impl ProfileSync for MockBackend {
    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn sync_profile(&self, user: &User) -> Result<(), SyncError> {
        self.inner.profile_calls.fetch_add(1, Ordering::SeqCst);
        info!("Syncing profile with mock backend");
        self.respond(self.profile_delay).await?;
        info!(user_name = ?user.user_name, "Profile updated remotely");
        Ok(())
    }
}

impl CartSync for MockBackend {
    #[instrument(skip_all, fields(items = snapshot.items.len()))]
    async fn sync_cart(&self, snapshot: CartSnapshot) -> Result<CartSyncResponse, SyncError> {
        self.inner.cart_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(self.cart_delay).await?;
        info!("Cart saved by mock backend");
        Ok(CartSyncResponse {
            message: "Cart synchronized".to_string(),
            server_state: snapshot,
        })
    }
}
