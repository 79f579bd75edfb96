//! Cart/offer aggregate service.
//!
//! Wraps the pure [`Cart`] with:
//!
//! - change notification over a `watch` channel
//! - optional mirroring of `items`/`selectedOffer` to the persistent store
//! - a single-flight remote sync with pending/success/failure tracking
//!
//! Mutations are synchronous and return the updated cart. Persistence runs
//! on a spawned task behind a lock, and each write stores whatever the cart
//! holds when the lock is acquired, so the last write always carries the
//! latest contents.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OnceCell, watch};
use tracing::{debug, info, instrument, warn};

use pizzeria_core::{ItemId, Price};

use crate::error::{StoreError, add_breadcrumb, report_background_failure};
use crate::models::{Cart, CartSnapshot, Offer, SyncStatus};
use crate::store::{KeyValueStore, keys, read_json, write_json};
use crate::sync::CartSync;

/// Everything the cart service publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub cart: Cart,
    pub sync: SyncStatus,
    revision: u64,
    syncs_completed: u64,
    /// Status as it stood when sync number `syncs_completed` finished.
    settled: SyncStatus,
}

impl CartState {
    /// Counter bumped on every change to the cart contents.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Owner of the process-wide [`Cart`].
///
/// Cheaply cloneable; clones drive the same cart.
pub struct CartService<S, C> {
    inner: Arc<CartInner<S, C>>,
}

impl<S, C> Clone for CartService<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CartInner<S, C> {
    state: watch::Sender<CartState>,
    store: S,
    backend: C,
    persistence: bool,
    restore: OnceCell<()>,
    persist: Mutex<()>,
}

impl<S, C> CartService<S, C>
where
    S: KeyValueStore,
    C: CartSync,
{
    /// Create an empty cart.
    ///
    /// With `persistence` off, the cart lives in memory only: nothing is
    /// restored or written.
    #[must_use]
    pub fn new(store: S, backend: C, persistence: bool) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            inner: Arc::new(CartInner {
                state,
                store,
                backend,
                persistence,
                restore: OnceCell::new(),
                persist: Mutex::new(()),
            }),
        }
    }

    /// A copy of the current state, including sync status.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().cart.clone()
    }

    /// Current cart total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.inner.state.borrow().cart.total()
    }

    /// Current sync status.
    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        self.inner.state.borrow().sync.clone()
    }

    /// Watch the cart for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Load the persisted cart, once.
    ///
    /// A stored cart only replaces the in-memory one if the cart has not
    /// been changed yet. Unreadable or corrupt storage leaves the cart as
    /// it is.
    #[instrument(skip_all)]
    pub async fn restore(&self) -> Cart {
        if self.inner.persistence {
            self.inner
                .restore
                .get_or_init(|| async {
                    match read_json::<_, CartSnapshot>(&self.inner.store, keys::CART_STATE).await {
                        Ok(Some(snapshot)) => {
                            let restored = Cart::from(snapshot);
                            let installed = self.inner.state.send_if_modified(|state| {
                                if state.revision != 0 {
                                    return false;
                                }
                                state.cart = restored;
                                true
                            });
                            if installed {
                                info!("Cart restored");
                            } else {
                                warn!("Cart changed before restore finished, keeping local cart");
                            }
                        }
                        Ok(None) => debug!("No stored cart"),
                        Err(e) => warn!(error = %e, "Failed to read stored cart, starting empty"),
                    }
                })
                .await;
        }
        self.cart()
    }

    /// Add one unit of an item.
    #[must_use = "the updated cart is returned for rendering"]
    pub fn add_item(&self, id: ItemId, name: impl Into<String>, price: Price) -> Cart {
        let name = name.into();
        debug!(item_id = %id, "Adding item to cart");
        self.mutate(|cart| {
            cart.add_item(id, name, price);
            true
        })
    }

    /// Remove one unit of an item. Unknown ids are ignored.
    #[must_use = "the updated cart is returned for rendering"]
    pub fn remove_item(&self, id: &ItemId) -> Cart {
        debug!(item_id = %id, "Removing item from cart");
        self.mutate(|cart| cart.remove_item(id))
    }

    /// Replace the selected offer; `None` clears it.
    #[must_use = "the updated cart is returned for rendering"]
    pub fn set_offer(&self, offer: Option<Offer>) -> Cart {
        debug!(offer_id = ?offer.as_ref().map(|o| &o.id), "Setting cart offer");
        self.mutate(|cart| {
            if cart.selected_offer() == offer.as_ref() {
                return false;
            }
            cart.set_offer(offer);
            true
        })
    }

    /// Empty the items and clear the offer in one step.
    #[must_use = "the updated cart is returned for rendering"]
    pub fn clear(&self) -> Cart {
        add_breadcrumb("cart", "Cleared cart");
        self.mutate(|cart| {
            if cart.is_empty() {
                return false;
            }
            cart.clear();
            true
        })
    }

    /// Push the cart to the backend.
    ///
    /// Single-flight: a call made while a sync is pending joins it instead
    /// of starting another, and resolves with the same outcome. The sync
    /// runs on its own task, so dropping the returned future does not
    /// cancel it. A call made after the in-flight sync finished starts a
    /// new one with the then-current contents. A caller resolves once the
    /// sync it started or joined completes, even if a later sync is already
    /// pending by the time it is polled again.
    ///
    /// On success the backend's copy replaces the local cart, unless the
    /// cart changed while the sync was in flight. On failure the error is
    /// recorded in the status and the cart is left untouched.
    #[instrument(skip_all)]
    pub async fn sync(&self) -> SyncStatus {
        // Whether this call starts a sync or joins one, the sync it waits
        // for is the next one to complete.
        let mut awaited = 0;
        let started = self.inner.state.send_if_modified(|state| {
            awaited = state.syncs_completed + 1;
            if state.sync.pending {
                return false;
            }
            state.sync.pending = true;
            state.sync.error = None;
            true
        });

        if started {
            add_breadcrumb("cart", "Started cart sync");
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { inner.run_sync().await });
        } else {
            debug!("Cart sync already pending, joining it");
        }

        let mut rx = self.inner.state.subscribe();
        let status = rx
            .wait_for(|state| state.syncs_completed >= awaited)
            .await
            .map(|state| state.settled.clone());
        status.unwrap_or_else(|_| self.sync_status())
    }

    /// Write the current cart to the store and wait for it.
    ///
    /// Use before shutting down, since background writes are not awaited.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn persist_now(&self) -> Result<(), StoreError> {
        if !self.inner.persistence {
            return Ok(());
        }
        self.inner.persist_latest().await
    }

    fn mutate<F>(&self, f: F) -> Cart
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let mut cart = None;
        let changed = self.inner.state.send_if_modified(|state| {
            let changed = f(&mut state.cart);
            if changed {
                state.revision += 1;
            }
            cart = Some(state.cart.clone());
            changed
        });
        if changed {
            self.inner.spawn_persist();
        }
        cart.unwrap_or_default()
    }
}

impl<S, C> CartInner<S, C>
where
    S: KeyValueStore,
    C: CartSync,
{
    fn spawn_persist(self: &Arc<Self>) {
        if !self.persistence {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, cart change not persisted");
            return;
        };
        let inner = Arc::clone(self);
        runtime.spawn(async move {
            if let Err(e) = inner.persist_latest().await {
                report_background_failure("persist_cart", &e);
            }
        });
    }

    async fn persist_latest(&self) -> Result<(), StoreError> {
        let _guard = self.persist.lock().await;
        let snapshot = self.state.borrow().cart.snapshot();
        write_json(&self.store, keys::CART_STATE, &snapshot).await
    }

    async fn run_sync(self: Arc<Self>) {
        let (snapshot, revision) = {
            let state = self.state.borrow();
            (state.cart.snapshot(), state.revision)
        };

        let result = self.backend.sync_cart(snapshot).await;
        if let Err(e) = &result {
            report_background_failure("sync_cart", e);
        }

        let mut replaced = false;
        self.state.send_modify(|state| {
            state.sync.pending = false;
            match result {
                Ok(response) => {
                    state.sync.last_synced_at = Some(Utc::now());
                    info!(message = %response.message, "Cart synced");
                    if state.revision == revision {
                        let server_cart = Cart::from(response.server_state);
                        if server_cart != state.cart {
                            state.cart = server_cart;
                            state.revision += 1;
                            replaced = true;
                        }
                    } else {
                        debug!("Cart changed during sync, keeping local contents");
                    }
                }
                Err(e) => state.sync.error = Some(e.to_string()),
            }
            state.syncs_completed += 1;
            state.settled = state.sync.clone();
        });

        if replaced {
            self.spawn_persist();
        }
    }
}
