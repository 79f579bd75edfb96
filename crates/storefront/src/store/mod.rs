//! Persistent key-value store.
//!
//! The state model persists three values, each under its own key (see
//! [`keys`]). Every operation is asynchronous and can fail independently;
//! callers decide whether a failure matters (bootstrap degrades to logged
//! out, writes are logged and otherwise ignored).
//!
//! # Implementations
//!
//! - [`MemoryStore`] - In-process map, with failure injection for tests
//! - [`FileStore`] - One file per key under a data directory

mod file;
mod memory;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys.
pub mod keys {
    /// JSON-encoded [`crate::models::User`].
    pub const AUTH_USER: &str = "auth:user";

    /// Raw session token string.
    pub const AUTH_TOKEN: &str = "auth:token";

    /// JSON-encoded [`crate::models::CartSnapshot`].
    pub const CART_STATE: &str = "cart:state";
}

/// Asynchronous string key-value storage.
///
/// Implementations must be cheap to share: services hold them in an `Arc`
/// and call them from spawned background tasks.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns `StoreError` if the read fails or the stored text is not valid
/// JSON for `T`.
pub async fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
///
/// # Errors
///
/// Returns `StoreError` if encoding or the write fails.
pub async fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize + Sync + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
