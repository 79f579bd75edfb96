//! Session state machine.
//!
//! `Booting` → `LoggedOut` ⇄ `LoggedIn`. The session is published on a
//! `watch` channel; commands apply their transition to it and mirror
//! `user`/`token` into the persistent store.
//!
//! Login is mocked: credentials are not checked against anything, a user
//! record and token are synthesized locally.

use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use pizzeria_core::{Email, SessionPhase, SessionToken, UserId};

use crate::error::{SessionError, add_breadcrumb, report_background_failure};
use crate::models::{Authenticated, Session, User};
use crate::store::{KeyValueStore, keys, read_json, write_json};
use crate::sync::ProfileSync;

/// Owner of the process-wide [`Session`].
///
/// Cheaply cloneable; clones drive the same session.
pub struct SessionService<S, P> {
    inner: Arc<SessionInner<S, P>>,
}

impl<S, P> Clone for SessionService<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionInner<S, P> {
    state: watch::Sender<Session>,
    store: S,
    profile_sync: P,
    bootstrap: OnceCell<()>,
    /// Serializes writes of the auth keys so a late background write can't
    /// resurrect a session that has since logged out.
    persist: Mutex<()>,
}

impl<S, P> SessionService<S, P>
where
    S: KeyValueStore,
    P: ProfileSync,
{
    /// Create a service in the `Booting` phase.
    #[must_use]
    pub fn new(store: S, profile_sync: P) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(SessionInner {
                state,
                store,
                profile_sync,
                bootstrap: OnceCell::new(),
                persist: Mutex::new(()),
            }),
        }
    }

    /// A copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Watch the session for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Current phase of the state machine.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase()
    }

    /// The logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` if nobody is logged in.
    pub fn current_user(&self) -> Result<User, SessionError> {
        self.inner
            .state
            .borrow()
            .user()
            .cloned()
            .ok_or(SessionError::NotLoggedIn)
    }

    /// Restore the persisted session and leave the `Booting` phase.
    ///
    /// Runs once per service: concurrent and later calls wait for the first
    /// one and return the current session without touching the store again.
    /// Never fails; unreadable storage yields a logged-out session.
    #[instrument(skip_all)]
    pub async fn bootstrap(&self) -> Session {
        self.inner
            .bootstrap
            .get_or_init(|| async {
                let restored = self.restore().await;
                let logged_in = restored.is_some();
                self.inner.state.send_modify(|session| {
                    session.bootstrap_done(restored);
                });
                info!(restored = logged_in, "Session bootstrapped");
            })
            .await;
        self.snapshot()
    }

    async fn restore(&self) -> Option<Authenticated> {
        let store = &self.inner.store;
        let (user, token) = tokio::join!(
            read_json::<_, User>(store, keys::AUTH_USER),
            store.get(keys::AUTH_TOKEN),
        );

        let (user, token) = match (user, token) {
            (Ok(user), Ok(token)) => (user, token.and_then(SessionToken::new)),
            (user, token) => {
                if let Err(e) = &user {
                    warn!(error = %e, "Failed to read stored user, starting logged out");
                }
                if let Err(e) = &token {
                    warn!(error = %e, "Failed to read stored token, starting logged out");
                }
                return None;
            }
        };

        match (user, token) {
            (Some(user), Some(token)) => Some(Authenticated { user, token }),
            (None, Some(_)) => {
                warn!("Stored token has no user record, starting logged out");
                None
            }
            _ => None,
        }
    }

    /// Log in with a mocked backend.
    ///
    /// The password is not checked. Both auth keys are written in parallel
    /// before the session switches to `LoggedIn`; a failed write is reported
    /// but does not stop the login, it only means the next process may
    /// start logged out. Logging in while logged in replaces the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEmail` if `email` is malformed.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, _password: &str) -> Result<User, SessionError> {
        let email = Email::parse(email)?;
        let user = User {
            id: UserId::new(uuid::Uuid::new_v4().to_string()),
            email,
            user_name: None,
        };
        let token = SessionToken::generate();

        {
            let _guard = self.inner.persist.lock().await;
            let store = &self.inner.store;
            let (user_written, token_written) = tokio::join!(
                write_json(store, keys::AUTH_USER, &user),
                store.set(keys::AUTH_TOKEN, token.expose()),
            );
            if let Err(e) = user_written {
                report_background_failure("persist_user", &e);
            }
            if let Err(e) = token_written {
                report_background_failure("persist_token", &e);
            }

            self.inner.state.send_modify(|session| {
                session.log_in(Authenticated {
                    user: user.clone(),
                    token,
                });
            });
        }

        add_breadcrumb("auth", "Logged in");
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Log out, removing both auth keys in parallel.
    ///
    /// Callable in any phase; when already logged out only the redundant
    /// removals happen. Removal failures are reported, the in-memory
    /// session is cleared regardless.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        let _guard = self.inner.persist.lock().await;
        let store = &self.inner.store;
        let (user_removed, token_removed) = tokio::join!(
            store.remove(keys::AUTH_USER),
            store.remove(keys::AUTH_TOKEN),
        );
        if let Err(e) = user_removed {
            report_background_failure("remove_user", &e);
        }
        if let Err(e) = token_removed {
            report_background_failure("remove_token", &e);
        }

        let was_logged_in = self.inner.state.send_if_modified(|session| {
            let was_logged_in = session.is_logged_in();
            session.log_out();
            was_logged_in
        });
        add_breadcrumb("auth", "Logged out");
        info!(was_logged_in, "User logged out");
    }

    /// Change the logged-in user's display name.
    ///
    /// The in-memory session is updated before this returns. Persisting the
    /// user and pushing it to the profile backend happen on a spawned task,
    /// whose handle is returned for callers that want to wait for it.
    /// Background failures are reported and never roll the name back.
    ///
    /// Outside a Tokio runtime the name is still changed, but nothing is
    /// persisted or synced and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidUsername` if `new_name` is blank and
    /// `SessionError::NotLoggedIn` if nobody is logged in.
    pub fn update_username(
        &self,
        new_name: &str,
    ) -> Result<Option<JoinHandle<()>>, SessionError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(SessionError::InvalidUsername);
        }

        let mut updated = None;
        self.inner.state.send_if_modified(|session| {
            updated = session.set_user_name(new_name.to_owned());
            updated.is_some()
        });
        let user = updated.ok_or(SessionError::NotLoggedIn)?;
        add_breadcrumb("profile", "Changed username");
        debug!(user_id = %user.id, "Username updated in memory");

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(user_id = %user.id, "No async runtime, username change not persisted");
            return Ok(None);
        };
        let inner = Arc::clone(&self.inner);
        Ok(Some(runtime.spawn(async move { inner.push_profile(user).await })))
    }
}

impl<S, P> SessionInner<S, P>
where
    S: KeyValueStore,
    P: ProfileSync,
{
    /// Persist and sync the user produced by a rename.
    ///
    /// The store gets whatever the session holds for that user when the
    /// lock is acquired, so overlapping renames leave the latest name on
    /// disk. Nothing is written once that user is no longer logged in. The
    /// profile backend always receives `user` itself.
    async fn push_profile(&self, user: User) {
        {
            let _guard = self.persist.lock().await;
            let current = self
                .state
                .borrow()
                .user()
                .filter(|current| current.id == user.id)
                .cloned();
            match current {
                Some(current) => {
                    if let Err(e) = write_json(&self.store, keys::AUTH_USER, &current).await {
                        report_background_failure("persist_user", &e);
                    }
                }
                None => debug!(user_id = %user.id, "User no longer logged in, skipping profile write"),
            }
        }

        match self.profile_sync.sync_profile(&user).await {
            Ok(()) => info!(user_id = %user.id, "Profile synced"),
            Err(e) => report_background_failure("sync_profile", &e),
        }
    }
}
