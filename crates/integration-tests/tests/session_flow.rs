//! Integration tests for the session lifecycle.
//!
//! Each test builds fresh app states over a shared store, so a second
//! `AppState` on the same store plays the part of the next process.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pizzeria_core::SessionPhase;
use pizzeria_integration_tests::{app_with, app_with_store, temp_data_dir, test_config};
use pizzeria_storefront::config::StorefrontConfig;
use pizzeria_storefront::models::Session;
use pizzeria_storefront::navigation::Route;
use pizzeria_storefront::state::AppState;
use pizzeria_storefront::store::{MemoryStore, keys};
use pizzeria_storefront::sync::MockBackend;

fn assert_paired(session: &Session) {
    assert_eq!(session.user().is_none(), session.token().is_none());
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fresh_process_login_rename_logout() {
    let store = MemoryStore::new();
    let backend = MockBackend::new(Duration::from_millis(500), Duration::ZERO);
    let app = app_with(&store, &backend, test_config());

    let (session, _) = app.start().await;
    assert!(session.user().is_none());
    assert!(session.token().is_none());
    assert!(session.is_bootstrapped());
    assert_eq!(app.route(), Route::Public);

    let user = app.session().login("a@b.com", "x").await.unwrap();
    let session = app.session().snapshot();
    assert_eq!(session.user(), Some(&user));
    assert!(session.token().is_some());
    assert_eq!(app.route(), Route::Authenticated);

    let sync = app.session().update_username("Bob").unwrap().unwrap();
    let user = app.session().current_user().unwrap();
    assert_eq!(user.user_name.as_deref(), Some("Bob"));
    assert!(!sync.is_finished());

    sync.await.unwrap();
    assert_eq!(backend.profile_calls(), 1);

    app.logout().await;
    let session = app.session().snapshot();
    assert!(session.user().is_none());
    assert!(session.token().is_none());
    assert!(session.is_bootstrapped());
    assert_eq!(session.phase(), SessionPhase::LoggedOut);
    assert!(store.peek(keys::AUTH_USER).await.is_none());
    assert!(store.peek(keys::AUTH_TOKEN).await.is_none());
}

#[tokio::test]
async fn test_login_logout_cycles_keep_user_and_token_paired() {
    let app = app_with_store(&MemoryStore::new());
    assert_paired(&app.start().await.0);

    for email in ["a@b.com", "c@d.it", "e@f.org"] {
        app.session().login(email, "pw").await.unwrap();
        assert_paired(&app.session().snapshot());
        app.logout().await;
        assert_paired(&app.session().snapshot());
    }
}

#[tokio::test]
async fn test_second_start_keeps_state() {
    let app = app_with_store(&MemoryStore::new());
    app.start().await;
    app.session().login("a@b.com", "pw").await.unwrap();
    let before = app.session().snapshot();

    let (after, _) = app.start().await;
    assert_eq!(after, before);
    assert!(after.is_bootstrapped());
}

// ============================================================================
// Restore across processes
// ============================================================================

#[tokio::test]
async fn test_session_restored_in_next_process() {
    let store = MemoryStore::new();

    let first = app_with_store(&store);
    first.start().await;
    let user = first.session().login("mario@example.com", "pw").await.unwrap();
    let token = first.session().snapshot().token().cloned().unwrap();

    let second = app_with_store(&store);
    let (session, _) = second.start().await;
    assert_eq!(session.user(), Some(&user));
    assert_eq!(session.token(), Some(&token));
    assert_eq!(second.route(), Route::Authenticated);
}

#[tokio::test]
async fn test_renamed_user_survives_restart() {
    let store = MemoryStore::new();

    let first = app_with_store(&store);
    first.start().await;
    first.session().login("mario@example.com", "pw").await.unwrap();
    first
        .session()
        .update_username("  Super Mario ")
        .unwrap()
        .unwrap()
        .await
        .unwrap();

    let second = app_with_store(&store);
    second.start().await;
    let user = second.session().current_user().unwrap();
    assert_eq!(user.display_name(), "Super Mario");
}

#[tokio::test]
async fn test_logout_is_not_undone_by_restart() {
    let store = MemoryStore::new();

    let first = app_with_store(&store);
    first.start().await;
    first.session().login("a@b.com", "pw").await.unwrap();
    first.logout().await;

    let second = app_with_store(&store);
    let (session, _) = second.start().await;
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_unreadable_store_boots_logged_out() {
    let store = MemoryStore::failing();
    let app = app_with_store(&store);

    let (session, cart) = app.start().await;
    assert!(session.is_bootstrapped());
    assert!(!session.is_logged_in());
    assert!(cart.is_empty());

    // Writes fail too, but the in-memory login still goes through.
    app.session().login("a@b.com", "pw").await.unwrap();
    assert!(app.session().snapshot().is_logged_in());
}

#[tokio::test]
async fn test_file_store_restores_session() {
    let data_dir = temp_data_dir();
    let config = StorefrontConfig {
        data_dir: data_dir.clone(),
        ..test_config()
    };

    let first = AppState::from_config(config.clone());
    first.start().await;
    let user = first.session().login("luigi@example.com", "pw").await.unwrap();

    let second = AppState::from_config(config);
    let (session, _) = second.start().await;
    assert_eq!(session.user(), Some(&user));

    second.logout().await;
    let third = AppState::from_config(StorefrontConfig {
        data_dir: data_dir.clone(),
        ..test_config()
    });
    assert!(!third.start().await.0.is_logged_in());

    tokio::fs::remove_dir_all(&data_dir).await.unwrap();
}
