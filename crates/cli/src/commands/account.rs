//! Login, logout and profile commands.

use pizzeria_storefront::error::SessionError;
use pizzeria_storefront::state::AppState;

/// Log in as `email`.
#[allow(clippy::print_stdout)]
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(), SessionError> {
    let user = state.session().login(email, password).await?;
    println!("Logged in as {} ({})", user.display_name(), user.email);
    Ok(())
}

/// Log out. Runs the full logout even when nobody is logged in, so stale
/// stored keys are removed and the cart policy still applies.
#[allow(clippy::print_stdout)]
pub async fn logout(state: &AppState) {
    let was_logged_in = state.session().snapshot().is_logged_in();
    state.logout().await;
    if was_logged_in {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
}

#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) -> Result<(), SessionError> {
    let user = state.session().current_user()?;
    println!("{}", user.display_name());
    println!("  id:    {}", user.id);
    println!("  email: {}", user.email);
    Ok(())
}

/// Change the username and wait for the local write and the profile sync.
#[allow(clippy::print_stdout)]
pub async fn rename(state: &AppState, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sync = state.session().update_username(name)?;
    println!("Username set to {}", name.trim());
    if let Some(sync) = sync {
        sync.await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pizzeria_core::{ItemId, Price};
    use pizzeria_storefront::config::StorefrontConfig;
    use pizzeria_storefront::store::{FileStore, KeyValueStore, keys};

    use super::*;

    #[tokio::test]
    async fn test_logout_when_logged_out_still_cleans_up() {
        let data_dir = std::env::temp_dir().join(format!(
            "pizzeria-cli-{}",
            uuid::Uuid::new_v4().simple()
        ));
        let store = FileStore::new(data_dir.clone());
        store.set(keys::AUTH_TOKEN, "tok-stale").await.unwrap();

        let state = AppState::from_config(StorefrontConfig {
            data_dir: data_dir.clone(),
            cart_persistence: false,
            clear_cart_on_logout: true,
            ..StorefrontConfig::default()
        });
        let (session, _) = state.start().await;
        assert!(!session.is_logged_in());
        let _ = state
            .cart()
            .add_item(ItemId::new("a"), "A", Price::from_cents(100));

        logout(&state).await;

        assert_eq!(store.get(keys::AUTH_TOKEN).await.unwrap(), None);
        assert!(state.cart().cart().is_empty());

        tokio::fs::remove_dir_all(&data_dir).await.unwrap();
    }
}
