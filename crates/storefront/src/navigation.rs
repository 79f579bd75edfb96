//! Navigation gate: which screens the current session may reach.

use std::fmt;

use crate::models::Session;

/// Screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Loading,
    Login,
    NotFound,
    Home,
    Offers,
    Checkout,
    Profile,
    Explore,
    EditProfile,
    NewAddress,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Login => "login",
            Self::NotFound => "not_found",
            Self::Home => "home",
            Self::Offers => "offers",
            Self::Checkout => "checkout",
            Self::Profile => "profile",
            Self::Explore => "explore",
            Self::EditProfile => "edit_profile",
            Self::NewAddress => "new_address",
        };
        f.write_str(name)
    }
}

/// Screen group reachable in a given session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Session restore still running.
    Loading,
    /// Logged out.
    Public,
    /// Logged in.
    Authenticated,
}

impl Route {
    /// Pick the route group for a session.
    #[must_use]
    pub const fn for_session(session: &Session) -> Self {
        if !session.is_bootstrapped() {
            Self::Loading
        } else if session.is_logged_in() {
            Self::Authenticated
        } else {
            Self::Public
        }
    }

    /// Whether `screen` is reachable in this route group.
    #[must_use]
    pub const fn allows(self, screen: Screen) -> bool {
        match self {
            Self::Loading => matches!(screen, Screen::Loading),
            Self::Public => matches!(screen, Screen::Login | Screen::NotFound),
            Self::Authenticated => !matches!(screen, Screen::Loading | Screen::Login),
        }
    }

    /// Screen shown on entering this route group.
    #[must_use]
    pub const fn landing(self) -> Screen {
        match self {
            Self::Loading => Screen::Loading,
            Self::Public => Screen::Login,
            Self::Authenticated => Screen::Home,
        }
    }
}
