//! Console session state machine.
//!
//! The console client is menu-driven: the set of actions offered
//! depends on whether a session is authenticated, and the outcome of
//! an action can move the session between the two states.

/// Authentication state of the console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No valid credentials; only signup and login are offered.
    Unauthenticated,
    /// Logged in; account actions are offered.
    Authenticated,
}

/// An action selectable from the console menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Register a new account.
    Signup,
    /// Log in with email and password.
    Login,
    /// Show nickname and profile image.
    GetProfile,
    /// Update nickname and profile image.
    UpdateProfile,
    /// Change the login email.
    UpdateEmail,
    /// Change the phone number.
    UpdatePhoneNumber,
    /// Show the full account record.
    GetUserDetails,
    /// Change the password.
    ChangePassword,
    /// Log out and clear stored credentials.
    Logout,
    /// Delete the account.
    Withdraw,
    /// Exit the console.
    Quit,
}

/// A labelled menu entry.
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    /// The key the user types to pick this entry.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// The action behind the entry.
    pub action: MenuAction,
}

const UNAUTHENTICATED_MENU: &[MenuItem] = &[
    MenuItem {
        key: "1",
        label: "Sign up",
        action: MenuAction::Signup,
    },
    MenuItem {
        key: "2",
        label: "Log in",
        action: MenuAction::Login,
    },
    MenuItem {
        key: "q",
        label: "Quit",
        action: MenuAction::Quit,
    },
];

const AUTHENTICATED_MENU: &[MenuItem] = &[
    MenuItem {
        key: "1",
        label: "View profile (nickname/image)",
        action: MenuAction::GetProfile,
    },
    MenuItem {
        key: "2",
        label: "Update profile (nickname/image)",
        action: MenuAction::UpdateProfile,
    },
    MenuItem {
        key: "3",
        label: "Change email",
        action: MenuAction::UpdateEmail,
    },
    MenuItem {
        key: "4",
        label: "Change phone number",
        action: MenuAction::UpdatePhoneNumber,
    },
    MenuItem {
        key: "5",
        label: "View account details (email/phone included)",
        action: MenuAction::GetUserDetails,
    },
    MenuItem {
        key: "6",
        label: "Change password",
        action: MenuAction::ChangePassword,
    },
    MenuItem {
        key: "7",
        label: "Log out",
        action: MenuAction::Logout,
    },
    MenuItem {
        key: "8",
        label: "Delete account",
        action: MenuAction::Withdraw,
    },
    MenuItem {
        key: "q",
        label: "Quit",
        action: MenuAction::Quit,
    },
];

/// The menu offered in the given state.
pub fn menu(state: SessionState) -> &'static [MenuItem] {
    match state {
        SessionState::Unauthenticated => UNAUTHENTICATED_MENU,
        SessionState::Authenticated => AUTHENTICATED_MENU,
    }
}

/// Resolve typed input against the current menu.
pub fn parse_choice(state: SessionState, input: &str) -> Option<MenuAction> {
    let input = input.trim();
    menu(state)
        .iter()
        .find(|item| item.key.eq_ignore_ascii_case(input))
        .map(|item| item.action)
}

/// The state after an action completed successfully.
///
/// Email and password changes invalidate the server-side session, so
/// they drop back to Unauthenticated alongside logout and withdrawal.
pub fn transition(state: SessionState, action: MenuAction) -> SessionState {
    match (state, action) {
        (SessionState::Unauthenticated, MenuAction::Login) => SessionState::Authenticated,
        (SessionState::Authenticated, MenuAction::UpdateEmail)
        | (SessionState::Authenticated, MenuAction::ChangePassword)
        | (SessionState::Authenticated, MenuAction::Logout)
        | (SessionState::Authenticated, MenuAction::Withdraw) => SessionState::Unauthenticated,
        (state, _) => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_menu_offers_signup_and_login() {
        let actions: Vec<MenuAction> = menu(SessionState::Unauthenticated)
            .iter()
            .map(|item| item.action)
            .collect();
        assert!(actions.contains(&MenuAction::Signup));
        assert!(actions.contains(&MenuAction::Login));
        assert!(!actions.contains(&MenuAction::Logout));
    }

    #[test]
    fn parse_choice_matches_keys() {
        assert_eq!(
            parse_choice(SessionState::Unauthenticated, "2"),
            Some(MenuAction::Login)
        );
        assert_eq!(
            parse_choice(SessionState::Authenticated, " 7 "),
            Some(MenuAction::Logout)
        );
        assert_eq!(
            parse_choice(SessionState::Authenticated, "Q"),
            Some(MenuAction::Quit)
        );
        assert_eq!(parse_choice(SessionState::Unauthenticated, "9"), None);
    }

    #[test]
    fn login_authenticates() {
        assert_eq!(
            transition(SessionState::Unauthenticated, MenuAction::Login),
            SessionState::Authenticated
        );
    }

    #[test]
    fn signup_does_not_authenticate() {
        // Signup deliberately drops back to the login prompt.
        assert_eq!(
            transition(SessionState::Unauthenticated, MenuAction::Signup),
            SessionState::Unauthenticated
        );
    }

    #[test]
    fn credential_invalidation_deauthenticates() {
        for action in [
            MenuAction::UpdateEmail,
            MenuAction::ChangePassword,
            MenuAction::Logout,
            MenuAction::Withdraw,
        ] {
            assert_eq!(
                transition(SessionState::Authenticated, action),
                SessionState::Unauthenticated
            );
        }
    }

    #[test]
    fn read_only_actions_keep_state() {
        for action in [
            MenuAction::GetProfile,
            MenuAction::UpdateProfile,
            MenuAction::UpdatePhoneNumber,
            MenuAction::GetUserDetails,
        ] {
            assert_eq!(
                transition(SessionState::Authenticated, action),
                SessionState::Authenticated
            );
        }
    }
}
