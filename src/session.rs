//! Per-user session state

use crate::auth::{Account, Role};
use crate::error::AuthError;

/// Login state for one user of the dashboard.
///
/// A session is created per client and handed to each dashboard operation.
#[derive(Debug, Default, Clone)]
pub struct Session {
    logged_in: bool,
    username: Option<String>,
    role: Option<Role>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticate(&mut self, account: &Account) {
        self.logged_in = true;
        self.username = Some(account.username.clone());
        self.role = Some(account.role);
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
        self.username = None;
        self.role = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.logged_in
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Guard for pages that need a logged-in user.
    ///
    /// Returns the username on success.
    pub fn require_login(&self) -> Result<&str, AuthError> {
        match (self.logged_in, self.username.as_deref()) {
            (true, Some(name)) => Ok(name),
            _ => Err(AuthError::Required),
        }
    }
}
