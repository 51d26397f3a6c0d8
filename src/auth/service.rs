use super::{Account, DynAccountStore, Role, hash_password, verify_password};
use crate::error::{AuthError, PlatformError, StoreError};
use crate::validation::{validate_password, validate_username};
use std::sync::LazyLock;

// Verified against when the username is unknown, so a miss costs about as
// much as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dummy-password-for-timing").ok());

/// Registration and login on top of an [`AccountStore`](super::AccountStore).
#[derive(Clone)]
pub struct Authenticator {
    store: DynAccountStore,
}

impl Authenticator {
    pub fn new(store: DynAccountStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DynAccountStore {
        &self.store
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`](crate::error::ValidationError) when the username
    ///   or password is malformed.
    /// - [`AuthError::DuplicateAccount`] when the username is taken.
    /// - [`StoreError::Unavailable`] when the store cannot be reached.
    ///
    /// The store is left untouched on every error path.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, PlatformError> {
        validate_username(username)?;
        validate_password(password)?;

        if self.store.exists(username).await? {
            tracing::info!("Registration rejected: username taken");
            return Err(AuthError::DuplicateAccount(username.to_string()).into());
        }

        let hash = hash_password(password).map_err(|e| PlatformError::Hashing(e.to_string()))?;
        let account = Account::new(username, hash, role);
        match self.store.insert(&account).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration.
            Err(StoreError::Conflict(_)) => {
                return Err(AuthError::DuplicateAccount(username.to_string()).into());
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(role = %account.role, "User registered");
        Ok(account)
    }

    /// Verify a username/password pair.
    ///
    /// Unknown users and wrong passwords both produce
    /// [`AuthError::InvalidCredentials`].
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, PlatformError> {
        let Some(account) = self.store.find_by_username(username).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            let err = AuthError::InvalidCredentials(username.to_string());
            tracing::info!(error = %err, "Authentication failed");
            return Err(err.into());
        };

        if verify_password(password, &account.password_hash) {
            tracing::info!("Authentication succeeded");
            Ok(account)
        } else {
            let err = AuthError::InvalidCredentials(username.to_string());
            tracing::info!(error = %err, "Authentication failed");
            Err(err.into())
        }
    }
}
