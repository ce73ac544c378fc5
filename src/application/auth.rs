//! Login against the credential store.

use tracing::{info, warn};

use crate::domain::permission::{Permission, Role, ADMIN_ROLE};
use crate::domain::session::Session;
use crate::error::{Error, Result};
use crate::port::outbound::credential::{CredentialStore, NewAccount};

/// Username of the account seeded into an empty credential store.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Password of the seeded account. Stored and compared in plaintext.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Authenticates users and produces sessions.
pub struct Authenticator<S> {
    store: S,
}

impl<S: CredentialStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Check `username` and `password` and build a session.
    ///
    /// Ensures the credential table exists and seeds the default admin
    /// account when no `admin` row is present.
    ///
    /// # Errors
    /// - [`Error::InvalidCredentials`] if no account matches both fields
    /// - [`crate::domain::error::DomainError::UnknownPermission`] if the
    ///   matched account carries an unrecognized permission string
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        self.store.ensure_schema()?;
        self.seed_default_admin()?;

        let Some(grant) = self.store.find_grant(username, password)? else {
            info!(username, "login rejected");
            return Err(Error::InvalidCredentials);
        };

        let permission: Permission = grant.permission.parse()?;
        if username == DEFAULT_ADMIN_USERNAME && password == DEFAULT_ADMIN_PASSWORD {
            warn!("logged in with the default admin password; change it in the credential store");
        }

        info!(username, role = %grant.role, %permission, "login accepted");
        Ok(Session::new(username, Role::from(grant.role), permission))
    }

    fn seed_default_admin(&mut self) -> Result<()> {
        if self.store.user_exists(DEFAULT_ADMIN_USERNAME)? {
            return Ok(());
        }
        self.store.insert_account(&NewAccount {
            username: DEFAULT_ADMIN_USERNAME,
            password: DEFAULT_ADMIN_PASSWORD,
            role: ADMIN_ROLE,
            permission: Permission::FullWrite.as_str(),
        })?;
        info!("seeded default admin account");
        Ok(())
    }

    /// Give the store back, e.g. to inspect it in tests.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::error::DomainError;
    use crate::port::outbound::credential::Grant;

    /// In-memory store keyed by username.
    #[derive(Default)]
    struct MemoryStore {
        schema_calls: usize,
        accounts: HashMap<String, (String, Grant)>,
    }

    impl MemoryStore {
        fn with(mut self, username: &str, password: &str, role: &str, permission: &str) -> Self {
            self.accounts.insert(
                username.to_string(),
                (
                    password.to_string(),
                    Grant {
                        role: role.to_string(),
                        permission: permission.to_string(),
                    },
                ),
            );
            self
        }
    }

    impl CredentialStore for MemoryStore {
        fn ensure_schema(&mut self) -> Result<()> {
            self.schema_calls += 1;
            Ok(())
        }

        fn user_exists(&mut self, username: &str) -> Result<bool> {
            Ok(self.accounts.contains_key(username))
        }

        fn insert_account(&mut self, account: &NewAccount<'_>) -> Result<()> {
            self.accounts.insert(
                account.username.to_string(),
                (
                    account.password.to_string(),
                    Grant {
                        role: account.role.to_string(),
                        permission: account.permission.to_string(),
                    },
                ),
            );
            Ok(())
        }

        fn find_grant(&mut self, username: &str, password: &str) -> Result<Option<Grant>> {
            Ok(self
                .accounts
                .get(username)
                .filter(|(stored, _)| stored == password)
                .map(|(_, grant)| grant.clone()))
        }
    }

    #[test]
    fn first_login_seeds_default_admin() {
        let mut auth = Authenticator::new(MemoryStore::default());
        let session = auth.login("admin", "admin123").unwrap();

        assert_eq!(session.username(), "admin");
        assert!(session.role().is_admin());
        assert_eq!(session.permission(), Permission::FullWrite);
        assert_eq!(auth.into_store().schema_calls, 1);
    }

    #[test]
    fn existing_admin_is_not_reseeded() {
        let store = MemoryStore::default().with("admin", "changed", "admin", "Full write");
        let mut auth = Authenticator::new(store);

        assert!(matches!(
            auth.login("admin", "admin123"),
            Err(Error::InvalidCredentials)
        ));
        assert!(auth.login("admin", "changed").is_ok());
    }

    #[test]
    fn wrong_password_is_invalid() {
        let store = MemoryStore::default().with("kim", "pw", "clerk", "Write");
        let mut auth = Authenticator::new(store);
        assert!(matches!(auth.login("kim", "nope"), Err(Error::InvalidCredentials)));
    }

    #[test]
    fn unknown_user_is_invalid() {
        let mut auth = Authenticator::new(MemoryStore::default());
        assert!(matches!(auth.login("ghost", ""), Err(Error::InvalidCredentials)));
    }

    #[test]
    fn session_carries_stored_role_and_permission() {
        let store = MemoryStore::default().with("kim", "pw", "clerk", "Read-only");
        let mut auth = Authenticator::new(store);
        let session = auth.login("kim", "pw").unwrap();

        assert_eq!(session.role(), &Role::Other("clerk".into()));
        assert_eq!(session.permission(), Permission::ReadOnly);
    }

    #[test]
    fn unrecognized_permission_never_yields_session() {
        let store = MemoryStore::default().with("kim", "pw", "clerk", "Superuser");
        let mut auth = Authenticator::new(store);
        assert!(matches!(
            auth.login("kim", "pw"),
            Err(Error::Domain(DomainError::UnknownPermission(_)))
        ));
    }
}
