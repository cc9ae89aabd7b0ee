use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::IdentityProvider;
use dashmap::DashMap;

struct FakeAccount {
    id: UserId,
    password: String,
}

/// In-memory identity backend for the dev profile and tests. Passwords are
/// compared in plaintext; real hashing lives in the MySQL provider.
pub struct FakeIdentityProvider {
    accounts: DashMap<String, FakeAccount>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .accounts
            .get(username)
            .filter(|account| account.password == password)
            .map(|account| Identity {
                id: account.id,
                username: username.to_string(),
            }))
    }

    async fn create_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        use dashmap::mapref::entry::Entry;

        match self.accounts.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateUsername),
            Entry::Vacant(slot) => {
                let id = get_fake_id(username);
                slot.insert(FakeAccount {
                    id,
                    password: password.to_string(),
                });
                Ok(Identity {
                    id,
                    username: username.to_string(),
                })
            }
        }
    }
}

fn get_fake_id(username: &str) -> UserId {
    UserId(uuid::Uuid::new_v5(
        &uuid::Uuid::NAMESPACE_OID,
        username.as_bytes(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn authenticate_checks_password_without_leaking_which_field_failed() {
        let provider = FakeIdentityProvider::new();
        provider.create_account("alice", "pw").await.unwrap();

        assert!(provider.authenticate("alice", "pw").await.unwrap().is_some());
        assert!(provider.authenticate("alice", "nope").await.unwrap().is_none());
        assert!(provider.authenticate("bob", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let provider = FakeIdentityProvider::new();
        provider.create_account("alice", "pw").await.unwrap();

        let err = provider.create_account("alice", "other").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
        assert_eq!(
            err.to_string(),
            "A user with that username already exists."
        );
    }
}
