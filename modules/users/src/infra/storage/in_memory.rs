//! In-memory credential store.
//!
//! Ids are assigned from a sequence starting at 1 and never reused. Username
//! uniqueness is case-sensitive. The lock is never held across an `.await`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use auth_sdk::{Credential, NewCredential, UserId, UserLookup, UserLookupError};
use parking_lot::RwLock;
use parkapi_security::Role;

#[derive(Debug)]
struct State {
    rows: BTreeMap<UserId, Credential>,
    next_id: UserId,
}

#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            state: RwLock::new(State {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn username_taken(state: &State, username: &str, except: Option<UserId>) -> bool {
    state
        .rows
        .values()
        .any(|c| c.username == username && Some(c.id) != except)
}

#[async_trait]
impl UserLookup for InMemoryUserRepository {
    async fn find_role_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Role>, UserLookupError> {
        Ok(self
            .state
            .read()
            .rows
            .values()
            .find(|c| c.username == username)
            .map(|c| c.role))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, UserLookupError> {
        Ok(self
            .state
            .read()
            .rows
            .values()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Credential>, UserLookupError> {
        Ok(self.state.read().rows.get(&id).cloned())
    }

    async fn create(&self, credential: NewCredential) -> Result<Credential, UserLookupError> {
        let mut state = self.state.write();
        if username_taken(&state, &credential.username, None) {
            return Err(UserLookupError::DuplicateUsername(credential.username));
        }

        let id = state.next_id;
        state.next_id += 1;
        let stored = Credential {
            id,
            username: credential.username,
            password_hash: credential.password_hash,
            role: credential.role,
        };
        state.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, credential: Credential) -> Result<Credential, UserLookupError> {
        let mut state = self.state.write();
        if !state.rows.contains_key(&credential.id) {
            return Err(UserLookupError::NotFound(credential.id));
        }
        if username_taken(&state, &credential.username, Some(credential.id)) {
            return Err(UserLookupError::DuplicateUsername(credential.username));
        }

        state.rows.insert(credential.id, credential.clone());
        Ok(credential)
    }

    async fn list(&self) -> Result<Vec<Credential>, UserLookupError> {
        Ok(self.state.read().rows.values().cloned().collect())
    }
}
