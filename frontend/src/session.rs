use std::cell::RefCell;

use crate::models::{Session, User};
use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "currentUser";

/// Holds the active session in memory and mirrors it to storage.
pub struct SessionStore<S: KeyValueStore> {
    storage: S,
    current: RefCell<Option<Session>>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: RefCell::new(None),
        }
    }

    pub fn save(&self, session: Session) {
        self.storage.set(TOKEN_KEY, &session.token);
        match serde_json::to_string(&session.user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(err) => log::warn!("could not serialize current user: {}", err),
        }
        *self.current.borrow_mut() = Some(session);
    }

    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        *self.current.borrow_mut() = None;
    }

    /// Loads a previously saved session. It is trusted as-is until the
    /// backend rejects it with a 401.
    pub fn restore(&self) -> Option<Session> {
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let raw_user = self.storage.get(USER_KEY)?;
        let user = serde_json::from_str::<User>(&raw_user).ok()?;
        let session = Session { token, user };
        *self.current.borrow_mut() = Some(session.clone());
        Some(session)
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }
}
