//! Persisted session layout.
//!
//! Exactly two string entries survive a reload: `token` and `userType`.
//! Backends are synchronous and infallible from the caller's view; a backend
//! that cannot write logs the failure itself.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::UserKind;

pub const TOKEN_KEY: &str = "token";
pub const USER_TYPE_KEY: &str = "userType";

/// Synchronous string key/value store (browser `localStorage`, a JSON file, memory).
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// What a previous session left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Persisted {
    /// Nothing stored (or only one of the two keys).
    Empty,
    /// A token with a recognized kind.
    Session { token: String, kind: UserKind },
    /// Both keys present but the kind is unrecognized.
    Corrupt,
}

/// Read the persisted token and kind.
pub fn load<S: Storage + ?Sized>(storage: &S) -> Persisted {
    let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
    let kind = storage.get(USER_TYPE_KEY).filter(|k| !k.is_empty());
    match (token, kind) {
        (Some(token), Some(kind)) => match kind.parse::<UserKind>() {
            Ok(kind) => Persisted::Session { token, kind },
            Err(_) => Persisted::Corrupt,
        },
        _ => Persisted::Empty,
    }
}

pub fn save<S: Storage + ?Sized>(storage: &S, token: &str, kind: UserKind) {
    storage.set(TOKEN_KEY, token);
    storage.set(USER_TYPE_KEY, kind.as_str());
}

pub fn clear<S: Storage + ?Sized>(storage: &S) {
    storage.remove(TOKEN_KEY);
    storage.remove(USER_TYPE_KEY);
}

/// In-memory storage. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored entry.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
