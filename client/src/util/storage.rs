//! `localStorage` binding for the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session controller persists its token and account kind through the
//! core `Storage` trait; this is the browser implementation. Outside the
//! browser every read misses and writes are dropped.

use portal::Storage;

/// The window's `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "csr")]
        {
            let written = local_storage().is_some_and(|storage| storage.set_item(key, value).is_ok());
            if !written {
                log::warn!("storage: failed to write {key}");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                if storage.remove_item(key).is_err() {
                    log::warn!("storage: failed to remove {key}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
        }
    }
}
