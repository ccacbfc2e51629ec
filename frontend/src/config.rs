//! Client-side configuration persisted in `localStorage`.

pub const API_BASE_URL: &str = "http://localhost:5000";

const API_BASE_URL_KEY: &str = "api_base_url";
const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";

/// String key/value storage. The browser build uses `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("could not persist `{}` to localStorage", key);
            }
        }
    }
}

pub fn api_base_url(store: &impl KeyValueStore) -> String {
    store
        .get(API_BASE_URL_KEY)
        .map(|raw| raw.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| API_BASE_URL.to_string())
}

pub fn load_sidebar_collapsed(store: &impl KeyValueStore) -> bool {
    store.get(SIDEBAR_COLLAPSED_KEY).as_deref() == Some("true")
}

pub fn save_sidebar_collapsed(store: &impl KeyValueStore, collapsed: bool) {
    store.set(
        SIDEBAR_COLLAPSED_KEY,
        if collapsed { "true" } else { "false" },
    );
}

#[cfg(test)]
pub(crate) mod memory {
    use super::KeyValueStore;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryStore(RefCell<HashMap<String, String>>);

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    #[test]
    fn sidebar_defaults_to_expanded() {
        let store = MemoryStore::default();
        assert!(!load_sidebar_collapsed(&store));
    }

    #[test]
    fn sidebar_state_survives_reload() {
        let store = MemoryStore::default();
        save_sidebar_collapsed(&store, true);
        assert!(load_sidebar_collapsed(&store));
        assert_eq!(store.get("sidebarCollapsed").as_deref(), Some("true"));

        save_sidebar_collapsed(&store, false);
        assert!(!load_sidebar_collapsed(&store));
    }

    #[test]
    fn unknown_sidebar_value_reads_as_expanded() {
        let store = MemoryStore::default();
        store.set("sidebarCollapsed", "yes");
        assert!(!load_sidebar_collapsed(&store));
    }

    #[test]
    fn api_base_url_override_is_normalised() {
        let store = MemoryStore::default();
        assert_eq!(api_base_url(&store), API_BASE_URL);

        store.set("api_base_url", " https://club.example.org/ ");
        assert_eq!(api_base_url(&store), "https://club.example.org");

        store.set("api_base_url", "   ");
        assert_eq!(api_base_url(&store), API_BASE_URL);
    }
}
