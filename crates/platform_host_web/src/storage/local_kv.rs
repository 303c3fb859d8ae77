//! `localStorage`-backed key-value store implementation.
//!
//! `localStorage` is synchronous, which matches the write-through contract of
//! [`platform_host::KeyValueStore`] directly.

use platform_host::KeyValueStore;

#[derive(Debug, Clone, Copy, Default)]
/// Browser key-value store backed by `window.localStorage`.
pub struct WebKeyValueStore;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl KeyValueStore for WebKeyValueStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, raw)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw);
            Ok(())
        }
    }

    fn delete_raw(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn non_wasm_store_behaves_like_empty_sink() {
        let store = WebKeyValueStore;
        store.save_raw("k", "v").expect("save");
        assert_eq!(store.load_raw("k").expect("load"), None);
        store.delete_raw("k").expect("delete");
    }
}
