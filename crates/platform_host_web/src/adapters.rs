//! Host-strategy selection and concrete adapter factories for runtime wiring.

use std::rc::Rc;

use platform_host::{HostServices, HostStrategy};

use crate::{WebKeyValueStore, WebSeedSource};

/// Returns the host strategy for the active build target.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(target_arch = "wasm32")]
    {
        HostStrategy::Browser
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        HostStrategy::Memory
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Builds the browser key-value store.
pub fn key_value_store() -> WebKeyValueStore {
    WebKeyValueStore
}

/// Builds a seed source reading from the given site URLs.
pub fn seed_source(manifest_url: &str, version_url: &str) -> WebSeedSource {
    WebSeedSource::new(manifest_url, version_url)
}

/// Assembles the host bundle for the active target.
///
/// Browser builds persist to `localStorage` and fetch the seed from the site. Other targets get
/// an in-memory store with the same fetch-backed seed source, which reports itself unavailable.
pub fn build_host_services(manifest_url: &str, version_url: &str) -> HostServices {
    let seed = Rc::new(seed_source(manifest_url, version_url));
    match selected_host_strategy() {
        HostStrategy::Browser => HostServices {
            storage: Rc::new(key_value_store()),
            seed,
            host_strategy: HostStrategy::Browser,
        },
        HostStrategy::Memory => HostServices::in_memory(seed),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn non_wasm_build_selects_memory_strategy() {
        assert_eq!(selected_host_strategy(), HostStrategy::Memory);
        assert_eq!(host_strategy_name(), "memory");
        let services = build_host_services("/m.json", "/v.json");
        assert_eq!(services.host_strategy, HostStrategy::Memory);
        services.storage.save_raw("k", "v").expect("save");
        assert_eq!(
            services.storage.load_raw("k").expect("load"),
            Some("v".to_string())
        );
    }
}
