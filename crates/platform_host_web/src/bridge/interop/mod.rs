//! Shared transport interop for browser bridge calls.
//!
//! Routes calls to target-specific implementations while keeping one API for the bridge.

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn fetch_text(url: &str) -> Result<String, String> {
    imp::fetch_text(url).await
}
