//! Browser capability bridge used by `platform_host_web` service adapters.

mod interop;

pub async fn fetch_text(url: &str) -> Result<String, String> {
    interop::fetch_text(url).await
}
