use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

pub async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("fetch {url} failed: {e:?}"))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| format!("fetch {url} returned a non-Response value"))?;
    if !response.ok() {
        return Err(format!("fetch {url} failed with status {}", response.status()));
    }
    let text = response
        .text()
        .map_err(|e| format!("read body of {url} failed: {e:?}"))?;
    JsFuture::from(text)
        .await
        .map_err(|e| format!("read body of {url} failed: {e:?}"))?
        .as_string()
        .ok_or_else(|| format!("body of {url} was not text"))
}
