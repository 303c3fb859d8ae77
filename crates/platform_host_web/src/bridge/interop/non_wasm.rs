fn unsupported(op: &str) -> String {
    format!("{op} is only available when compiled for wasm32")
}

pub async fn fetch_text(_url: &str) -> Result<String, String> {
    Err(unsupported("fetch"))
}
