//! Product photos are stored inline as `data:` URLs.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Encodes raw file bytes as `data:<mime>;base64,<payload>`.
#[must_use]
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    let mime = if mime.trim().is_empty() {
        "application/octet-stream"
    } else {
        mime.trim()
    };
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Splits a base64 `data:` URL into its MIME type and decoded bytes.
/// Returns `None` for anything that is not a well-formed base64 data URL.
#[must_use]
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}
