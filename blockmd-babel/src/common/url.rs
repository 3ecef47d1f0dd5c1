//! Tolerant percent-decoding and component encoding for link URLs.
//!
//! The platform stores link targets percent-encoded. Decoding happens once when
//! blocks are ingested and encoding once when they are emitted, so the block
//! model always holds the human-readable form.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is by URI component encoding.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-decode `value`, returning it unchanged if the result is not UTF-8.
pub fn safe_decode(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::debug!(error = %e, "URL is not valid UTF-8 once decoded, keeping raw value");
            value.to_string()
        }
    }
}

/// Encode `value` as a single URI component.
pub fn safe_encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
