//! Encoding used by template slots and literal text.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left untouched by [`encode_url`]: the unreserved set plus the
/// path and scheme separators.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/')
    .remove(b':');

/// Replace HTML-significant characters with entities.
///
/// Replacements run in a fixed order with `&` first, so entities inserted by
/// later steps are never escaped again. The function is not idempotent:
/// `&amp;` becomes `&amp;amp;`.
pub fn encode_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{2014}', "&mdash;")
}

/// Percent-encode a string for use in a URL, leaving `/` and `:` intact.
/// Non-ASCII input is encoded as its UTF-8 bytes.
pub fn encode_url(text: &str) -> String {
    utf8_percent_encode(text, URL_SAFE).to_string()
}
