use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use tracing::warn;

/// Look up an encoding by label (`utf-8`, `latin1`, `shift_jis`, ...)
pub fn resolve(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decode bytes into text. A byte order mark overrides `encoding`.
/// Malformed sequences become U+FFFD and are reported once.
pub fn decode<'a>(bytes: &'a [u8], encoding: &'static Encoding, origin: &str) -> Cow<'a, str> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            "{} contains byte sequences that are not valid {}",
            origin,
            used.name()
        );
    }
    text
}

/// Encode text for output. Characters the encoding cannot represent are
/// written as numeric character references. UTF-16 is written without a
/// byte order mark.
pub fn encode<'a>(text: &'a str, encoding: &'static Encoding) -> Cow<'a, [u8]> {
    if encoding == UTF_16LE {
        return Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }
    let (bytes, used, had_unmappable) = encoding.encode(text);
    if had_unmappable {
        warn!("output contains characters not representable in {}", used.name());
    }
    bytes
}
