//! Hex escape hatch for binary payloads.
//!
//! Some producers emit hex instead of base64 for debuggability. Hex text is
//! carried with a `hex:` marker prefix so the base64 decoder can detect it
//! and route here.

/// Marker prefix identifying hex-encoded binary text.
pub const HEX_PREFIX: &str = "hex:";

/// Encode bytes as prefixed hex text. The empty buffer encodes to `"hex:"`.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

/// Decode unprefixed hex text into bytes, accepting any letter case.
///
/// Malformed input degrades to an empty buffer with a logged warning;
/// decoding never fails.
pub fn from_hex(text: &str) -> Vec<u8> {
    match hex::decode(text) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%err, "malformed hex input, substituting empty buffer");
            Vec::new()
        }
    }
}
