use std::sync::OnceLock;

use crate::hex_escape::{from_hex, HEX_PREFIX};

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Reverse lookup from base64 character to 6-bit value. Built once; the
/// alphabet is fixed. Unknown characters map to -1.
fn lookup() -> &'static [i8; 256] {
    static TABLE: OnceLock<[i8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [-1i8; 256];
        for (i, &ch) in ALPHABET.iter().enumerate() {
            table[ch as usize] = i as i8;
        }
        table
    })
}

/// Encode bytes as base64 text.
///
/// Processes 3 bytes into four 6-bit groups, padding the final group with
/// `=` when the input length is not a multiple of 3. Empty input yields an
/// empty string, never padding-only output.
pub fn to_base64(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        out.push(ALPHABET[(b0 >> 2) as usize] as char);
        out.push(ALPHABET[(((b0 & 0x03) << 4) | (b1 >> 4)) as usize] as char);
        out.push(if chunk.len() > 1 {
            ALPHABET[(((b1 & 0x0f) << 2) | (b2 >> 6)) as usize] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            ALPHABET[(b2 & 0x3f) as usize] as char
        } else {
            '='
        });
    }
    out
}

/// Decode base64 text (or `hex:`-prefixed hex text) back into bytes.
///
/// Unknown characters decode as value 0 with a logged warning; this function
/// never fails. A single corrupt buffer degrades locally instead of aborting
/// the surrounding graph decode.
pub fn from_base64(text: &str) -> Vec<u8> {
    if let Some(hex_text) = text.strip_prefix(HEX_PREFIX) {
        return from_hex(hex_text);
    }

    let input = text.trim_end_matches('=').as_bytes();
    if input.is_empty() {
        return Vec::new();
    }

    let table = lookup();
    let mut bad_chars = 0usize;
    let mut value_at = |i: usize| -> u8 {
        match input.get(i) {
            Some(&ch) => {
                let v = table[ch as usize];
                if v < 0 {
                    bad_chars += 1;
                    0
                } else {
                    v as u8
                }
            }
            None => 0,
        }
    };

    let mut out = Vec::with_capacity(input.len() * 3 / 4);
    let mut i = 0;
    while i < input.len() {
        let c0 = value_at(i);
        let c1 = value_at(i + 1);
        let c2 = value_at(i + 2);
        let c3 = value_at(i + 3);

        out.push((c0 << 2) | (c1 >> 4));
        if i + 2 < input.len() {
            out.push((c1 << 4) | (c2 >> 2));
        }
        if i + 3 < input.len() {
            out.push((c2 << 6) | c3);
        }
        i += 4;
    }

    if bad_chars > 0 {
        tracing::warn!(bad_chars, "base64 input contained characters outside the alphabet");
    }
    out
}
