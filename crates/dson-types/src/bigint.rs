use std::fmt;

use crate::error::{WireError, WireResult};

/// Arbitrary-precision integer carried as decimal digit text.
///
/// The engine never does arithmetic on these values; it only guarantees the
/// digit text survives a round trip unchanged. Validation accepts an optional
/// leading `-` followed by one or more ASCII digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigIntDigits(String);

impl BigIntDigits {
    /// Validate and wrap decimal digit text.
    pub fn new(text: impl Into<String>) -> WireResult<Self> {
        let text = text.into();
        let digits = text.strip_prefix('-').unwrap_or(&text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WireError::InvalidBigInt(text));
        }
        Ok(Self(text))
    }

    /// The raw digit text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BigIntDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for BigIntDigits {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i128> for BigIntDigits {
    fn from(value: i128) -> Self {
        Self(value.to_string())
    }
}
