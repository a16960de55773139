use thiserror::Error;

/// Result alias for wire-format operations.
pub type WireResult<T> = std::result::Result<T, WireError>;

/// Errors raised while reading or writing the JSON wire form.
#[derive(Debug, Error)]
pub enum WireError {
    /// A record is not a two-element `[tag, payload]` array.
    #[error("record is not a two-element [tag, payload] array")]
    NotARecord,

    /// The record sequence itself is not a JSON array.
    #[error("record sequence is not a JSON array")]
    NotASequence,

    /// A numeric tag outside the closed tag set.
    #[error("unknown numeric type tag {0}")]
    UnknownTag(i64),

    /// A payload whose shape does not match its tag.
    #[error("{tag} payload has the wrong shape: {detail}")]
    PayloadShape {
        tag: &'static str,
        detail: String,
    },

    /// Big integer text that is not optionally-signed decimal digits.
    #[error("invalid big integer digits: {0:?}")]
    InvalidBigInt(String),

    /// Underlying JSON parse or print failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
