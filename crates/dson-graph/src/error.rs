use dson_types::WireError;
use thiserror::Error;

/// Result alias for decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Hard decode failures. Everything else degrades per-node into a
/// [`DecodeIssue`] so one bad record cannot take down the whole graph.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A `Named` record whose type name has no registered factory.
    /// Fabricating a wrong type silently would be worse than failing loudly.
    #[error("no factory registered for type '{0}'")]
    UnknownType(String),

    /// The record sequence has no root record.
    #[error("record sequence is empty")]
    EmptySequence,

    /// The wire form itself could not be read.
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// A non-fatal anomaly found while decoding one record.
///
/// The offending node degrades to `Undefined`; siblings decode normally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeIssue {
    /// A record referenced an index at or past the end of the sequence.
    #[error("record {at} references index {reference}, past the end of the sequence")]
    IndexOutOfRange { at: usize, reference: usize },

    /// A date payload that parses as neither ISO text nor epoch milliseconds.
    #[error("record {at} carries a malformed date stamp")]
    MalformedDate { at: usize },

    /// Big integer text that is not optionally-signed decimal digits.
    #[error("record {at} carries malformed big integer digits")]
    MalformedBigInt { at: usize },

    /// A caller-defined type property whose key record is not a string.
    #[error("record {at} has a non-string property key (record {key})")]
    NonStringKey { at: usize, key: usize },
}
