//! Binary codec for DSON.
//!
//! Converts binary buffers to and from the base64 text carried inside
//! `Named` records. A `hex:`-prefixed text form exists as an escape hatch
//! for producers that emit hex for debuggability; [`from_base64`] detects
//! the prefix and routes to the hex decoder transparently.
//!
//! Decoding is deliberately lenient: one bad buffer must never take down the
//! reconstruction of an otherwise-valid graph, so malformed input degrades
//! to best-effort bytes (or an empty buffer) with a logged warning instead
//! of an error.

pub mod base64;
pub mod hex_escape;

pub use base64::{from_base64, to_base64};
pub use hex_escape::{from_hex, to_hex, HEX_PREFIX};
