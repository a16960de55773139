//! Graph engine for DSON.
//!
//! Walks arbitrary value graphs (cycles, aliasing, binary buffers, and
//! caller-defined types included) into flat record sequences, and
//! reconstructs equivalent graphs from them with identity preserved.
//!
//! # Key Operations
//!
//! - [`encode`] -- value graph → [`dson_types::RecordSeq`] (one record per distinct reference)
//! - [`decode`] -- record sequence + [`TypeResolver`] → value graph
//! - [`clone_value`] -- deep copy by encode-then-decode, with a pre-scan that
//!   discovers caller-defined types so they survive the trip

pub mod clone;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod resolver;

pub use clone::clone_value;
pub use decoder::{decode, Decoded};
pub use encoder::encode;
pub use error::{DecodeError, DecodeIssue, DecodeResult};
pub use resolver::TypeResolver;
