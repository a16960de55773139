//! Core types for DSON, a structural object-graph serializer.
//!
//! Defines the closed type-tag vocabulary, the flat `Record` encoding unit,
//! the JSON wire form of a record sequence, and the in-memory `Value` graph
//! that the encoder and decoder operate on.
//!
//! # Key Types
//!
//! - [`TypeTag`] / [`Record`] -- The closed tag set and the per-reference encoding unit
//! - [`RecordSeq`] -- An ordered, JSON-representable record sequence (position 0 is the root)
//! - [`Value`] / [`ValueCell`] -- The shared, possibly cyclic value graph
//! - [`Reconstructible`] -- Capability trait for caller-defined types that survive a round trip
//! - [`deep_equal`] -- Cycle-aware structural equality

pub mod bigint;
pub mod equals;
pub mod error;
pub mod reconstruct;
pub mod record;
pub mod tag;
pub mod value;
pub mod wire;

pub use bigint::BigIntDigits;
pub use equals::deep_equal;
pub use error::{WireError, WireResult};
pub use reconstruct::{Factory, Reconstructible};
pub use record::{DateStamp, NamedPayload, Primitive, Record, BUFFER_TYPE, VIEW_TYPE};
pub use tag::TypeTag;
pub use value::{cell, Value, ValueCell};
pub use wire::RecordSeq;
