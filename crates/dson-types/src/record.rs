use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::tag::TypeTag;

/// Wire type name for a raw binary buffer.
pub const BUFFER_TYPE: &str = "ArrayBuffer";

/// Wire type name for a binary view over a buffer.
pub const VIEW_TYPE: &str = "DataView";

/// An inline primitive: the only payloads carried by value, not by index.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// A date payload, either ISO-8601 text or epoch milliseconds.
///
/// The encoder always writes ISO text; numeric stamps are accepted on decode
/// for producers that emit epoch milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub enum DateStamp {
    Iso(String),
    Millis(i64),
}

impl DateStamp {
    /// ISO millisecond stamp for a timestamp (`2023-01-01T00:00:00.000Z` shape).
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        DateStamp::Iso(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parse back into a timestamp. `None` if the stamp is malformed.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            DateStamp::Iso(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DateStamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        }
    }
}

/// Payload of a [`Record::Named`] record.
#[derive(Clone, Debug, PartialEq)]
pub enum NamedPayload {
    /// Raw buffer bytes as base64 text (see `dson-binary`).
    Buffer(String),
    /// A view window over a buffer; `buffer` is the full underlying buffer.
    View {
        buffer: String,
        byte_offset: usize,
        byte_length: usize,
    },
    /// Caller-defined type state: `(key, value)` record index pairs.
    Properties(Vec<(usize, usize)>),
}

/// The `(tag, payload)` encoding unit for one distinct input reference.
///
/// All nested references are record indices into the owning sequence; only
/// primitives and per-tag scalar details are carried inline.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Void,
    Primitive(Primitive),
    Array(Vec<usize>),
    Object(Vec<(usize, usize)>),
    Date(DateStamp),
    Pattern { source: String, flags: String },
    Map(Vec<(usize, usize)>),
    Set(Vec<usize>),
    Exception { name: String, message: String },
    BigInt(String),
    Named { name: String, payload: NamedPayload },
}

impl Record {
    /// The tag this record carries.
    pub fn tag(&self) -> TypeTag {
        match self {
            Record::Void => TypeTag::Void,
            Record::Primitive(_) => TypeTag::Primitive,
            Record::Array(_) => TypeTag::Array,
            Record::Object(_) => TypeTag::Object,
            Record::Date(_) => TypeTag::Date,
            Record::Pattern { .. } => TypeTag::Pattern,
            Record::Map(_) => TypeTag::Map,
            Record::Set(_) => TypeTag::Set,
            Record::Exception { .. } => TypeTag::Exception,
            Record::BigInt(_) => TypeTag::BigInt,
            Record::Named { .. } => TypeTag::Named,
        }
    }

    /// Every record index referenced by this record, in payload order.
    pub fn references(&self) -> Vec<usize> {
        match self {
            Record::Array(items) | Record::Set(items) => items.clone(),
            Record::Object(pairs)
            | Record::Map(pairs)
            | Record::Named {
                payload: NamedPayload::Properties(pairs),
                ..
            } => pairs.iter().flat_map(|&(k, v)| [k, v]).collect(),
            _ => Vec::new(),
        }
    }
}
