//! JSON wire form of a record sequence.
//!
//! Each record serializes as a two-element array `[tag, payload]`. Built-in
//! tags use their numeric codes; `Named` records carry the type name string
//! in the tag slot. A sequence is a JSON array of records with the root at
//! position 0.
//!
//! Non-finite numbers cannot be represented in JSON and degrade to `null`
//! when printed. They survive unchanged while the sequence stays in memory.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value as Json};

use crate::error::{WireError, WireResult};
use crate::record::{DateStamp, NamedPayload, Primitive, Record, BUFFER_TYPE, VIEW_TYPE};
use crate::tag::codes;

/// An ordered, append-only sequence of records. Position 0 is the root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSeq(Vec<Record>);

impl RecordSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its index.
    pub fn push(&mut self, record: Record) -> usize {
        self.0.push(record);
        self.0.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    /// The JSON wire form of the whole sequence.
    pub fn to_json(&self) -> Json {
        Json::Array(self.0.iter().map(Record::to_wire).collect())
    }

    /// The wire form printed as compact JSON text.
    pub fn to_json_text(&self) -> WireResult<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    /// Parse a sequence from its JSON wire form.
    pub fn from_json(value: &Json) -> WireResult<Self> {
        let items = value.as_array().ok_or(WireError::NotASequence)?;
        let records = items.iter().map(Record::from_wire).collect::<WireResult<_>>()?;
        Ok(Self(records))
    }

    /// Parse a sequence from JSON text.
    pub fn from_json_text(text: &str) -> WireResult<Self> {
        Self::from_json(&serde_json::from_str(text)?)
    }
}

impl From<Vec<Record>> for RecordSeq {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl Serialize for RecordSeq {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordSeq {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        RecordSeq::from_json(&value).map_err(D::Error::custom)
    }
}

impl Record {
    /// The `[tag, payload]` wire form of this record.
    pub fn to_wire(&self) -> Json {
        let (tag, payload) = match self {
            Record::Void => (json!(codes::VOID), Json::Null),
            Record::Primitive(p) => (json!(codes::PRIMITIVE), p.to_wire()),
            Record::Array(items) => (json!(codes::ARRAY), json!(items)),
            Record::Object(pairs) => (json!(codes::OBJECT), pairs_to_wire(pairs)),
            Record::Date(stamp) => {
                let payload = match stamp {
                    DateStamp::Iso(text) => json!(text),
                    DateStamp::Millis(ms) => json!(ms),
                };
                (json!(codes::DATE), payload)
            }
            Record::Pattern { source, flags } => (
                json!(codes::PATTERN),
                json!({ "source": source, "flags": flags }),
            ),
            Record::Map(pairs) => (json!(codes::MAP), pairs_to_wire(pairs)),
            Record::Set(items) => (json!(codes::SET), json!(items)),
            Record::Exception { name, message } => (
                json!(codes::EXCEPTION),
                json!({ "name": name, "message": message }),
            ),
            Record::BigInt(digits) => (json!(codes::BIGINT), json!(digits)),
            Record::Named { name, payload } => (json!(name), payload.to_wire()),
        };
        Json::Array(vec![tag, payload])
    }

    /// Parse one record from its `[tag, payload]` wire form.
    pub fn from_wire(value: &Json) -> WireResult<Record> {
        let parts = match value.as_array() {
            Some(parts) if parts.len() == 2 => parts,
            _ => return Err(WireError::NotARecord),
        };
        let (tag, payload) = (&parts[0], &parts[1]);

        if let Some(name) = tag.as_str() {
            return named_from_wire(name, payload);
        }
        let code = tag.as_i64().ok_or(WireError::NotARecord)?;

        match code {
            codes::VOID => Ok(Record::Void),
            codes::PRIMITIVE => Ok(Record::Primitive(Primitive::from_wire(payload)?)),
            codes::ARRAY => Ok(Record::Array(index_list(payload, "Array")?)),
            codes::OBJECT => Ok(Record::Object(index_pairs(payload, "Object")?)),
            codes::DATE => match payload {
                Json::String(text) => Ok(Record::Date(DateStamp::Iso(text.clone()))),
                Json::Number(n) => {
                    let ms = n
                        .as_i64()
                        .or_else(|| n.as_f64().map(|f| f as i64))
                        .ok_or_else(|| shape("Date", "timestamp out of range"))?;
                    Ok(Record::Date(DateStamp::Millis(ms)))
                }
                _ => Err(shape("Date", "expected ISO text or epoch milliseconds")),
            },
            codes::PATTERN => {
                let source = field_str(payload, "source", "Pattern")?;
                let flags = field_str(payload, "flags", "Pattern")?;
                Ok(Record::Pattern { source, flags })
            }
            codes::MAP => Ok(Record::Map(index_pairs(payload, "Map")?)),
            codes::SET => Ok(Record::Set(index_list(payload, "Set")?)),
            codes::EXCEPTION => {
                let name = field_str(payload, "name", "Exception")?;
                let message = field_str(payload, "message", "Exception")?;
                Ok(Record::Exception { name, message })
            }
            codes::BIGINT => match payload.as_str() {
                Some(digits) => Ok(Record::BigInt(digits.to_owned())),
                None => Err(shape("BigInt", "expected digit text")),
            },
            other => Err(WireError::UnknownTag(other)),
        }
    }
}

impl Primitive {
    fn to_wire(&self) -> Json {
        match self {
            Primitive::Null => Json::Null,
            Primitive::Bool(b) => json!(b),
            // Non-finite numbers have no JSON form; they print as null.
            Primitive::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Primitive::String(s) => json!(s),
        }
    }

    fn from_wire(value: &Json) -> WireResult<Primitive> {
        match value {
            Json::Null => Ok(Primitive::Null),
            Json::Bool(b) => Ok(Primitive::Bool(*b)),
            Json::Number(n) => {
                let n = n
                    .as_f64()
                    .ok_or_else(|| shape("Primitive", "number out of f64 range"))?;
                Ok(Primitive::Number(n))
            }
            Json::String(s) => Ok(Primitive::String(s.clone())),
            _ => Err(shape("Primitive", "expected string, number, boolean, or null")),
        }
    }
}

impl NamedPayload {
    fn to_wire(&self) -> Json {
        match self {
            NamedPayload::Buffer(base64) => json!(base64),
            NamedPayload::View {
                buffer,
                byte_offset,
                byte_length,
            } => json!({
                "buffer": buffer,
                "byteOffset": byte_offset,
                "byteLength": byte_length,
            }),
            NamedPayload::Properties(pairs) => pairs_to_wire(pairs),
        }
    }
}

fn named_from_wire(name: &str, payload: &Json) -> WireResult<Record> {
    let payload = match name {
        BUFFER_TYPE => match payload.as_str() {
            Some(base64) => NamedPayload::Buffer(base64.to_owned()),
            None => return Err(shape("Named", "buffer payload must be base64 text")),
        },
        VIEW_TYPE => NamedPayload::View {
            buffer: field_str(payload, "buffer", "Named")?,
            byte_offset: field_usize(payload, "byteOffset", "Named")?,
            byte_length: field_usize(payload, "byteLength", "Named")?,
        },
        _ => NamedPayload::Properties(index_pairs(payload, "Named")?),
    };
    Ok(Record::Named {
        name: name.to_owned(),
        payload,
    })
}

fn pairs_to_wire(pairs: &[(usize, usize)]) -> Json {
    Json::Array(pairs.iter().map(|&(k, v)| json!([k, v])).collect())
}

fn index_list(payload: &Json, tag: &'static str) -> WireResult<Vec<usize>> {
    let items = payload
        .as_array()
        .ok_or_else(|| shape(tag, "expected an index list"))?;
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| shape(tag, "index is not a non-negative integer"))
        })
        .collect()
}

fn index_pairs(payload: &Json, tag: &'static str) -> WireResult<Vec<(usize, usize)>> {
    let items = payload
        .as_array()
        .ok_or_else(|| shape(tag, "expected a list of index pairs"))?;
    items
        .iter()
        .map(|item| {
            let pair = match item.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                _ => return Err(shape(tag, "entry is not a two-element pair")),
            };
            match (pair[0].as_u64(), pair[1].as_u64()) {
                (Some(k), Some(v)) => Ok((k as usize, v as usize)),
                _ => Err(shape(tag, "pair index is not a non-negative integer")),
            }
        })
        .collect()
}

fn field_str(payload: &Json, field: &str, tag: &'static str) -> WireResult<String> {
    payload
        .get(field)
        .and_then(Json::as_str)
        .map(str::to_owned)
        .ok_or_else(|| shape(tag, format!("missing string field '{field}'")))
}

fn field_usize(payload: &Json, field: &str, tag: &'static str) -> WireResult<usize> {
    payload
        .get(field)
        .and_then(Json::as_u64)
        .map(|n| n as usize)
        .ok_or_else(|| shape(tag, format!("missing integer field '{field}'")))
}

fn shape(tag: &'static str, detail: impl Into<String>) -> WireError {
    WireError::PayloadShape {
        tag,
        detail: detail.into(),
    }
}
