//! Encoder: value graph → flat record sequence.
//!
//! Walks the graph with an explicit work stack (no unbounded recursion) and
//! an identity map keyed on cell pointers. Every distinct reference gets
//! exactly one record; re-encountering a reference yields its existing index,
//! which is what makes cycles and aliasing representable. Children are
//! visited in structural order, so encoding an unmodified graph twice
//! produces byte-identical sequences.

use std::collections::HashMap;
use std::rc::Rc;

use dson_binary::to_base64;
use dson_types::{
    cell, DateStamp, NamedPayload, Primitive, Record, RecordSeq, Value, ValueCell, BUFFER_TYPE,
    VIEW_TYPE,
};

/// Encode a value graph into a record sequence. The root is record 0.
///
/// Encoding is infallible: every value falls into a tag, and caller-defined
/// types go through the generic `Named` path.
pub fn encode(root: &ValueCell) -> RecordSeq {
    let mut encoder = Encoder::default();
    encoder.index_of(root);
    while let Some(index) = encoder.pending.pop() {
        let node = encoder.cells[index].clone();
        let record = encoder.record_for(&node);
        encoder.records[index] = record;
    }
    RecordSeq::from(encoder.records)
}

#[derive(Default)]
struct Encoder {
    /// Cell pointer → assigned record index.
    identity: HashMap<usize, usize>,
    records: Vec<Record>,
    /// Index → cell. Every keyed cell is held alive here for the whole
    /// encode; if one were dropped mid-run, a later allocation could reuse
    /// its address and collide with the stale `identity` entry.
    cells: Vec<ValueCell>,
    /// Reserved indices whose records still need to be built.
    pending: Vec<usize>,
}

impl Encoder {
    /// The record index for a node, reserving a new one on first sight.
    ///
    /// Identity is recorded before the node's children are walked, so a
    /// child that cycles back here resolves to this same index.
    fn index_of(&mut self, node: &ValueCell) -> usize {
        let key = Rc::as_ptr(node) as usize;
        if let Some(&index) = self.identity.get(&key) {
            return index;
        }
        let index = self.records.len();
        // Placeholder until the node is walked; the sequence is append-only
        // and no position is ever reused for a different reference.
        self.records.push(Record::Void);
        self.cells.push(node.clone());
        self.identity.insert(key, index);
        self.pending.push(index);
        index
    }

    fn record_for(&mut self, node: &ValueCell) -> Record {
        let value = node.borrow();
        match &*value {
            Value::Undefined => Record::Void,
            Value::Null => Record::Primitive(Primitive::Null),
            Value::Bool(b) => Record::Primitive(Primitive::Bool(*b)),
            Value::Number(n) => Record::Primitive(Primitive::Number(*n)),
            Value::String(s) => Record::Primitive(Primitive::String(s.clone())),
            Value::BigInt(digits) => Record::BigInt(digits.as_str().to_owned()),
            Value::Date(dt) => Record::Date(DateStamp::from_datetime(dt)),
            Value::Pattern { source, flags } => Record::Pattern {
                source: source.clone(),
                flags: flags.clone(),
            },
            Value::Exception { name, message } => Record::Exception {
                name: name.clone(),
                message: message.clone(),
            },
            Value::Bytes(bytes) => Record::Named {
                name: BUFFER_TYPE.to_owned(),
                payload: NamedPayload::Buffer(to_base64(bytes)),
            },
            Value::View {
                buffer,
                byte_offset,
                byte_length,
            } => Record::Named {
                name: VIEW_TYPE.to_owned(),
                payload: NamedPayload::View {
                    buffer: to_base64(buffer),
                    byte_offset: *byte_offset,
                    byte_length: *byte_length,
                },
            },
            Value::Array(items) => Record::Array(self.item_indices(items)),
            Value::Set(items) => Record::Set(self.item_indices(items)),
            Value::Object(entries) => Record::Object(self.pair_indices(entries)),
            Value::Map(entries) => Record::Map(self.pair_indices(entries)),
            Value::Custom(custom) => {
                let name = custom.type_name().to_owned();
                let pairs = custom
                    .properties()
                    .into_iter()
                    .map(|(key, value)| {
                        let key_index = self.index_of(&cell(Value::String(key)));
                        let value_index = self.index_of(&value);
                        (key_index, value_index)
                    })
                    .collect();
                Record::Named {
                    name,
                    payload: NamedPayload::Properties(pairs),
                }
            }
        }
    }

    fn item_indices(&mut self, items: &[ValueCell]) -> Vec<usize> {
        items.iter().map(|item| self.index_of(item)).collect()
    }

    fn pair_indices(&mut self, entries: &[(ValueCell, ValueCell)]) -> Vec<(usize, usize)> {
        entries
            .iter()
            .map(|(k, v)| (self.index_of(k), self.index_of(v)))
            .collect()
    }
}
