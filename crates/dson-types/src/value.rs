use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::bigint::BigIntDigits;
use crate::reconstruct::Reconstructible;

/// A shared, mutable node in a value graph.
///
/// Identity is cell identity: two `ValueCell`s alias the same node exactly
/// when they point at the same allocation (`Rc::ptr_eq`). This is what the
/// encoder's identity map and the round-trip aliasing guarantees key on.
pub type ValueCell = Rc<RefCell<Value>>;

/// Allocate a fresh cell for a value.
pub fn cell(value: Value) -> ValueCell {
    Rc::new(RefCell::new(value))
}

/// An in-memory value: one node of a possibly cyclic object graph.
///
/// Container variants hold child cells, so aliasing and cycles are expressed
/// directly. `Custom` holds a caller-defined type behind the
/// [`Reconstructible`] capability.
#[derive(Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    BigInt(BigIntDigits),
    Date(DateTime<Utc>),
    Pattern { source: String, flags: String },
    Exception { name: String, message: String },
    /// A raw binary buffer.
    Bytes(Vec<u8>),
    /// A view window over a binary buffer; `buffer` is the full underlying buffer.
    View {
        buffer: Vec<u8>,
        byte_offset: usize,
        byte_length: usize,
    },
    Array(Vec<ValueCell>),
    /// Ordered `(key, value)` entries. Keys are cells, so non-string keys work.
    Object(Vec<(ValueCell, ValueCell)>),
    Map(Vec<(ValueCell, ValueCell)>),
    Set(Vec<ValueCell>),
    Custom(Box<dyn Reconstructible>),
}

impl Value {
    /// Build a string value.
    pub fn string(text: impl Into<String>) -> Value {
        Value::String(text.into())
    }

    /// Build an object from string-keyed entries.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ValueCell)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (cell(Value::String(k.into())), v))
                .collect(),
        )
    }

    /// Whether this value is a reference type (has identity worth preserving).
    ///
    /// Primitives and big integers compare by value; everything else is a
    /// distinct graph node.
    pub fn is_reference(&self) -> bool {
        !matches!(
            self,
            Value::Undefined
                | Value::Null
                | Value::Bool(_)
                | Value::Number(_)
                | Value::String(_)
                | Value::BigInt(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_have_identity() {
        let a = cell(Value::Null);
        let b = cell(Value::Null);
        assert!(Rc::ptr_eq(&a, &a.clone()));
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn reference_classification() {
        assert!(!Value::Undefined.is_reference());
        assert!(!Value::Number(1.0).is_reference());
        assert!(!Value::BigInt(BigIntDigits::from(1i64)).is_reference());
        assert!(Value::Array(vec![]).is_reference());
        assert!(Value::Date(Utc::now()).is_reference());
        assert!(Value::Bytes(vec![]).is_reference());
    }

    #[test]
    fn object_helper_wraps_keys() {
        let obj = Value::object([("a", cell(Value::Number(1.0)))]);
        match obj {
            Value::Object(entries) => {
                assert_eq!(entries.len(), 1);
                assert!(matches!(&*entries[0].0.borrow(), Value::String(s) if s == "a"));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }
}
