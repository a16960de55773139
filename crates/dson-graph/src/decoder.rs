//! Decoder: record sequence + type resolver → value graph.
//!
//! Single-pass, work-stack driven reconstruction. Container cells go into
//! the decoded-value table *before* their children are resolved, so forward,
//! backward, and self references all bind to the same cell instead of
//! recursing forever or duplicating nodes.
//!
//! Failure policy: a malformed payload degrades its own node to `Undefined`
//! and records a [`DecodeIssue`]; only a `Named` record with no registered
//! factory fails the whole call.

use dson_binary::from_base64;
use dson_types::{
    cell, BigIntDigits, NamedPayload, Primitive, Record, RecordSeq, Value, ValueCell, BUFFER_TYPE,
    VIEW_TYPE,
};

use crate::error::{DecodeError, DecodeIssue, DecodeResult};
use crate::resolver::TypeResolver;

/// A reconstructed graph plus the non-fatal anomalies met along the way.
#[derive(Debug)]
pub struct Decoded {
    pub root: ValueCell,
    pub issues: Vec<DecodeIssue>,
}

/// Decode a record sequence into a value graph. Record 0 is the root.
///
/// A pure function of `(records, resolver)`: identical inputs produce
/// structurally identical graphs.
pub fn decode(records: &RecordSeq, resolver: &TypeResolver) -> DecodeResult<Decoded> {
    if records.is_empty() {
        return Err(DecodeError::EmptySequence);
    }
    let mut decoder = Decoder {
        records: records.records(),
        resolver,
        table: vec![None; records.len()],
        pending: Vec::new(),
        issues: Vec::new(),
    };
    let root = decoder.ensure(0, 0)?;
    while let Some(index) = decoder.pending.pop() {
        decoder.populate(index)?;
    }
    Ok(Decoded {
        root,
        issues: decoder.issues,
    })
}

struct Decoder<'a> {
    records: &'a [Record],
    resolver: &'a TypeResolver,
    /// Index → decoded (possibly still-being-populated) cell.
    table: Vec<Option<ValueCell>>,
    /// Container indices whose children still need resolving.
    pending: Vec<usize>,
    issues: Vec<DecodeIssue>,
}

impl Decoder<'_> {
    /// The cell for a record index, creating it on first sight.
    ///
    /// `at` is the referencing record, used when reporting issues.
    fn ensure(&mut self, index: usize, at: usize) -> DecodeResult<ValueCell> {
        if index >= self.records.len() {
            tracing::warn!(at, reference = index, "reference past end of record sequence");
            self.issues.push(DecodeIssue::IndexOutOfRange {
                at,
                reference: index,
            });
            return Ok(cell(Value::Undefined));
        }
        if let Some(existing) = &self.table[index] {
            return Ok(existing.clone());
        }

        let records = self.records;
        let node = match &records[index] {
            Record::Void => cell(Value::Undefined),
            Record::Primitive(p) => cell(match p {
                Primitive::Null => Value::Null,
                Primitive::Bool(b) => Value::Bool(*b),
                Primitive::Number(n) => Value::Number(*n),
                Primitive::String(s) => Value::String(s.clone()),
            }),
            Record::Date(stamp) => match stamp.to_datetime() {
                Some(dt) => cell(Value::Date(dt)),
                None => {
                    tracing::warn!(index, "malformed date stamp, degrading node to undefined");
                    self.issues.push(DecodeIssue::MalformedDate { at: index });
                    cell(Value::Undefined)
                }
            },
            Record::Pattern { source, flags } => cell(Value::Pattern {
                source: source.clone(),
                flags: flags.clone(),
            }),
            // Generic exception value: the original name string survives even
            // when the exact kind is unknown in this process.
            Record::Exception { name, message } => cell(Value::Exception {
                name: name.clone(),
                message: message.clone(),
            }),
            Record::BigInt(digits) => match BigIntDigits::new(digits.clone()) {
                Ok(digits) => cell(Value::BigInt(digits)),
                Err(_) => {
                    tracing::warn!(index, "malformed big integer digits, degrading node");
                    self.issues.push(DecodeIssue::MalformedBigInt { at: index });
                    cell(Value::Undefined)
                }
            },
            // Containers are stored before their children are resolved.
            Record::Array(_) => self.shell(index, Value::Array(Vec::new())),
            Record::Set(_) => self.shell(index, Value::Set(Vec::new())),
            Record::Object(_) => self.shell(index, Value::Object(Vec::new())),
            Record::Map(_) => self.shell(index, Value::Map(Vec::new())),
            Record::Named { name, payload } => match (name.as_str(), payload) {
                (BUFFER_TYPE, NamedPayload::Buffer(base64)) => {
                    cell(Value::Bytes(from_base64(base64)))
                }
                (
                    VIEW_TYPE,
                    NamedPayload::View {
                        buffer,
                        byte_offset,
                        byte_length,
                    },
                ) => cell(Value::View {
                    buffer: from_base64(buffer),
                    byte_offset: *byte_offset,
                    byte_length: *byte_length,
                }),
                (_, NamedPayload::Properties(_)) => {
                    if self.resolver.resolve(name).is_none() {
                        return Err(DecodeError::UnknownType(name.clone()));
                    }
                    // Undefined shell, replaced in place once the factory
                    // runs; cycles through this node keep their identity.
                    self.shell(index, Value::Undefined)
                }
                (name, _) => {
                    // Unreachable from the wire parser; total for records
                    // built programmatically.
                    tracing::warn!(index, name, "named payload does not match its type name");
                    cell(Value::Undefined)
                }
            },
        };
        self.table[index] = Some(node.clone());
        Ok(node)
    }

    fn shell(&mut self, index: usize, value: Value) -> ValueCell {
        self.pending.push(index);
        cell(value)
    }

    fn populate(&mut self, index: usize) -> DecodeResult<()> {
        let Some(node) = self.table[index].clone() else {
            return Ok(());
        };
        let records = self.records;
        match &records[index] {
            Record::Array(refs) => {
                let children = self.resolve_items(refs, index)?;
                *node.borrow_mut() = Value::Array(children);
            }
            Record::Set(refs) => {
                let children = self.resolve_items(refs, index)?;
                *node.borrow_mut() = Value::Set(children);
            }
            Record::Object(pairs) => {
                let entries = self.resolve_pairs(pairs, index)?;
                *node.borrow_mut() = Value::Object(entries);
            }
            Record::Map(pairs) => {
                let entries = self.resolve_pairs(pairs, index)?;
                *node.borrow_mut() = Value::Map(entries);
            }
            Record::Named {
                name,
                payload: NamedPayload::Properties(pairs),
            } => {
                let mut properties = Vec::with_capacity(pairs.len());
                for &(k, v) in pairs {
                    let key_cell = self.ensure(k, index)?;
                    let value_cell = self.ensure(v, index)?;
                    let key = match &*key_cell.borrow() {
                        Value::String(s) => s.clone(),
                        _ => {
                            tracing::warn!(index, key = k, "skipping non-string property key");
                            self.issues.push(DecodeIssue::NonStringKey { at: index, key: k });
                            continue;
                        }
                    };
                    properties.push((key, value_cell));
                }
                let factory = self
                    .resolver
                    .resolve(name)
                    .ok_or_else(|| DecodeError::UnknownType(name.clone()))?;
                *node.borrow_mut() = Value::Custom(factory(properties));
            }
            _ => {}
        }
        Ok(())
    }

    fn resolve_items(&mut self, refs: &[usize], at: usize) -> DecodeResult<Vec<ValueCell>> {
        refs.iter().map(|&r| self.ensure(r, at)).collect()
    }

    fn resolve_pairs(
        &mut self,
        pairs: &[(usize, usize)],
        at: usize,
    ) -> DecodeResult<Vec<(ValueCell, ValueCell)>> {
        pairs
            .iter()
            .map(|&(k, v)| Ok((self.ensure(k, at)?, self.ensure(v, at)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};
    use dson_types::{deep_equal, DateStamp, Factory, Reconstructible};

    use crate::encoder::encode;

    use super::*;

    fn roundtrip(root: &ValueCell) -> ValueCell {
        let seq = encode(root);
        let decoded = decode(&seq, &TypeResolver::new()).unwrap();
        assert!(decoded.issues.is_empty());
        decoded.root
    }

    #[test]
    fn builtin_graph_roundtrips_deep_equal() {
        let root = cell(Value::object([
            ("title", cell(Value::string("report"))),
            ("count", cell(Value::Number(42.0))),
            ("ratio", cell(Value::Number(-0.5))),
            ("flag", cell(Value::Bool(true))),
            ("nothing", cell(Value::Null)),
            ("missing", cell(Value::Undefined)),
            (
                "when",
                cell(Value::Date(Utc.with_ymd_and_hms(2023, 6, 1, 12, 30, 0).unwrap())),
            ),
            (
                "pattern",
                cell(Value::Pattern {
                    source: "\\d+".into(),
                    flags: "g".into(),
                }),
            ),
            (
                "oops",
                cell(Value::Exception {
                    name: "TypeError".into(),
                    message: "bad input".into(),
                }),
            ),
            ("big", cell(Value::BigInt(BigIntDigits::new("90071992547409919").unwrap()))),
            (
                "tags",
                cell(Value::Set(vec![cell(Value::string("a")), cell(Value::string("b"))])),
            ),
            (
                "lookup",
                cell(Value::Map(vec![(
                    cell(Value::Number(1.0)),
                    cell(Value::string("one")),
                )])),
            ),
            ("blob", cell(Value::Bytes(vec![0, 1, 2, 255]))),
        ]));
        let copy = roundtrip(&root);
        assert!(deep_equal(&root, &copy));
    }

    #[test]
    fn self_cycle_roundtrips_to_a_self_loop() {
        let root = cell(Value::Object(vec![]));
        let key = cell(Value::string("self"));
        if let Value::Object(entries) = &mut *root.borrow_mut() {
            entries.push((key, root.clone()));
        }

        let copy = roundtrip(&root);
        let entries = match &*copy.borrow() {
            Value::Object(entries) => entries.clone(),
            other => panic!("expected object, got {:?}", other),
        };
        assert_eq!(entries.len(), 1);
        assert!(Rc::ptr_eq(&entries[0].1, &copy));
    }

    #[test]
    fn aliasing_is_preserved_not_duplicated() {
        let shared = cell(Value::Array(vec![cell(Value::Number(1.0))]));
        let root = cell(Value::object([("a", shared.clone()), ("b", shared)]));

        let copy = roundtrip(&root);
        match &*copy.borrow() {
            Value::Object(entries) => {
                assert!(Rc::ptr_eq(&entries[0].1, &entries[1].1));
            }
            other => panic!("expected object, got {:?}", other),
        };
    }

    #[test]
    fn forward_and_backward_references_resolve() {
        // Map whose value appears before its key in reference order.
        let late = cell(Value::string("late"));
        let root = cell(Value::Map(vec![
            (late.clone(), cell(Value::Array(vec![late.clone()]))),
            (cell(Value::string("k2")), late),
        ]));
        let copy = roundtrip(&root);
        match &*copy.borrow() {
            Value::Map(entries) => {
                let first_key = &entries[0].0;
                match &*entries[0].1.borrow() {
                    Value::Array(items) => assert!(Rc::ptr_eq(&items[0], first_key)),
                    other => panic!("expected array, got {:?}", other),
                }
                assert!(Rc::ptr_eq(&entries[1].1, first_key));
            }
            other => panic!("expected map, got {:?}", other),
        };
    }

    #[test]
    fn bytes_and_views_reconstruct() {
        let root = cell(Value::Array(vec![
            cell(Value::Bytes(vec![72, 101, 108, 108, 111])),
            cell(Value::View {
                buffer: vec![1, 2, 3, 4],
                byte_offset: 1,
                byte_length: 2,
            }),
        ]));
        let copy = roundtrip(&root);
        assert!(deep_equal(&root, &copy));
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let err = decode(&RecordSeq::new(), &TypeResolver::new()).unwrap_err();
        assert!(matches!(err, DecodeError::EmptySequence));
    }

    #[test]
    fn unknown_named_type_fails_loudly() {
        let seq = RecordSeq::from(vec![Record::Named {
            name: "Ghost".into(),
            payload: NamedPayload::Properties(vec![]),
        }]);
        let err = decode(&seq, &TypeResolver::new()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType(name) if name == "Ghost"));
    }

    #[test]
    fn malformed_date_degrades_without_aborting_siblings() {
        let seq = RecordSeq::from(vec![
            Record::Array(vec![1, 2]),
            Record::Date(DateStamp::Iso("not a date".into())),
            Record::Primitive(Primitive::String("fine".into())),
        ]);
        let decoded = decode(&seq, &TypeResolver::new()).unwrap();
        assert_eq!(decoded.issues, vec![DecodeIssue::MalformedDate { at: 1 }]);
        match &*decoded.root.borrow() {
            Value::Array(items) => {
                assert!(matches!(&*items[0].borrow(), Value::Undefined));
                assert!(matches!(&*items[1].borrow(), Value::String(s) if s == "fine"));
            }
            other => panic!("expected array, got {:?}", other),
        };
    }

    #[test]
    fn out_of_range_reference_degrades_that_slot() {
        let seq = RecordSeq::from(vec![Record::Array(vec![7])]);
        let decoded = decode(&seq, &TypeResolver::new()).unwrap();
        assert_eq!(
            decoded.issues,
            vec![DecodeIssue::IndexOutOfRange { at: 0, reference: 7 }]
        );
        match &*decoded.root.borrow() {
            Value::Array(items) => assert!(matches!(&*items[0].borrow(), Value::Undefined)),
            other => panic!("expected array, got {:?}", other),
        };
    }

    #[test]
    fn malformed_bigint_degrades_that_node() {
        let seq = RecordSeq::from(vec![Record::BigInt("12a4".into())]);
        let decoded = decode(&seq, &TypeResolver::new()).unwrap();
        assert_eq!(decoded.issues, vec![DecodeIssue::MalformedBigInt { at: 0 }]);
        assert!(matches!(&*decoded.root.borrow(), Value::Undefined));
    }

    #[test]
    fn decode_is_deterministic() {
        let shared = cell(Value::Set(vec![cell(Value::Number(2.0))]));
        let root = cell(Value::Array(vec![shared.clone(), shared]));
        let seq = encode(&root);
        let first = decode(&seq, &TypeResolver::new()).unwrap();
        let second = decode(&seq, &TypeResolver::new()).unwrap();
        assert!(deep_equal(&first.root, &second.root));
    }

    // Caller-defined type fixture.
    #[derive(Debug)]
    struct Point {
        x: ValueCell,
        y: ValueCell,
    }

    impl Point {
        fn new(x: f64, y: f64) -> Self {
            Self {
                x: cell(Value::Number(x)),
                y: cell(Value::Number(y)),
            }
        }
    }

    impl Reconstructible for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn properties(&self) -> Vec<(String, ValueCell)> {
            vec![("x".into(), self.x.clone()), ("y".into(), self.y.clone())]
        }

        fn factory(&self) -> Factory {
            Rc::new(|properties| {
                let mut point = Point::new(0.0, 0.0);
                for (key, value) in properties {
                    match key.as_str() {
                        "x" => point.x = value,
                        "y" => point.y = value,
                        _ => {}
                    }
                }
                Box::new(point)
            })
        }
    }

    #[test]
    fn custom_type_roundtrips_through_registered_factory() {
        let point = Point::new(1.0, 2.0);
        let mut resolver = TypeResolver::new();
        resolver.register("Point", point.factory());

        let root = cell(Value::Custom(Box::new(point)));
        let seq = encode(&root);
        let decoded = decode(&seq, &resolver).unwrap();

        match &*decoded.root.borrow() {
            Value::Custom(custom) => {
                assert_eq!(custom.type_name(), "Point");
                let properties = custom.properties();
                assert!(matches!(&*properties[0].1.borrow(), Value::Number(n) if *n == 1.0));
                assert!(matches!(&*properties[1].1.borrow(), Value::Number(n) if *n == 2.0));
            }
            other => panic!("expected custom value, got {:?}", other),
        };
    }

    #[test]
    fn cycle_through_custom_node_keeps_identity() {
        // arr = [point]; point.y = arr
        let point = Point::new(9.0, 0.0);
        let factory = point.factory();
        let point_cell = cell(Value::Custom(Box::new(point)));
        let arr = cell(Value::Array(vec![point_cell.clone()]));
        if let Value::Custom(custom) = &mut *point_cell.borrow_mut() {
            // Rebuild the point with its y pointing back at the array.
            let rebuilt = factory(vec![
                ("x".into(), cell(Value::Number(9.0))),
                ("y".into(), arr.clone()),
            ]);
            *custom = rebuilt;
        }

        let mut resolver = TypeResolver::new();
        resolver.register("Point", factory);
        let decoded = decode(&encode(&arr), &resolver).unwrap();

        match &*decoded.root.borrow() {
            Value::Array(items) => match &*items[0].borrow() {
                Value::Custom(custom) => {
                    let properties = custom.properties();
                    let (key, back) = &properties[1];
                    assert_eq!(key, "y");
                    assert!(Rc::ptr_eq(back, &decoded.root));
                }
                other => panic!("expected custom value, got {:?}", other),
            },
            other => panic!("expected array, got {:?}", other),
        };
    }
}
