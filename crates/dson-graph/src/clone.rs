//! Deep clone by encode-then-decode.
//!
//! A pre-scan walks the input graph first and registers a factory for every
//! caller-defined type instance it finds. The wire format can only carry a
//! type name; without discovering which concrete factory that name maps to
//! in *this* process, the decoder could not rebuild the right type, and two
//! types sharing a name elsewhere would be ambiguous. Building the registry
//! from the objects actually present resolves both.

use std::collections::HashSet;
use std::rc::Rc;

use dson_types::{Value, ValueCell};

use crate::decoder::decode;
use crate::encoder::encode;
use crate::resolver::TypeResolver;

/// Deep-copy a value graph, preserving cycles, aliasing, and caller-defined
/// types.
///
/// `async` purely for composability with asynchronous callers; the work is
/// synchronous CPU-bound traversal with no suspension points.
///
/// Cloning is best-effort, not transactional: if reconstruction fails, the
/// failure is logged and the *original* cell is returned unchanged.
pub async fn clone_value(original: &ValueCell) -> ValueCell {
    // Primitives have no identity to preserve; no graph work needed.
    if !original.borrow().is_reference() {
        return original.clone();
    }

    let resolver = scan_types(original);
    let records = encode(original);
    match decode(&records, &resolver) {
        Ok(decoded) => {
            for issue in &decoded.issues {
                tracing::warn!(%issue, "clone decoded with a degraded node");
            }
            decoded.root
        }
        Err(err) => {
            tracing::error!(%err, "clone failed, returning the original reference");
            original.clone()
        }
    }
}

/// Discover caller-defined types reachable from `root`.
///
/// Cycle-safe via its own seen set, distinct from the encoder's identity
/// map: this pass never emits records, it only maps names to factories.
fn scan_types(root: &ValueCell) -> TypeResolver {
    let mut resolver = TypeResolver::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if !seen.insert(Rc::as_ptr(&node) as usize) {
            continue;
        }
        match &*node.borrow() {
            Value::Array(items) | Value::Set(items) => stack.extend(items.iter().cloned()),
            Value::Object(entries) | Value::Map(entries) => {
                for (key, value) in entries {
                    stack.push(key.clone());
                    stack.push(value.clone());
                }
            }
            Value::Custom(custom) => {
                resolver.register(custom.type_name(), custom.factory());
                for (_, value) in custom.properties() {
                    stack.push(value);
                }
            }
            _ => {}
        }
    }
    resolver
}
