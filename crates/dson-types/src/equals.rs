//! Cycle-aware structural equality over value graphs.
//!
//! Two graphs compare equal when they have the same shape and the same
//! scalar contents. Sharing structure is not compared: a graph with two
//! references to one node equals a graph with two equal copies. Identity
//! preservation is asserted separately via `Rc::ptr_eq`.

use std::collections::HashSet;
use std::rc::Rc;

use crate::value::{Value, ValueCell};

/// Compare two value graphs structurally. Safe on cyclic input.
///
/// Number comparison treats `NaN` as equal to `NaN` and `0.0` as equal to
/// `-0.0`, so a graph containing `NaN` still compares equal to itself.
pub fn deep_equal(a: &ValueCell, b: &ValueCell) -> bool {
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut stack: Vec<(ValueCell, ValueCell)> = vec![(a.clone(), b.clone())];

    while let Some((a, b)) = stack.pop() {
        if Rc::ptr_eq(&a, &b) {
            continue;
        }
        // A visited pair is already being compared further up the stack;
        // revisiting it would only recurse through the same cycle.
        let key = (Rc::as_ptr(&a) as usize, Rc::as_ptr(&b) as usize);
        if !visited.insert(key) {
            continue;
        }

        let (av, bv) = (a.borrow(), b.borrow());
        match (&*av, &*bv) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => {}
            (Value::Bool(x), Value::Bool(y)) if x == y => {}
            (Value::Number(x), Value::Number(y)) if numbers_equal(*x, *y) => {}
            (Value::String(x), Value::String(y)) if x == y => {}
            (Value::BigInt(x), Value::BigInt(y)) if x == y => {}
            (Value::Date(x), Value::Date(y)) if x == y => {}
            (
                Value::Pattern { source: xs, flags: xf },
                Value::Pattern { source: ys, flags: yf },
            ) if xs == ys && xf == yf => {}
            (
                Value::Exception { name: xn, message: xm },
                Value::Exception { name: yn, message: ym },
            ) if xn == yn && xm == ym => {}
            (Value::Bytes(x), Value::Bytes(y)) if x == y => {}
            (
                Value::View {
                    buffer: xb,
                    byte_offset: xo,
                    byte_length: xl,
                },
                Value::View {
                    buffer: yb,
                    byte_offset: yo,
                    byte_length: yl,
                },
            ) if xb == yb && xo == yo && xl == yl => {}
            (Value::Array(x), Value::Array(y)) | (Value::Set(x), Value::Set(y))
                if x.len() == y.len() =>
            {
                for (cx, cy) in x.iter().zip(y) {
                    stack.push((cx.clone(), cy.clone()));
                }
            }
            (Value::Object(x), Value::Object(y)) | (Value::Map(x), Value::Map(y))
                if x.len() == y.len() =>
            {
                for ((kx, vx), (ky, vy)) in x.iter().zip(y) {
                    stack.push((kx.clone(), ky.clone()));
                    stack.push((vx.clone(), vy.clone()));
                }
            }
            (Value::Custom(x), Value::Custom(y)) if x.type_name() == y.type_name() => {
                let (px, py) = (x.properties(), y.properties());
                if px.len() != py.len() {
                    return false;
                }
                for ((kx, vx), (ky, vy)) in px.iter().zip(&py) {
                    if kx != ky {
                        return false;
                    }
                    stack.push((vx.clone(), vy.clone()));
                }
            }
            _ => return false,
        }
    }
    true
}

fn numbers_equal(x: f64, y: f64) -> bool {
    x == y || (x.is_nan() && y.is_nan())
}
