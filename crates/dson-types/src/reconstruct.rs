use std::fmt;
use std::rc::Rc;

use crate::value::ValueCell;

/// Rebuilds an instance of a caller-defined type from decoded properties.
///
/// The properties are the same `(name, value)` entries the instance reported
/// through [`Reconstructible::properties`] at encode time, with every value
/// re-decoded (cycles and aliasing intact).
pub type Factory = Rc<dyn Fn(Vec<(String, ValueCell)>) -> Box<dyn Reconstructible>>;

/// Capability for caller-defined types that survive a round trip.
///
/// The wire format can only carry a type name and generic state, not
/// behavior. A `Reconstructible` instance supplies all three pieces the
/// engine needs: the name to write, the state to encode, and a factory the
/// clone pre-scan can register so the decoder knows how to rebuild the type
/// in this process.
pub trait Reconstructible: fmt::Debug {
    /// Stable type name carried on the wire. Two types must not share a name
    /// within one graph.
    fn type_name(&self) -> &str;

    /// Own enumerable state in stable order. Values may reference any part
    /// of the surrounding graph, including this instance's own cell.
    fn properties(&self) -> Vec<(String, ValueCell)>;

    /// A factory that rebuilds an instance of this type.
    fn factory(&self) -> Factory;
}
