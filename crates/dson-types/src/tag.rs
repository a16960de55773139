/// Closed enumeration selecting how a record's payload is interpreted.
///
/// Every built-in tag carries a stable numeric wire code. `Named` is the
/// fallback for anything outside the built-in set (binary buffers, binary
/// views, caller-defined types); it has no numeric code because the wire
/// carries the type name string in the tag slot instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Absent / undefined value.
    Void,
    /// String, number, boolean, or null, carried inline.
    Primitive,
    /// Ordered list of record indices.
    Array,
    /// Ordered list of `(key, value)` index pairs.
    Object,
    /// Timestamp (ISO text or epoch milliseconds).
    Date,
    /// Regular expression source and flags.
    Pattern,
    /// Ordered associative container, `(key, value)` index pairs.
    Map,
    /// Ordered set of record indices.
    Set,
    /// Exception name and message.
    Exception,
    /// Arbitrary-precision integer as decimal digit text.
    BigInt,
    /// Explicit type name plus a type-specific payload.
    Named,
}

/// Numeric wire codes for the built-in tags.
pub(crate) mod codes {
    pub const VOID: i64 = -1;
    pub const PRIMITIVE: i64 = 0;
    pub const ARRAY: i64 = 1;
    pub const OBJECT: i64 = 2;
    pub const DATE: i64 = 3;
    pub const PATTERN: i64 = 4;
    pub const MAP: i64 = 5;
    pub const SET: i64 = 6;
    pub const EXCEPTION: i64 = 7;
    pub const BIGINT: i64 = 8;
}

impl TypeTag {
    /// The numeric wire code for this tag, or `None` for [`TypeTag::Named`].
    pub fn wire_code(self) -> Option<i64> {
        match self {
            TypeTag::Void => Some(codes::VOID),
            TypeTag::Primitive => Some(codes::PRIMITIVE),
            TypeTag::Array => Some(codes::ARRAY),
            TypeTag::Object => Some(codes::OBJECT),
            TypeTag::Date => Some(codes::DATE),
            TypeTag::Pattern => Some(codes::PATTERN),
            TypeTag::Map => Some(codes::MAP),
            TypeTag::Set => Some(codes::SET),
            TypeTag::Exception => Some(codes::EXCEPTION),
            TypeTag::BigInt => Some(codes::BIGINT),
            TypeTag::Named => None,
        }
    }

    /// Look up the tag for a numeric wire code.
    pub fn from_wire_code(code: i64) -> Option<TypeTag> {
        match code {
            codes::VOID => Some(TypeTag::Void),
            codes::PRIMITIVE => Some(TypeTag::Primitive),
            codes::ARRAY => Some(TypeTag::Array),
            codes::OBJECT => Some(TypeTag::Object),
            codes::DATE => Some(TypeTag::Date),
            codes::PATTERN => Some(TypeTag::Pattern),
            codes::MAP => Some(TypeTag::Map),
            codes::SET => Some(TypeTag::Set),
            codes::EXCEPTION => Some(TypeTag::Exception),
            codes::BIGINT => Some(TypeTag::BigInt),
            _ => None,
        }
    }
}
