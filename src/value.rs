//! The canonical dynamically-typed value carried between codecs.
//!
//! The registry resolves type descriptors at run time, so the codecs it synthesizes cannot be
//! parameterized over a caller-chosen Rust type at every intermediate node of a recursive type
//! tree (a `List<TreeNode>` field inside `TreeNode` can't name its element type without the
//! registry itself being generic over an unbounded type family). Every codec in this crate
//! therefore speaks `Value`; user types cross the boundary through [`crate::serializable`].

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A decoded (or to-be-encoded) value in the crate's wire model.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The unit value; wire representation is zero bytes.
    Null,
    Bool(bool),
    /// All integers are carried as `i64`; narrower/wider Rust integers convert at the
    /// application boundary.
    Int(i64),
    Float(f32),
    Bytes(Vec<u8>),
    Str(String),
    List(Vec<Value>),
    /// A deduplicated, insertion-ordered collection (the `set` origin).
    Set(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    /// An ordered field mapping, keyed by declared field name (the `Serializable` bridge).
    Record(Vec<(String, Value)>),
    /// The ordinal of an enum member, already validated against the codec's declared arity.
    Enum(usize),
}

#[cfg(feature = "alloc")]
impl Value {
    /// A short, human-readable label for the active variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
            Value::Tuple(_) => "tuple",
            Value::Record(_) => "record",
            Value::Enum(_) => "enum",
        }
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::Value;
    use alloc::vec;

    #[test]
    fn kind_name_matches_variant() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::List(vec![]).kind_name(), "list");
        assert_eq!(Value::Record(vec![]).kind_name(), "record");
    }
}
