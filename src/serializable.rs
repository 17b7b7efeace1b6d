//! The bridge between concrete Rust record types and the crate's dynamic [`Value`].
//!
//! The registry's record codec operates on `Value::Record` uniformly, regardless of which
//! concrete Rust struct a given record type corresponds to — that's what lets a `List<TreeNode>`
//! field resolve without the registry knowing about `TreeNode` specifically. `Serializable` is
//! the capability application types implement to cross that boundary: `dump` turns `&self` into
//! the field mapping a record codec expects to encode, `load` reconstructs `Self` from a
//! decoded field mapping.

use crate::descriptor::RecordDescriptor;
use crate::error::ValueError;
use crate::value::Value;
use alloc::string::String;
use alloc::vec::Vec;

/// Implemented by application record types so they can be encoded/decoded through a codec
/// synthesized by the registry.
pub trait Serializable: Sized {
    /// The declared field shape, in wire order. Used to build the `Descriptor::Record` handed
    /// to the registry and, recursively, to resolve the record's own field codecs.
    fn record_descriptor() -> RecordDescriptor;

    /// Produces the field-name -> value mapping to encode, in the order `record_descriptor`
    /// declares (the record codec encodes in declaration order regardless of the order returned
    /// here, but matching it avoids a second allocation-driven reorder).
    fn dump(&self) -> Vec<(String, Value)>;

    /// Reconstructs `Self` from a decoded field mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if a field is missing or holds a value of the wrong shape.
    fn load(fields: Vec<(String, Value)>) -> Result<Self, ValueError>;
}

/// Looks up `name` in a decoded field mapping, by value, removing it.
///
/// A small helper for hand-written `Serializable::load` implementations: fields decode in
/// declaration order but a `load` impl is free to consume them in whatever order suits the
/// target struct's constructor.
pub fn take_field(fields: &mut Vec<(String, Value)>, name: &str) -> Option<Value> {
    let index = fields.iter().position(|(key, _)| key == name)?;
    Some(fields.remove(index).1)
}

/// Encodes a [`Serializable`] value as a `Value::Record`, ready to hand to a record codec's
/// `make_encoder`.
pub fn to_value<T: Serializable>(value: &T) -> Value {
    Value::Record(value.dump())
}

/// Decodes a `Value::Record` (as produced by a record codec's decoder) back into `T`.
///
/// # Errors
///
/// Returns a [`ValueError`] if `value` isn't a record, or if [`Serializable::load`] rejects the
/// field mapping.
pub fn from_value<T: Serializable>(value: Value) -> Result<T, ValueError> {
    match value {
        Value::Record(fields) => T::load(fields),
        other => Err(ValueError::new(alloc::format!(
            "expected a record, found {}",
            other.kind_name()
        ))),
    }
}
