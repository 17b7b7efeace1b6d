//! Structural type descriptors and the descriptor-evaluation facility.
//!
//! A [`Descriptor`] is data describing a type's shape: the registry walks it to synthesize a
//! codec. Named forward references (`Descriptor::Named`) stand in for types that haven't been
//! fully expanded yet — most commonly a record field referring back to its own record, or to a
//! record declared later. Turning a named reference into a concrete descriptor is an external
//! concern, modeled as the narrow [`DescriptorEval`] trait rather than implemented here.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A structural description of a type, sufficient for the registry to synthesize a codec.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Null,
    Bool,
    Int,
    Float,
    Bytes,
    Str,
    List(Box<Descriptor>),
    Set(Box<Descriptor>),
    Dict(Box<Descriptor>, Box<Descriptor>),
    /// A fixed-arity heterogeneous tuple, `Tuple(T1, T2, ..., Tk)`.
    Tuple(Vec<Descriptor>),
    /// A variable-length homogeneous tuple, `tuple[T, ...]` in the source language.
    VarTuple(Box<Descriptor>),
    Union(Vec<Descriptor>),
    Enum(EnumDescriptor),
    Record(RecordDescriptor),
    /// A forward reference by name, to be resolved by [`DescriptorEval`] before lookup.
    Named(String),
}

/// The declared shape of an enumeration: its name (for diagnostics) and member order.
///
/// Wire encoding depends on declaration order — reordering members is a schema break.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    pub name: String,
    pub members: Vec<String>,
}

/// The declared shape of a record (user object): its name and ordered field list.
///
/// Field order is wire order. The `name` doubles as the cache/placeholder identity used by the
/// registry to detect and break self-reference cycles.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<(String, Descriptor)>,
}

/// Normalizes a possibly-unresolved descriptor (a named forward reference, or a descriptor
/// embedded in another type) into a fully resolved one.
///
/// This is the "descriptor-evaluation facility" from the external interfaces: an out-of-scope
/// collaborator the registry is generic over, not a concern this crate implements. Callers
/// whose descriptors are already fully resolved can use [`NoopEval`].
#[cfg(feature = "alloc")]
pub trait DescriptorEval {
    fn eval(&self, descriptor: Descriptor) -> Descriptor;
}

/// A [`DescriptorEval`] that performs no normalization; descriptors pass through unchanged.
#[cfg(feature = "alloc")]
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEval;

#[cfg(feature = "alloc")]
impl DescriptorEval for NoopEval {
    fn eval(&self, descriptor: Descriptor) -> Descriptor {
        descriptor
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn noop_eval_passes_through() {
        let d = Descriptor::List(Box::new(Descriptor::Int));
        assert_eq!(NoopEval.eval(d.clone()), d);
    }

    #[test]
    fn record_descriptor_is_structurally_comparable() {
        let a = RecordDescriptor {
            name: "Point".to_string(),
            fields: vec![("x".to_string(), Descriptor::Int)],
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
