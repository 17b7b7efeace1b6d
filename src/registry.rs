//! The type-driven resolver: walks a [`Descriptor`] and synthesizes a [`Codec`], memoizing by
//! descriptor and breaking self-reference cycles with a placeholder.
//!
//! Grounded on the reference implementation's `Proton(CodecRegistry)`: built-in scalar codecs
//! are matched directly, parametric descriptors (`list`, `set`, `dict`, fixed/variadic `tuple`,
//! `Union`) recurse into their element descriptors, `enum.Enum` subclasses become [`Enum`]
//! codecs, and anything recognized as a record installs a placeholder in the cache *before*
//! recursing into its fields — so a field that refers back to the record being built resolves to
//! that same placeholder instead of looping forever. The placeholder is evicted from the cache if
//! any field fails to resolve, and is filled in with the finished codec once every field has.

use crate::collection::{Collection, CollectionKind};
use crate::descriptor::{Descriptor, DescriptorEval, RecordDescriptor};
use crate::enums::Enum;
use crate::error::ValueError;
use crate::primitives::{Boolean, Float32, Integer, Null};
use crate::strings::{Bytes, Str};
use crate::tuple::{Record, Tuple};
use crate::union::Union;
use crate::value::Value;
use crate::{Codec, Decoder, Encoder};
use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

#[cfg(feature = "std")]
use std::sync::Mutex;

/// Forwards to whatever codec has been installed in the shared cell, once resolution finishes.
///
/// Installed into the cache *before* a record's fields are resolved, so a self-referential field
/// captures a handle to this instead of recursing into `codec()` again.
struct LazyCodec(Rc<RefCell<Option<Rc<dyn Codec>>>>);

impl Codec for LazyCodec {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, crate::EncoderError> {
        let inner = self
            .0
            .borrow()
            .clone()
            .expect("LazyCodec used before its record finished resolving");
        inner.make_encoder(value)
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        let inner = self
            .0
            .borrow()
            .clone()
            .expect("LazyCodec used before its record finished resolving");
        inner.make_decoder()
    }
}

#[cfg(feature = "std")]
struct Cache(Mutex<Vec<(Descriptor, Rc<dyn Codec>)>>);

#[cfg(feature = "std")]
impl Cache {
    fn new() -> Self {
        Cache(Mutex::new(Vec::new()))
    }

    fn get(&self, descriptor: &Descriptor) -> Option<Rc<dyn Codec>> {
        self.0
            .lock()
            .expect("registry cache lock poisoned")
            .iter()
            .find(|(d, _)| d == descriptor)
            .map(|(_, c)| c.clone())
    }

    fn insert(&self, descriptor: Descriptor, codec: Rc<dyn Codec>) {
        self.0
            .lock()
            .expect("registry cache lock poisoned")
            .push((descriptor, codec));
    }

    fn remove(&self, descriptor: &Descriptor) -> Option<Rc<dyn Codec>> {
        let mut guard = self.0.lock().expect("registry cache lock poisoned");
        let pos = guard.iter().position(|(d, _)| d == descriptor)?;
        Some(guard.remove(pos).1)
    }
}

#[cfg(not(feature = "std"))]
struct Cache(RefCell<Vec<(Descriptor, Rc<dyn Codec>)>>);

#[cfg(not(feature = "std"))]
impl Cache {
    fn new() -> Self {
        Cache(RefCell::new(Vec::new()))
    }

    fn get(&self, descriptor: &Descriptor) -> Option<Rc<dyn Codec>> {
        self.0
            .borrow()
            .iter()
            .find(|(d, _)| d == descriptor)
            .map(|(_, c)| c.clone())
    }

    fn insert(&self, descriptor: Descriptor, codec: Rc<dyn Codec>) {
        self.0.borrow_mut().push((descriptor, codec));
    }

    fn remove(&self, descriptor: &Descriptor) -> Option<Rc<dyn Codec>> {
        let mut guard = self.0.borrow_mut();
        let pos = guard.iter().position(|(d, _)| d == descriptor)?;
        Some(guard.remove(pos).1)
    }
}

/// Resolves [`Descriptor`]s into [`Codec`]s, memoizing results and breaking self-reference
/// cycles.
///
/// Generic over the descriptor-evaluation facility ([`DescriptorEval`]) used to turn a
/// [`Descriptor::Named`] forward reference into the descriptor it actually names; callers whose
/// descriptors are already fully resolved can use [`crate::descriptor::NoopEval`].
pub struct Registry<E> {
    eval: E,
    cache: Cache,
}

impl<E: DescriptorEval> Registry<E> {
    pub fn new(eval: E) -> Self {
        Registry {
            eval,
            cache: Cache::new(),
        }
    }

    /// Resolves `descriptor` into a codec, consulting and populating the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if any nested descriptor (a dict's key or value, a tuple
    /// element, a union alternative, a record field) fails to resolve.
    pub fn codec(&self, descriptor: Descriptor) -> Result<Rc<dyn Codec>, ValueError> {
        let descriptor = self.eval.eval(descriptor);

        if let Some(cached) = self.cache.get(&descriptor) {
            #[cfg(feature = "log")]
            log::trace!("registry cache hit");
            return Ok(cached);
        }

        let codec = self.resolve(&descriptor)?;
        self.cache.insert(descriptor, codec.clone());
        Ok(codec)
    }

    fn resolve(&self, descriptor: &Descriptor) -> Result<Rc<dyn Codec>, ValueError> {
        match descriptor {
            Descriptor::Null => Ok(Rc::new(Null)),
            Descriptor::Bool => Ok(Rc::new(Boolean)),
            Descriptor::Int => Ok(Rc::new(Integer)),
            Descriptor::Float => Ok(Rc::new(Float32)),
            Descriptor::Bytes => Ok(Rc::new(Bytes)),
            Descriptor::Str => Ok(Rc::new(Str)),
            Descriptor::List(elem) => {
                let elem = self.codec((**elem).clone())?;
                Ok(Rc::new(Collection::new(elem, CollectionKind::List)))
            }
            Descriptor::Set(elem) => {
                let elem = self.codec((**elem).clone())?;
                Ok(Rc::new(Collection::new(elem, CollectionKind::Set)))
            }
            Descriptor::VarTuple(elem) => {
                let elem = self.codec((**elem).clone())?;
                Ok(Rc::new(Collection::new(elem, CollectionKind::VarTuple)))
            }
            Descriptor::Dict(key, value) => {
                let key = self.codec((**key).clone())?;
                let value = self.codec((**value).clone())?;
                Ok(Rc::new(crate::collection::Dict::new(key, value)))
            }
            Descriptor::Tuple(elements) => {
                let mut codecs = Vec::with_capacity(elements.len());
                for elem in elements {
                    codecs.push(self.codec(elem.clone())?);
                }
                Ok(Rc::new(Tuple::new(codecs)))
            }
            Descriptor::Union(alternatives) => {
                let mut codecs = Vec::with_capacity(alternatives.len());
                for alt in alternatives {
                    codecs.push(self.codec(alt.clone())?);
                }
                Ok(Rc::new(Union::new(codecs)))
            }
            Descriptor::Enum(enum_descriptor) => {
                Ok(Rc::new(Enum::new(enum_descriptor.members.clone())))
            }
            Descriptor::Record(record_descriptor) => {
                self.resolve_record(descriptor, record_descriptor)
            }
            Descriptor::Named(name) => Err(ValueError::new(format!(
                "unresolved forward reference `{}`; the descriptor-evaluation facility did not \
                 normalize it",
                name
            ))),
        }
    }

    fn resolve_record(
        &self,
        descriptor: &Descriptor,
        record_descriptor: &RecordDescriptor,
    ) -> Result<Rc<dyn Codec>, ValueError> {
        let shared = Rc::new(RefCell::new(None));
        let placeholder: Rc<dyn Codec> = Rc::new(LazyCodec(shared.clone()));
        self.cache.insert(descriptor.clone(), placeholder.clone());
        #[cfg(feature = "log")]
        log::debug!("installed placeholder for record `{}`", record_descriptor.name);

        let mut fields = Vec::with_capacity(record_descriptor.fields.len());
        for (name, field_descriptor) in &record_descriptor.fields {
            match self.codec(field_descriptor.clone()) {
                Ok(codec) => fields.push((name.clone(), codec)),
                Err(err) => {
                    self.cache.remove(descriptor);
                    #[cfg(feature = "log")]
                    log::debug!(
                        "evicted placeholder for record `{}` after field `{}` failed to resolve",
                        record_descriptor.name,
                        name
                    );
                    return Err(err);
                }
            }
        }

        let finished: Rc<dyn Codec> = Rc::new(Record::new(fields));
        *shared.borrow_mut() = Some(finished);
        Ok(placeholder)
    }

    /// Installs a caller-supplied codec for `descriptor`, overriding whatever resolution would
    /// otherwise produce (or pre-seeding a descriptor that hasn't been resolved yet).
    pub fn register(&self, descriptor: Descriptor, codec: Rc<dyn Codec>) {
        self.cache.remove(&descriptor);
        self.cache.insert(descriptor, codec);
    }

    /// Removes a previously registered or resolved codec, if any.
    pub fn unregister(&self, descriptor: &Descriptor) -> Option<Rc<dyn Codec>> {
        self.cache.remove(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NoopEval;
    use crate::test_support::{SliceSource, VecSink};
    use crate::{decode_all, encode_all};
    use alloc::string::ToString;
    use alloc::vec;

    fn registry() -> Registry<NoopEval> {
        Registry::new(NoopEval)
    }

    fn round_trip(codec: &Rc<dyn Codec>, value: Value) -> Value {
        let mut sink = VecSink(Vec::new());
        let mut encoder = codec.make_encoder(value).unwrap();
        encode_all(&mut encoder, &mut sink);
        let mut source = SliceSource::new(&sink.0, usize::MAX);
        decode_all(codec.make_decoder(), &mut source).unwrap()
    }

    #[test]
    fn resolves_scalar_descriptors() {
        let reg = registry();
        let codec = reg.codec(Descriptor::Int).unwrap();
        assert_eq!(round_trip(&codec, Value::Int(-5)), Value::Int(-5));
    }

    #[test]
    fn resolves_nested_parametric_descriptors() {
        let reg = registry();
        let descriptor = Descriptor::List(alloc::boxed::Box::new(Descriptor::Str));
        let codec = reg.codec(descriptor).unwrap();
        let v = Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]);
        assert_eq!(round_trip(&codec, v.clone()), v);
    }

    #[test]
    fn caches_identical_descriptors() {
        let reg = registry();
        let a = reg.codec(Descriptor::Int).unwrap();
        let b = reg.codec(Descriptor::Int).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolves_self_referential_record() {
        // A tree node: { value: int, children: list[TreeNode] }.
        let node_descriptor = Descriptor::Record(RecordDescriptor {
            name: "TreeNode".to_string(),
            fields: vec![
                ("value".to_string(), Descriptor::Int),
                (
                    "children".to_string(),
                    Descriptor::List(alloc::boxed::Box::new(Descriptor::Named(
                        "TreeNode".to_string(),
                    ))),
                ),
            ],
        });

        struct TreeEval(RecordDescriptor);
        impl DescriptorEval for TreeEval {
            fn eval(&self, descriptor: Descriptor) -> Descriptor {
                match descriptor {
                    Descriptor::Named(name) if name == self.0.name => {
                        Descriptor::Record(self.0.clone())
                    }
                    other => other,
                }
            }
        }

        let record_descriptor = match &node_descriptor {
            Descriptor::Record(r) => r.clone(),
            _ => unreachable!(),
        };
        let reg = Registry::new(TreeEval(record_descriptor));
        let codec = reg.codec(node_descriptor).unwrap();

        let leaf = Value::Record(vec![
            ("value".to_string(), Value::Int(3)),
            ("children".to_string(), Value::List(vec![])),
        ]);
        let root = Value::Record(vec![
            ("value".to_string(), Value::Int(1)),
            (
                "children".to_string(),
                Value::List(vec![Value::Record(vec![
                    ("value".to_string(), Value::Int(2)),
                    ("children".to_string(), Value::List(vec![leaf.clone()])),
                ])]),
            ),
        ]);

        assert_eq!(round_trip(&codec, root.clone()), root);
    }

    #[test]
    fn evicts_placeholder_when_a_field_fails_to_resolve() {
        let bad_record = Descriptor::Record(RecordDescriptor {
            name: "Bad".to_string(),
            fields: vec![("missing".to_string(), Descriptor::Named("Nowhere".to_string()))],
        });
        let reg = registry();
        assert!(reg.codec(bad_record.clone()).is_err());
        // A second attempt must not short-circuit on a stale cached placeholder.
        assert!(reg.codec(bad_record).is_err());
    }

    #[test]
    fn register_overrides_resolution() {
        let reg = registry();
        reg.register(Descriptor::Int, Rc::new(crate::primitives::Boolean));
        let codec = reg.codec(Descriptor::Int).unwrap();
        assert_eq!(round_trip(&codec, Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn unregister_removes_cached_codec() {
        let reg = registry();
        let _ = reg.codec(Descriptor::Int).unwrap();
        assert!(reg.unregister(&Descriptor::Int).is_some());
        assert!(reg.unregister(&Descriptor::Int).is_none());
    }
}
