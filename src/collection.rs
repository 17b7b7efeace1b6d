//! `Collection` (homogeneous `list`/`set`/variadic `tuple`) and `Dict` codecs.
//!
//! Grounded on the reference implementation's `_collections.py`: a collection is a length
//! varint followed by that many encodings of one shared element codec; a dict is built on top
//! of a collection whose element codec is a two-tuple of `(key_codec, value_codec)`, converting
//! the decoded list of pairs into a mapping and resolving duplicate keys last-write-wins (the
//! order a dict literal's repeated keys would overwrite each other in).

use crate::error::{DecoderError, EncoderError};
use crate::multipart::{MultipartDecoder, MultipartEncoder};
use crate::tuple::Tuple;
use crate::value::Value;
use crate::varint::{VarintEncoder, VarintValueDecoder};
use crate::{Codec, Decoder, Encoder, Source};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

/// Which `Value` wrapper (and which source-language origin) a [`Collection`] builds around its
/// decoded elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    /// A deduplicated, insertion-ordered collection; duplicates are dropped at encode and decode
    /// time, keeping the first occurrence.
    Set,
    /// A variable-length homogeneous tuple (`tuple[T, ...]` in the source language), distinct
    /// from the fixed-arity heterogeneous [`crate::tuple::Tuple`].
    VarTuple,
}

impl CollectionKind {
    fn wrap(self, items: Vec<Value>) -> Value {
        match self {
            CollectionKind::List => Value::List(items),
            CollectionKind::Set => {
                let mut deduped: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !deduped.contains(&item) {
                        deduped.push(item);
                    }
                }
                Value::Set(deduped)
            }
            CollectionKind::VarTuple => Value::Tuple(items),
        }
    }
}

/// A length-prefixed homogeneous sequence: list, set, or variadic tuple.
#[derive(Clone)]
pub struct Collection {
    element: Rc<dyn Codec>,
    kind: CollectionKind,
}

impl Collection {
    pub fn new(element: Rc<dyn Codec>, kind: CollectionKind) -> Self {
        Collection { element, kind }
    }

    fn items_of<'a>(&self, value: &'a Value) -> Option<&'a [Value]> {
        match (self.kind, value) {
            (CollectionKind::List, Value::List(items)) => Some(items),
            (CollectionKind::Set, Value::Set(items)) => Some(items),
            (CollectionKind::VarTuple, Value::Tuple(items)) => Some(items),
            _ => None,
        }
    }
}

impl Codec for Collection {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        let items = self.items_of(&value).ok_or_else(EncoderError::wrong_shape)?;
        let items: Vec<Value> = match self.kind {
            CollectionKind::Set => {
                let mut deduped: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !deduped.contains(item) {
                        deduped.push(item.clone());
                    }
                }
                deduped
            }
            _ => items.to_vec(),
        };

        let mut children: Vec<Box<dyn Encoder>> =
            Vec::with_capacity(items.len() + 1);
        children.push(Box::new(VarintEncoder::new(items.len() as u64)));
        for item in items {
            children.push(self.element.make_encoder(item)?);
        }
        Ok(Box::new(MultipartEncoder::new(children)))
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        let element = self.element.clone();
        let kind = self.kind;
        let multipart = MultipartDecoder::new(move |values: &[Value]| -> Option<Box<dyn Decoder>> {
            if values.is_empty() {
                return Some(Box::new(VarintValueDecoder::new()));
            }
            let count = match values[0] {
                Value::Int(n) => n as usize,
                _ => unreachable!("length decoder always yields Value::Int"),
            };
            if values.len() - 1 < count {
                Some(element.make_decoder())
            } else {
                None
            }
        });
        Box::new(CollectionDecoder { multipart, kind })
    }
}

struct CollectionDecoder {
    multipart: MultipartDecoder,
    kind: CollectionKind,
}

impl Decoder for CollectionDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.multipart.decode(source)
    }

    fn remaining(&self) -> usize {
        self.multipart.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let mut values = self.multipart.finish()?;
        values.remove(0); // drop the length prefix
        Ok(self.kind.wrap(values))
    }
}

/// A length-prefixed mapping, realized as a [`Collection`] of `(key, value)` pairs.
///
/// Duplicate keys resolve last-write-wins, matching how a literal mapping with repeated keys
/// would be built up one assignment at a time.
#[derive(Clone)]
pub struct Dict {
    key: Rc<dyn Codec>,
    value: Rc<dyn Codec>,
}

impl Dict {
    pub fn new(key: Rc<dyn Codec>, value: Rc<dyn Codec>) -> Self {
        Dict { key, value }
    }

    fn pair_codec(&self) -> Rc<dyn Codec> {
        Rc::new(Tuple::new(alloc::vec![self.key.clone(), self.value.clone()]))
    }
}

impl Codec for Dict {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        let pairs = match value {
            Value::Dict(pairs) => pairs,
            _ => return Err(EncoderError::wrong_shape()),
        };
        let items = pairs
            .into_iter()
            .map(|(k, v)| Value::Tuple(alloc::vec![k, v]))
            .collect();
        Collection::new(self.pair_codec(), CollectionKind::List).make_encoder(Value::List(items))
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(DictDecoder(
            Collection::new(self.pair_codec(), CollectionKind::List).make_decoder(),
        ))
    }
}

struct DictDecoder(Box<dyn Decoder>);

impl Decoder for DictDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let items = match self.0.get()? {
            Value::List(items) => items,
            _ => unreachable!("pair collection always yields Value::List"),
        };
        let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(items.len());
        for item in items {
            let (k, v) = match item {
                Value::Tuple(mut pair) if pair.len() == 2 => {
                    let v = pair.pop().unwrap();
                    let k = pair.pop().unwrap();
                    (k, v)
                }
                _ => unreachable!("pair codec always yields a 2-tuple"),
            };
            if let Some(existing) = pairs.iter_mut().find(|(ek, _)| *ek == k) {
                existing.1 = v;
            } else {
                pairs.push((k, v));
            }
        }
        Ok(Value::Dict(pairs))
    }
}
