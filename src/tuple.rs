//! `Tuple` (fixed-arity heterogeneous) and `Record` (named-field) codecs.
//!
//! Grounded on the reference implementation's `TupleEncoder`/`TupleDecoder` (zips the value's
//! elements against the declared per-position codecs, checking arity up front) and
//! `ObjectEncoder`/`ObjectDecoder` (encodes/decodes through a type's `dump()`/`load()`
//! capability, i.e. [`crate::serializable::Serializable`] at the application boundary, or
//! directly as a `Value::Record` field mapping at the codec boundary here).

use crate::error::{DecoderError, EncoderError};
use crate::multipart::{MultipartDecoder, MultipartEncoder};
use crate::value::Value;
use crate::{Codec, Decoder, Encoder, Source};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

/// A fixed-arity, heterogeneous sequence: position `i` is always encoded/decoded with codec `i`.
#[derive(Clone)]
pub struct Tuple {
    elements: Vec<Rc<dyn Codec>>,
}

impl Tuple {
    pub fn new(elements: Vec<Rc<dyn Codec>>) -> Self {
        Tuple { elements }
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
    }
}

impl Codec for Tuple {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        let items = match value {
            Value::Tuple(items) => items,
            _ => return Err(EncoderError::wrong_shape()),
        };
        if items.len() != self.elements.len() {
            return Err(EncoderError::wrong_arity(self.elements.len(), items.len()));
        }
        let mut children: Vec<Box<dyn Encoder>> = Vec::with_capacity(items.len());
        for (codec, item) in self.elements.iter().zip(items) {
            children.push(codec.make_encoder(item)?);
        }
        Ok(Box::new(MultipartEncoder::new(children)))
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        let elements = self.elements.clone();
        let multipart = MultipartDecoder::new(move |values: &[Value]| -> Option<Box<dyn Decoder>> {
            elements.get(values.len()).map(|codec| codec.make_decoder())
        });
        Box::new(TupleDecoder(multipart))
    }
}

struct TupleDecoder(MultipartDecoder);

impl Decoder for TupleDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        self.0.finish().map(Value::Tuple)
    }
}

/// A named-field record: every field is present, in declaration order, with its own codec.
///
/// Encodes/decodes as a flat `Value::Record`; bridging a concrete application struct to that
/// shape is [`crate::serializable::Serializable`]'s job, not this codec's.
#[derive(Clone)]
pub struct Record {
    fields: Vec<(String, Rc<dyn Codec>)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Rc<dyn Codec>)>) -> Self {
        Record { fields }
    }
}

impl Codec for Record {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        let mut supplied = match value {
            Value::Record(fields) => fields,
            _ => return Err(EncoderError::wrong_shape()),
        };
        let mut children: Vec<Box<dyn Encoder>> = Vec::with_capacity(self.fields.len());
        for (name, codec) in &self.fields {
            let pos = supplied.iter().position(|(key, _)| key == name);
            let value = match pos {
                Some(i) => supplied.remove(i).1,
                None => return Err(EncoderError::missing_field(name.clone())),
            };
            children.push(codec.make_encoder(value)?);
        }
        Ok(Box::new(MultipartEncoder::new(children)))
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        let fields = self.fields.clone();
        let multipart = MultipartDecoder::new(move |values: &[Value]| -> Option<Box<dyn Decoder>> {
            fields.get(values.len()).map(|(_, codec)| codec.make_decoder())
        });
        Box::new(RecordDecoder {
            multipart,
            names: self.fields.iter().map(|(name, _)| name.clone()).collect(),
        })
    }
}

struct RecordDecoder {
    multipart: MultipartDecoder,
    names: Vec<String>,
}

impl Decoder for RecordDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.multipart.decode(source)
    }

    fn remaining(&self) -> usize {
        self.multipart.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let values = self.multipart.finish()?;
        let fields = self.names.into_iter().zip(values).collect();
        Ok(Value::Record(fields))
    }
}
