//! `Bytes` and `String` codecs: length-prefixed byte payloads, and their UTF-8-validated
//! string wrapper.
//!
//! Grounded on the reference implementation's `_strings.py`: `BytesEncoder` is a two-child
//! multipart of a length varint followed by the raw payload; `BytesDecoder` decodes the length
//! first and only then constructs the raw decoder for that many bytes, since the length isn't
//! known up front. `StringEncoder`/`StringDecoder` wrap `Bytes`, encoding the value's UTF-8
//! bytes and validating UTF-8 on the way back in.

use crate::error::{DecoderError, EncoderError};
use crate::multipart::{MultipartDecoder, MultipartEncoder};
use crate::raw::{OwnedRawEncoder, RawDecoder};
use crate::value::Value;
use crate::varint::{VarintEncoder, VarintValueDecoder};
use crate::{Codec, Decoder, Encoder, Source};
use alloc::boxed::Box;
use alloc::string::String as StdString;
use alloc::vec::Vec;

/// A length-prefixed byte string: an LEB128 length varint followed by that many raw bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bytes;

impl Codec for Bytes {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Bytes(bytes) => Ok(make_bytes_encoder(bytes)),
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(BytesDecoder(make_bytes_multipart_decoder()))
    }
}

fn make_bytes_encoder(bytes: Vec<u8>) -> Box<dyn Encoder> {
    let len = bytes.len() as u64;
    Box::new(MultipartEncoder::new(alloc::vec![
        Box::new(VarintEncoder::new(len)),
        Box::new(OwnedRawEncoder::new(bytes)),
    ]))
}

fn make_bytes_multipart_decoder() -> MultipartDecoder {
    MultipartDecoder::new(|values: &[Value]| -> Option<Box<dyn Decoder>> {
        if values.is_empty() {
            return Some(Box::new(VarintValueDecoder::new()));
        }
        if values.len() == 1 {
            let size = match values[0] {
                Value::Int(n) => n as usize,
                _ => unreachable!("length decoder always yields Value::Int"),
            };
            if size == 0 {
                return None;
            }
            let raw = RawDecoder::new(size).expect("size is non-zero, checked above");
            return Some(Box::new(PayloadDecoder(raw)));
        }
        None
    })
}

struct PayloadDecoder(RawDecoder);

impl Decoder for PayloadDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        self.0.finish().map(Value::Bytes)
    }
}

struct BytesDecoder(MultipartDecoder);

impl Decoder for BytesDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let mut values = self.0.finish()?;
        // A zero-length payload never produces a `PayloadDecoder`, so only the length is present.
        match values.len() {
            1 => Ok(Value::Bytes(Vec::new())),
            2 => Ok(values.remove(1)),
            _ => unreachable!("bytes multipart always yields one or two values"),
        }
    }
}

/// A UTF-8 string, wire-identical to [`Bytes`] over its UTF-8 encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct Str;

impl Codec for Str {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Str(s) => Ok(make_bytes_encoder(s.into_bytes())),
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(StrDecoder(BytesDecoder(make_bytes_multipart_decoder())))
    }
}

struct StrDecoder(BytesDecoder);

impl Decoder for StrDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        match Box::new(self.0).get()? {
            Value::Bytes(bytes) => {
                StdString::from_utf8(bytes)
                    .map(Value::Str)
                    .map_err(|_| DecoderError::invalid_utf8())
            }
            _ => unreachable!("Bytes codec always yields Value::Bytes"),
        }
    }
}
