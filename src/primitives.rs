//! The scalar codecs: `Null`, `Boolean`, `Integer`, `Float32`.
//!
//! Grounded on the reference implementation's `_primitives.py` (`NullEncoder`/`NullDecoder`,
//! `IntegerEncoder`/`IntegerDecoder` with zig-zag, `FloatEncoder`/`FloatDecoder` as big-endian
//! 4-byte IEEE 754, `BooleanEncoder`/`BooleanDecoder` validating the wire byte is exactly `0x00`
//! or `0x01`).

use crate::error::{DecoderError, EncoderError};
use crate::raw::{FixedDecoder, FixedEncoder};
use crate::value::Value;
use crate::varint::{zigzag_decode, zigzag_encode, VarintDecoder, VarintEncoder};
use crate::{Codec, Decoder, Encoder, Sink, Source};
use alloc::boxed::Box;

/// The unit type. Encodes to zero bytes; decodes unconditionally to `Value::Null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Null;

impl Codec for Null {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Null => Ok(Box::new(NullEncoder)),
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(NullDecoder)
    }
}

struct NullEncoder;

impl Encoder for NullEncoder {
    fn encode(&mut self, _sink: &mut dyn Sink) -> usize {
        0
    }

    fn remaining(&self) -> usize {
        0
    }
}

struct NullDecoder;

impl Decoder for NullDecoder {
    fn decode(&mut self, _source: &mut dyn Source) -> usize {
        0
    }

    fn remaining(&self) -> usize {
        0
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        Ok(Value::Null)
    }
}

/// A boolean, encoded as a single byte: `0x00` for `false`, `0x01` for `true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Boolean;

impl Codec for Boolean {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Bool(b) => Ok(Box::new(FixedByteEncoder::new(if b { 1 } else { 0 }))),
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(BooleanDecoder(FixedDecoder::new()))
    }
}

struct FixedByteEncoder {
    byte: u8,
    done: bool,
}

impl FixedByteEncoder {
    fn new(byte: u8) -> Self {
        FixedByteEncoder { byte, done: false }
    }
}

impl Encoder for FixedByteEncoder {
    fn encode(&mut self, sink: &mut dyn Sink) -> usize {
        if self.done {
            return 0;
        }
        let n = sink.write(&[self.byte]);
        if n == 1 {
            self.done = true;
        }
        n
    }

    fn remaining(&self) -> usize {
        if self.done {
            0
        } else {
            1
        }
    }
}

struct BooleanDecoder(FixedDecoder<1>);

impl Decoder for BooleanDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let byte = self.0.finish()?[0];
        match byte {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(DecoderError::invalid_boolean(other)),
        }
    }
}

/// A signed integer, carried as an LEB128 varint over the zig-zag transform.
#[derive(Debug, Default, Clone, Copy)]
pub struct Integer;

impl Codec for Integer {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Int(n) => Ok(Box::new(VarintEncoder::new(zigzag_encode(n)))),
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(IntegerDecoder(VarintDecoder::new()))
    }
}

struct IntegerDecoder(VarintDecoder);

impl Decoder for IntegerDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        self.0.finish().map(|n| Value::Int(zigzag_decode(n)))
    }
}

/// A 32-bit IEEE 754 float, carried big-endian in 4 bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Float32;

impl Codec for Float32 {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Float(f) => Ok(Box::new(FixedEncoder::new(f.to_be_bytes()))),
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(Float32Decoder(FixedDecoder::new()))
    }
}

struct Float32Decoder(FixedDecoder<4>);

impl Decoder for Float32Decoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        self.0.finish().map(|b| Value::Float(f32::from_be_bytes(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SliceSource, VecSink};
    use crate::{decode_all, encode_all};
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn round_trip(codec: &dyn Codec, value: Value) -> Value {
        let mut sink = VecSink(Vec::new());
        let mut encoder = codec.make_encoder(value).unwrap();
        encode_all(&mut encoder, &mut sink);
        let mut source = SliceSource::new(&sink.0, usize::MAX);
        decode_all(codec.make_decoder(), &mut source).unwrap()
    }

    #[test]
    fn null_round_trips() {
        assert_eq!(round_trip(&Null, Value::Null), Value::Null);
    }

    #[test]
    fn boolean_round_trips() {
        assert_eq!(round_trip(&Boolean, Value::Bool(true)), Value::Bool(true));
        assert_eq!(round_trip(&Boolean, Value::Bool(false)), Value::Bool(false));
    }

    #[test]
    fn boolean_rejects_invalid_byte() {
        let mut source = SliceSource::new(&[0x02], usize::MAX);
        let err = decode_all(Boolean.make_decoder(), &mut source).unwrap_err();
        assert!(err.to_string().contains("0x02"));
    }

    #[test]
    fn integer_matches_wire_table() {
        let mut sink = VecSink(Vec::new());
        let mut encoder = Integer.make_encoder(Value::Int(-1)).unwrap();
        encode_all(&mut encoder, &mut sink);
        assert_eq!(sink.0, [0x01]);

        let mut sink = VecSink(Vec::new());
        let mut encoder = Integer.make_encoder(Value::Int(150)).unwrap();
        encode_all(&mut encoder, &mut sink);
        assert_eq!(sink.0, [0xac, 0x02]);
    }

    #[test]
    fn integer_round_trips_negative_and_positive() {
        for n in [-1_000_000i64, -1, 0, 1, 1_000_000] {
            assert_eq!(round_trip(&Integer, Value::Int(n)), Value::Int(n));
        }
    }

    #[test]
    fn float_round_trips() {
        assert_eq!(
            round_trip(&Float32, Value::Float(1.5)),
            Value::Float(1.5)
        );
    }
}
