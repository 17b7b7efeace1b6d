//! `Enum` codec: a closed set of named members, encoded by ordinal.
//!
//! Grounded on the reference implementation's `EnumEncoder`/`EnumDecoder`: the wire value is the
//! member's position in the declared list (`members.index(value)` on the way out,
//! `members[index]` on the way in), rejecting an out-of-range ordinal on decode.

use crate::error::{DecoderError, EncoderError};
use crate::value::Value;
use crate::varint::{VarintEncoder, VarintValueDecoder};
use crate::{Codec, Decoder, Encoder, Source};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// A closed enumeration, encoded as the LEB128 ordinal of the member named in
/// `Value::Enum(ordinal)`.
///
/// The member names themselves (`members`) are carried for diagnostics and for callers bridging
/// to an application enum type; the wire format only ever carries the ordinal.
#[derive(Debug, Clone)]
pub struct Enum {
    members: Vec<String>,
}

impl Enum {
    pub fn new(members: Vec<String>) -> Self {
        Enum { members }
    }

    pub fn arity(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

impl Codec for Enum {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        match value {
            Value::Enum(ordinal) if ordinal < self.members.len() => {
                Ok(Box::new(VarintEncoder::new(ordinal as u64)))
            }
            _ => Err(EncoderError::wrong_shape()),
        }
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        Box::new(EnumDecoder {
            inner: VarintValueDecoder::new(),
            arity: self.members.len(),
        })
    }
}

struct EnumDecoder {
    inner: VarintValueDecoder,
    arity: usize,
}

impl Decoder for EnumDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.inner.decode(source)
    }

    fn remaining(&self) -> usize {
        self.inner.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let ordinal = match Box::new(self.inner).get()? {
            Value::Int(n) => n as usize,
            _ => unreachable!("varint decoder always yields Value::Int"),
        };
        if ordinal < self.arity {
            Ok(Value::Enum(ordinal))
        } else {
            Err(DecoderError::invalid_enum_ordinal(ordinal, self.arity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SliceSource, VecSink};
    use crate::{decode_all, encode_all};

    fn make_suit() -> Enum {
        Enum::new(alloc::vec![
            "clubs".into(),
            "diamonds".into(),
            "hearts".into(),
            "spades".into(),
        ])
    }

    #[test]
    fn round_trips_each_member() {
        let suit = make_suit();
        for ordinal in 0..suit.arity() {
            let mut sink = VecSink(Vec::new());
            let mut encoder = suit.make_encoder(Value::Enum(ordinal)).unwrap();
            encode_all(&mut encoder, &mut sink);
            let mut source = SliceSource::new(&sink.0, usize::MAX);
            assert_eq!(
                decode_all(suit.make_decoder(), &mut source).unwrap(),
                Value::Enum(ordinal)
            );
        }
    }

    #[test]
    fn rejects_out_of_range_ordinal_on_encode() {
        let suit = make_suit();
        assert!(suit.make_encoder(Value::Enum(4)).is_err());
    }

    #[test]
    fn rejects_out_of_range_ordinal_on_decode() {
        let suit = make_suit();
        let mut source = SliceSource::new(&[4], usize::MAX);
        assert!(decode_all(suit.make_decoder(), &mut source).is_err());
    }
}
