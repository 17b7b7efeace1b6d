//! `Union` codec: a closed set of alternative shapes, tagged on the wire by declaration index.
//!
//! Grounded on the reference implementation's `UnionEncoder`/`UnionDecoder`: encoding scans the
//! declared alternatives in order and uses the first whose shape accepts the value (the
//! "narrowest match" the schema author is responsible for ordering, most-specific first);
//! decoding reads a varint index and dispatches to that alternative's codec. Per the redesign
//! preference recorded for this crate, the discriminant is an explicit [`VariantMarker`] index
//! rather than a runtime ancestor search over `dyn Any` — codec-level shape validation already
//! does the matching work a `mro()`/`isinstance` walk would have done.
//!
//! The decoded value of a union is simply its matched alternative's value; there is no separate
//! union wrapper in [`Value`].

use crate::error::{DecoderError, EncoderError};
use crate::multipart::{MultipartDecoder, MultipartEncoder};
use crate::value::Value;
use crate::varint::{VarintEncoder, VarintValueDecoder};
use crate::{Codec, Decoder, Encoder, Source};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

/// The declaration-order index of a union alternative; the sole content of the wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantMarker(pub usize);

/// A closed set of alternative shapes. Encoding picks the first alternative (in declaration
/// order) whose codec accepts the value; decoding reads the tag and dispatches directly.
#[derive(Clone)]
pub struct Union {
    alternatives: Vec<Rc<dyn Codec>>,
}

impl Union {
    pub fn new(alternatives: Vec<Rc<dyn Codec>>) -> Self {
        Union { alternatives }
    }

    pub fn arity(&self) -> usize {
        self.alternatives.len()
    }
}

impl Codec for Union {
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError> {
        for (index, codec) in self.alternatives.iter().enumerate() {
            let candidate = value.clone();
            if let Ok(payload) = codec.make_encoder(candidate) {
                let tag = VarintEncoder::new(index as u64);
                return Ok(Box::new(MultipartEncoder::new(alloc::vec![
                    Box::new(tag) as Box<dyn Encoder>,
                    payload,
                ])));
            }
        }
        Err(EncoderError::no_matching_variant())
    }

    fn make_decoder(&self) -> Box<dyn Decoder> {
        let alternatives = self.alternatives.clone();
        let arity = alternatives.len();
        let multipart = MultipartDecoder::new(move |values: &[Value]| -> Option<Box<dyn Decoder>> {
            match values.len() {
                0 => Some(Box::new(VarintValueDecoder::new())),
                1 => {
                    let index = match values[0] {
                        Value::Int(n) => n as usize,
                        _ => unreachable!("varint decoder always yields Value::Int"),
                    };
                    match alternatives.get(index) {
                        Some(codec) => Some(codec.make_decoder()),
                        None => Some(Box::new(InvalidIndexDecoder(Some(
                            DecoderError::invalid_union_index(index, arity),
                        )))),
                    }
                }
                _ => None,
            }
        });
        Box::new(UnionDecoder(multipart))
    }
}

/// A zero-byte decoder that fails immediately, used to surface an out-of-range tag without
/// inventing a bogus alternative decoder.
struct InvalidIndexDecoder(Option<DecoderError>);

impl Decoder for InvalidIndexDecoder {
    fn decode(&mut self, _source: &mut dyn Source) -> usize {
        0
    }

    fn remaining(&self) -> usize {
        0
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        Err(self.0.expect("constructed with an error"))
    }
}

struct UnionDecoder(MultipartDecoder);

impl Decoder for UnionDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: Box<Self>) -> Result<Value, DecoderError> {
        let mut values = self.0.finish()?;
        Ok(values.remove(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Integer;
    use crate::strings::Str;
    use crate::test_support::{SliceSource, VecSink};
    use crate::{decode_all, encode_all};

    fn make_union() -> Union {
        Union::new(alloc::vec![Rc::new(Integer) as Rc<dyn Codec>, Rc::new(Str)])
    }

    #[test]
    fn matches_wire_table_for_string_alternative() {
        let union = make_union();
        let mut sink = VecSink(Vec::new());
        let mut encoder = union.make_encoder(Value::Str("ab".into())).unwrap();
        encode_all(&mut encoder, &mut sink);
        assert_eq!(sink.0, [0x01, 0x02, b'a', b'b']);
    }

    #[test]
    fn round_trips_first_matching_alternative() {
        let union = make_union();
        let mut sink = VecSink(Vec::new());
        let mut encoder = union.make_encoder(Value::Int(7)).unwrap();
        encode_all(&mut encoder, &mut sink);
        assert_eq!(sink.0[0], 0x00);
        let mut source = SliceSource::new(&sink.0, usize::MAX);
        assert_eq!(decode_all(union.make_decoder(), &mut source).unwrap(), Value::Int(7));
    }

    #[test]
    fn rejects_value_matching_no_alternative() {
        let union = make_union();
        assert!(union.make_encoder(Value::Bool(true)).is_err());
    }

    #[test]
    fn rejects_out_of_range_tag_on_decode() {
        let union = make_union();
        let mut source = SliceSource::new(&[0x02], usize::MAX);
        assert!(decode_all(union.make_decoder(), &mut source).is_err());
    }
}
