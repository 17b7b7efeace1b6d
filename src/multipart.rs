//! The n-ary sequential composition driver every composite codec (collection, tuple, union,
//! record) is built from.
//!
//! Grounded on the reference implementation's `MultipartEncoder`/`MultipartDecoder`, which drive
//! a sequence of child codecs one at a time and only move to the next child once the current one
//! is exhausted. The encode side knows every child up front (the value being encoded is already
//! in hand), so it's just a `Vec` of boxed encoders. The decode side generally does not — a
//! collection doesn't know its element count until the first child (a length varint) has
//! finished decoding — so children are produced lazily by a `next_child(values_so_far)`
//! continuation, mirroring the reference implementation's `_next(self, current)` hook instead of
//! recursing through the call stack.

use crate::error::DecoderError;
use crate::value::Value;
use crate::{Decoder, Encoder, Sink, Source};
use alloc::boxed::Box;
use alloc::vec::Vec;

/// Encodes a fixed, already-known sequence of child encoders in order.
///
/// Each `encode` call advances the first non-terminal child; children that finished on a
/// previous call are skipped without being touched again.
pub struct MultipartEncoder {
    children: Vec<Box<dyn Encoder>>,
    index: usize,
}

impl MultipartEncoder {
    pub fn new(children: Vec<Box<dyn Encoder>>) -> Self {
        MultipartEncoder { children, index: 0 }
    }
}

impl Encoder for MultipartEncoder {
    fn encode(&mut self, sink: &mut dyn Sink) -> usize {
        while self.index < self.children.len() {
            if !self.children[self.index].has_remaining() {
                self.index += 1;
                continue;
            }
            return self.children[self.index].encode(sink);
        }
        0
    }

    fn remaining(&self) -> usize {
        self.children[self.index..]
            .iter()
            .map(|c| c.remaining())
            .sum()
    }
}

/// Decodes a sequence of child decoders produced lazily from the values decoded so far.
///
/// `next_child` is called with the values finished so far and must return the next child
/// decoder, or `None` once the sequence is complete. It is never called again after returning
/// `None`.
pub struct MultipartDecoder {
    values: Vec<Value>,
    current: Option<Box<dyn Decoder>>,
    next_child: Box<dyn FnMut(&[Value]) -> Option<Box<dyn Decoder>>>,
    error: Option<DecoderError>,
    done: bool,
}

impl MultipartDecoder {
    pub fn new(next_child: impl FnMut(&[Value]) -> Option<Box<dyn Decoder>> + 'static) -> Self {
        MultipartDecoder {
            values: Vec::new(),
            current: None,
            next_child: Box::new(next_child),
            error: None,
            done: false,
        }
    }

    pub fn decode(&mut self, source: &mut dyn Source) -> usize {
        loop {
            if self.done {
                return 0;
            }
            if self.current.is_none() {
                match (self.next_child)(&self.values) {
                    Some(child) => self.current = Some(child),
                    None => {
                        self.done = true;
                        return 0;
                    }
                }
            }
            let child = self.current.as_mut().expect("just populated");
            if child.has_remaining() {
                let n = child.decode(source);
                return n;
            }
            let child = self.current.take().expect("checked above");
            match child.get() {
                Ok(value) => self.values.push(value),
                Err(err) => {
                    self.error = Some(err);
                    self.done = true;
                    return 0;
                }
            }
        }
    }

    /// A lower bound: `0` once finished, `1` while more children (known or not yet produced)
    /// remain. Computing an exact count would require invoking `next_child` speculatively, which
    /// would observe side effects it's only meant to see once.
    pub fn remaining(&self) -> usize {
        if self.done {
            0
        } else {
            1
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() != 0
    }

    pub fn finish(self) -> Result<Vec<Value>, DecoderError> {
        if let Some(err) = self.error {
            Err(err)
        } else if self.done {
            Ok(self.values)
        } else {
            Err(DecoderError::incomplete(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{FixedDecoder, RawEncoder};
    use crate::test_support::{SliceSource, VecSink};
    use crate::varint::{VarintDecoder, VarintEncoder};
    use crate::encode_all;
    use alloc::vec;

    struct OneByteDecoder(FixedDecoder<1>);

    impl Decoder for OneByteDecoder {
        fn decode(&mut self, source: &mut dyn Source) -> usize {
            self.0.decode(source)
        }

        fn remaining(&self) -> usize {
            self.0.remaining()
        }

        fn get(self: Box<Self>) -> Result<Value, DecoderError> {
            self.0.finish().map(|b| Value::Int(i64::from(b[0])))
        }
    }

    struct VarintValueDecoder(VarintDecoder);

    impl Decoder for VarintValueDecoder {
        fn decode(&mut self, source: &mut dyn Source) -> usize {
            self.0.decode(source)
        }

        fn remaining(&self) -> usize {
            self.0.remaining()
        }

        fn get(self: Box<Self>) -> Result<Value, DecoderError> {
            self.0.finish().map(|v| Value::Int(v as i64))
        }
    }

    #[test]
    fn encodes_children_in_order() {
        let mut sink = VecSink(Vec::new());
        let a = Box::new(VarintEncoder::new(5));
        let b = Box::new(RawEncoder::new(b"xy"));
        let mut composite = MultipartEncoder::new(vec![a, b]);
        encode_all(&mut composite, &mut sink);
        assert_eq!(sink.0, [5, b'x', b'y']);
    }

    #[test]
    fn decodes_length_then_that_many_elements() {
        // length-prefixed sequence of single bytes: count, then that many raw bytes.
        let bytes = [3u8, 10, 20, 30];

        let mut decoder = MultipartDecoder::new(|values: &[Value]| -> Option<Box<dyn Decoder>> {
            if values.is_empty() {
                return Some(Box::new(VarintValueDecoder(VarintDecoder::new())));
            }
            let count = match values[0] {
                Value::Int(n) => n as usize,
                _ => unreachable!(),
            };
            if values.len() - 1 < count {
                Some(Box::new(OneByteDecoder(FixedDecoder::new())))
            } else {
                None
            }
        });
        let mut source = SliceSource::new(&bytes, usize::MAX);
        while decoder.has_remaining() {
            decoder.decode(&mut source);
        }
        let values = decoder.finish().unwrap();
        assert_eq!(
            values,
            vec![Value::Int(3), Value::Int(10), Value::Int(20), Value::Int(30)]
        );
    }
}
