//! LEB128 unsigned varints and the zig-zag transform used to carry signed integers over them.
//!
//! Grounded on the teacher crate's raw byte-array encoder/decoder shape (precompute-then-drain
//! for encoding, accumulate-then-finish for decoding) and on the reference implementation's
//! `VarintEncoder`/`VarintDecoder`, which compute the LEB128 bytes eagerly at construction and
//! read one byte per step on the way back in.

use crate::error::DecoderError;
use crate::{Encoder, Source};

/// Max LEB128 bytes needed for a `u64`: `ceil(64 / 7) == 10`.
const MAX_VARINT_LEN: usize = 10;

/// Encodes a non-negative integer as an LEB128 varint.
///
/// The byte string is computed once at construction (like [`crate::raw::RawEncoder`] over a
/// precomputed buffer) and then drained a cursor-full at a time.
#[derive(Debug, Clone)]
pub struct VarintEncoder {
    buf: [u8; MAX_VARINT_LEN],
    len: u8,
    pos: u8,
}

impl VarintEncoder {
    /// Builds the encoder for `value`.
    pub fn new(mut value: u64) -> Self {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut len = 0u8;
        loop {
            let mut octet = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                octet |= 0x80;
            }
            buf[len as usize] = octet;
            len += 1;
            if value == 0 {
                break;
            }
        }
        VarintEncoder { buf, len, pos: 0 }
    }
}

impl Encoder for VarintEncoder {
    fn encode(&mut self, sink: &mut dyn crate::Sink) -> usize {
        if self.pos >= self.len {
            return 0;
        }
        let n = sink.write(&self.buf[self.pos as usize..self.len as usize]);
        self.pos += n as u8;
        n
    }

    fn remaining(&self) -> usize {
        (self.len - self.pos) as usize
    }
}

/// Decodes an LEB128 varint one byte at a time, terminating when the continuation bit clears.
///
/// Bounded at [`MAX_VARINT_LEN`] bytes, matching the encoder's own bound: a byte count at or past
/// that limit with the continuation bit still set is rejected rather than shifted into the
/// accumulator, since a shift amount past 63 bits would panic.
#[derive(Debug, Default, Clone)]
pub struct VarintDecoder {
    value: u64,
    shift: u32,
    count: u8,
    terminated: bool,
    invalid: bool,
}

impl VarintDecoder {
    pub fn new() -> Self {
        VarintDecoder::default()
    }

    /// Reads at most one byte from `source` and folds it into the accumulated value.
    ///
    /// Mirrors the teacher crate's `Decoder::decode_chunk`/`Decoder::end` split: progress is
    /// pushed in, and the value is only read back out via [`VarintDecoder::finish`].
    pub fn decode(&mut self, source: &mut dyn Source) -> usize {
        if self.terminated || self.invalid {
            return 0;
        }
        if self.count as usize >= MAX_VARINT_LEN {
            self.invalid = true;
            return 0;
        }
        let chunk = source.read(1);
        let octet = match chunk.first() {
            Some(&byte) => byte,
            None => return 0,
        };
        self.value |= u64::from(octet & 0x7f) << self.shift;
        self.shift += 7;
        self.count += 1;
        if octet & 0x80 == 0 {
            self.terminated = true;
        }
        1
    }

    pub fn remaining(&self) -> usize {
        if self.terminated || self.invalid {
            0
        } else {
            1
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() != 0
    }

    /// Finalizes decoding, returning the accumulated unsigned value.
    ///
    /// # Errors
    ///
    /// Returns a [`DecoderError`] if the byte stream ended before a terminating byte (continuation
    /// bit clear) was seen, or if the continuation bit was still set after [`MAX_VARINT_LEN`]
    /// bytes.
    pub fn finish(self) -> Result<u64, DecoderError> {
        if self.invalid {
            Err(DecoderError::invalid_varint())
        } else if self.terminated {
            Ok(self.value)
        } else {
            Err(DecoderError::incomplete(1))
        }
    }
}

/// Maps a signed integer to the unsigned domain so small magnitudes (positive or negative) stay
/// close to zero, keeping the varint short.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// A [`VarintDecoder`] wrapped as a [`crate::Decoder`], yielding `Value::Int`.
///
/// The composite codecs (`Collection`, `Dict`, `Bytes`, `Union`, `Enum`) all need an
/// unsigned-length-or-index prefix child that speaks `Value`; this is that shared building
/// block.
#[cfg(feature = "alloc")]
pub struct VarintValueDecoder(VarintDecoder);

#[cfg(feature = "alloc")]
impl VarintValueDecoder {
    pub fn new() -> Self {
        VarintValueDecoder(VarintDecoder::new())
    }
}

#[cfg(feature = "alloc")]
impl Default for VarintValueDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "alloc")]
impl crate::Decoder for VarintValueDecoder {
    fn decode(&mut self, source: &mut dyn Source) -> usize {
        self.0.decode(source)
    }

    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn get(self: alloc::boxed::Box<Self>) -> Result<crate::Value, DecoderError> {
        self.0.finish().map(|n| crate::Value::Int(n as i64))
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::test_support::{SliceSource, VecSink};
    use crate::encode_all;
    use alloc::vec::Vec;

    fn encode(value: u64) -> Vec<u8> {
        let mut sink = VecSink(Vec::new());
        let mut encoder = VarintEncoder::new(value);
        encode_all(&mut encoder, &mut sink);
        sink.0
    }

    fn decode(bytes: &[u8], chunk: usize) -> u64 {
        let mut source = SliceSource::new(bytes, chunk);
        let mut decoder = VarintDecoder::new();
        while decoder.has_remaining() {
            if decoder.decode(&mut source) == 0 {
                break;
            }
        }
        decoder.finish().unwrap()
    }

    #[test]
    fn zero_is_one_byte() {
        assert_eq!(encode(0), [0x00]);
    }

    #[test]
    fn max_one_byte_value() {
        assert_eq!(encode(127), [0x7f]);
    }

    #[test]
    fn smallest_two_byte_value() {
        assert_eq!(encode(128), [0x80, 0x01]);
    }

    #[test]
    fn round_trips_whole_byte_chunk() {
        for &value in &[0u64, 1, 127, 128, 300, 16384, u64::from(u32::MAX)] {
            assert_eq!(decode(&encode(value), usize::MAX), value);
        }
    }

    #[test]
    fn round_trips_one_byte_at_a_time() {
        for &value in &[0u64, 127, 128, 300, 1 << 40] {
            assert_eq!(decode(&encode(value), 1), value);
        }
    }

    #[test]
    fn zigzag_small_magnitudes_stay_small() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
    }

    #[test]
    fn zigzag_round_trips() {
        for value in [-1_000_000i64, -1, 0, 1, 1_000_000, i64::MIN, i64::MAX] {
            assert_eq!(zigzag_decode(zigzag_encode(value)), value);
        }
    }

    #[test]
    fn rejects_terminator_run_longer_than_max_varint_len() {
        let bytes = [0xffu8; MAX_VARINT_LEN + 1];
        let mut source = SliceSource::new(&bytes, usize::MAX);
        let mut decoder = VarintDecoder::new();
        while decoder.has_remaining() {
            if decoder.decode(&mut source) == 0 {
                break;
            }
        }
        assert!(decoder.finish().is_err());
    }
}
