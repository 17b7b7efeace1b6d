//! Fixed-size and runtime-sized raw byte transfer, with no framing of its own.
//!
//! Grounded on the teacher crate's `decoders::byte_array::ByteArrayDecoder<const N: usize>`
//! (const-generic, buffers into a stack array) and `decoders::byte_vec::ByteVecDecoder`
//! (runtime-sized, buffers into a `Vec`). Both accumulate across as many `decode` calls as it
//! takes and only report done once every byte has arrived.

use crate::error::{DecoderError, ValueError};
use crate::{Encoder, Sink, Source};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Encodes a byte slice verbatim, with no length prefix or other framing.
#[derive(Debug, Clone)]
pub struct RawEncoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> RawEncoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        RawEncoder { bytes, pos: 0 }
    }
}

impl<'a> Encoder for RawEncoder<'a> {
    fn encode(&mut self, sink: &mut dyn Sink) -> usize {
        if self.pos >= self.bytes.len() {
            return 0;
        }
        let n = sink.write(&self.bytes[self.pos..]);
        self.pos += n;
        n
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

/// Encodes an owned, runtime-sized byte buffer verbatim, with no framing of its own.
///
/// [`RawEncoder`] borrows; this owns, for callers (like the `Bytes`/`String` codecs) that
/// decoded or were handed a `Vec<u8>` they need to encode without keeping the originating value
/// alive.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct OwnedRawEncoder {
    buf: Vec<u8>,
    pos: usize,
}

#[cfg(feature = "alloc")]
impl OwnedRawEncoder {
    pub fn new(buf: Vec<u8>) -> Self {
        OwnedRawEncoder { buf, pos: 0 }
    }
}

#[cfg(feature = "alloc")]
impl Encoder for OwnedRawEncoder {
    fn encode(&mut self, sink: &mut dyn Sink) -> usize {
        if self.pos >= self.buf.len() {
            return 0;
        }
        let n = sink.write(&self.buf[self.pos..]);
        self.pos += n;
        n
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Decodes exactly `size` raw bytes into an owned buffer, with no framing of its own.
///
/// `size` must be strictly positive; a zero-or-negative-length raw transfer is rejected at
/// construction, matching the reference implementation's refusal to build a degenerate raw
/// codec.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct RawDecoder {
    buf: Vec<u8>,
    size: usize,
}

#[cfg(feature = "alloc")]
impl RawDecoder {
    /// Builds a decoder that will accumulate exactly `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if `size` is zero; a zero-length raw transfer is a
    /// construction-time argument error, not something to discover mid-decode.
    pub fn new(size: usize) -> Result<Self, ValueError> {
        if size == 0 {
            return Err(ValueError::new("raw decoder size must be positive"));
        }
        Ok(RawDecoder {
            buf: Vec::with_capacity(size),
            size,
        })
    }

    pub fn decode(&mut self, source: &mut dyn Source) -> usize {
        let missing = self.size - self.buf.len();
        if missing == 0 {
            return 0;
        }
        let chunk = source.read(missing);
        self.buf.extend_from_slice(chunk);
        chunk.len()
    }

    pub fn remaining(&self) -> usize {
        self.size - self.buf.len()
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() != 0
    }

    pub fn finish(self) -> Result<Vec<u8>, DecoderError> {
        if self.buf.len() == self.size {
            Ok(self.buf)
        } else {
            Err(DecoderError::incomplete(self.size - self.buf.len()))
        }
    }
}

/// Encodes an owned, statically-sized byte array verbatim, with no framing of its own.
#[derive(Debug, Clone)]
pub struct FixedEncoder<const N: usize> {
    buf: [u8; N],
    pos: usize,
}

impl<const N: usize> FixedEncoder<N> {
    pub fn new(buf: [u8; N]) -> Self {
        FixedEncoder { buf, pos: 0 }
    }
}

impl<const N: usize> Encoder for FixedEncoder<N> {
    fn encode(&mut self, sink: &mut dyn Sink) -> usize {
        if self.pos >= N {
            return 0;
        }
        let n = sink.write(&self.buf[self.pos..]);
        self.pos += n;
        n
    }

    fn remaining(&self) -> usize {
        N - self.pos
    }
}

/// Decodes exactly `N` raw bytes into a stack-allocated array, for statically-sized payloads
/// (booleans, fixed-width floats) that don't need a heap allocation.
#[derive(Debug, Clone)]
pub struct FixedDecoder<const N: usize> {
    buf: [u8; N],
    filled: usize,
}

impl<const N: usize> Default for FixedDecoder<N> {
    fn default() -> Self {
        FixedDecoder {
            buf: [0u8; N],
            filled: 0,
        }
    }
}

impl<const N: usize> FixedDecoder<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, source: &mut dyn Source) -> usize {
        let missing = N - self.filled;
        if missing == 0 {
            return 0;
        }
        let chunk = source.read(missing);
        self.buf[self.filled..self.filled + chunk.len()].copy_from_slice(chunk);
        self.filled += chunk.len();
        chunk.len()
    }

    pub fn remaining(&self) -> usize {
        N - self.filled
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() != 0
    }

    pub fn finish(self) -> Result<[u8; N], DecoderError> {
        if self.filled == N {
            Ok(self.buf)
        } else {
            Err(DecoderError::incomplete(N - self.filled))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "alloc")]
    use crate::encode_all;
    #[cfg(feature = "alloc")]
    use crate::test_support::{SliceSource, VecSink};
    #[cfg(feature = "alloc")]
    use alloc::vec::Vec;

    #[cfg(feature = "alloc")]
    #[test]
    fn raw_round_trips_whole() {
        let mut sink = VecSink(Vec::new());
        let mut encoder = RawEncoder::new(b"hello");
        encode_all(&mut encoder, &mut sink);
        assert_eq!(sink.0, b"hello");

        let mut source = SliceSource::new(&sink.0, usize::MAX);
        let mut decoder = RawDecoder::new(5).unwrap();
        while decoder.has_remaining() {
            if decoder.decode(&mut source) == 0 {
                break;
            }
        }
        assert_eq!(decoder.finish().unwrap(), b"hello");
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn raw_round_trips_one_byte_at_a_time() {
        let mut source = SliceSource::new(b"abcd", 1);
        let mut decoder = RawDecoder::new(4).unwrap();
        while decoder.has_remaining() {
            if decoder.decode(&mut source) == 0 {
                break;
            }
        }
        assert_eq!(decoder.finish().unwrap(), b"abcd");
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn raw_rejects_zero_size() {
        assert!(RawDecoder::new(0).is_err());
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn raw_reports_incomplete() {
        let mut source = SliceSource::new(b"ab", usize::MAX);
        let mut decoder = RawDecoder::new(4).unwrap();
        while decoder.has_remaining() {
            if decoder.decode(&mut source) == 0 {
                break;
            }
        }
        assert!(decoder.finish().is_err());
    }

    #[test]
    fn fixed_encoder_round_trips() {
        #[cfg(feature = "alloc")]
        {
            let mut sink = VecSink(Vec::new());
            let mut encoder = FixedEncoder::new([1u8, 2, 3, 4]);
            encode_all(&mut encoder, &mut sink);
            assert_eq!(sink.0, [1, 2, 3, 4]);
        }
    }

    #[test]
    fn fixed_round_trips() {
        #[cfg(feature = "alloc")]
        {
            let mut source = SliceSource::new(&[1, 2, 3, 4], 1);
            let mut decoder = FixedDecoder::<4>::new();
            while decoder.has_remaining() {
                if decoder.decode(&mut source) == 0 {
                    break;
                }
            }
            assert_eq!(decoder.finish().unwrap(), [1, 2, 3, 4]);
        }
    }
}
