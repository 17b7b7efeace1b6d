//! # A type-driven incremental serialization framework
//!
//! This crate turns a structural type descriptor into a *codec*: a matched pair of
//! incremental encoder/decoder state machines that move values to and from byte streams in
//! bounded, resumable steps. Callers are responsible for obtaining bytes to decode and for
//! accepting bytes to encode; this crate only describes how to make progress given whatever
//! the stream could transfer in one attempt. That makes it **IO-agnostic**: the same codec can
//! be driven from a blocking reader, a non-blocking socket, or an in-memory buffer.
//!
//! The three central pieces are:
//!
//! * [`Codec`] — a stateless factory producing [`Encoder`]/[`Decoder`] state machines.
//! * the composition algebra in [`collection`], [`tuple`], [`union`] and [`enums`] — higher-order
//!   codecs built from child codecs via the [`multipart`] driver.
//! * [`registry`] — a resolver that walks a [`descriptor::Descriptor`] and synthesizes codecs,
//!   memoizing results and breaking self-reference cycles with a placeholder.
//!
//! # Features
//!
//! * `alloc` - enables the composition algebra and registry, which need an allocator.
//! * `std` - enables the standard library `Error` impls and a `Mutex`-guarded registry.
//! * `log` - emits resolver diagnostics (cache hits, placeholder install/finalize) via the `log`
//!   facade.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod raw;
pub mod varint;

#[cfg(feature = "alloc")]
pub mod collection;
#[cfg(feature = "alloc")]
pub mod descriptor;
#[cfg(feature = "alloc")]
pub mod enums;
#[cfg(feature = "alloc")]
pub mod multipart;
#[cfg(feature = "alloc")]
pub mod primitives;
#[cfg(feature = "alloc")]
pub mod registry;
#[cfg(feature = "alloc")]
pub mod serializable;
#[cfg(feature = "alloc")]
pub mod strings;
#[cfg(feature = "alloc")]
pub mod tuple;
#[cfg(feature = "alloc")]
pub mod union;
#[cfg(feature = "alloc")]
pub mod value;

#[cfg(feature = "alloc")]
pub use descriptor::Descriptor;
pub use error::{DecoderError, EncoderError, ValueError};
#[cfg(feature = "alloc")]
pub use value::Value;

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

/// A byte sink: the write half of the stream abstraction every codec is driven against.
///
/// There is no buffering contract and codecs never flush; `write` may accept fewer bytes than
/// offered and the caller is expected to retry with the remainder later.
pub trait Sink {
    /// Accepts as many of `buf`'s bytes as it can right now and returns how many were taken.
    ///
    /// Returning `0` signals "no progress possible this attempt", not an error.
    fn write(&mut self, buf: &[u8]) -> usize;
}

/// A byte source: the read half of the stream abstraction every codec is driven against.
pub trait Source {
    /// Returns up to `max` bytes currently available, or an empty slice if none are available
    /// right now. An empty return does **not** mean end-of-stream; the caller decides when
    /// persistent lack of progress should be treated as failure.
    fn read(&mut self, max: usize) -> &[u8];
}

/// A finite, consumable encoder state machine.
///
/// Each call to [`encode`](Encoder::encode) writes *at most* what the sink accepts in one
/// attempt and may return early without finishing. `has_remaining` is monotone: once it reports
/// `false` it never reports `true` again.
pub trait Encoder {
    /// Writes the next segment of the encoded value to `sink`, returning the number of bytes
    /// written. Returns `0` only if the encoder is already terminal or the sink accepted
    /// nothing this attempt.
    fn encode(&mut self, sink: &mut dyn Sink) -> usize;

    /// A lower bound on the number of bytes still to be written.
    fn remaining(&self) -> usize;

    /// Whether any bytes remain to be written.
    fn has_remaining(&self) -> bool {
        self.remaining() != 0
    }
}

/// A finite decoder state machine accumulating a reconstructed [`Value`].
///
/// `get` is only meaningful once [`has_remaining`](Decoder::has_remaining) reports `false` and
/// decoding terminated cleanly; calling it earlier is a logic error in the caller and the
/// default behavior is to propagate whatever the decoder last observed as its failure.
#[cfg(feature = "alloc")]
pub trait Decoder {
    /// Reads the next segment of the value from `source`, returning the number of bytes
    /// consumed. Returns `0` only if the decoder is already terminal or the source produced
    /// nothing this attempt.
    fn decode(&mut self, source: &mut dyn Source) -> usize;

    /// A lower bound on the number of bytes still required to terminate.
    fn remaining(&self) -> usize;

    /// Whether the decoder still requires more bytes.
    fn has_remaining(&self) -> bool {
        self.remaining() != 0
    }

    /// Consumes the decoder and returns the value it accumulated.
    ///
    /// # Errors
    ///
    /// Returns a [`DecoderError`] if the bytes observed so far do not amount to a complete,
    /// valid value (including the case where decoding hasn't terminated yet).
    fn get(self: Box<Self>) -> Result<Value, DecoderError>;
}

/// A stateless, reusable factory for encoder/decoder pairs over one type.
///
/// Codecs are value-like and freely shared; the registry keeps them behind `Rc` so recursive
/// (self-referential) record types can embed a handle to their own codec.
#[cfg(feature = "alloc")]
pub trait Codec {
    /// Builds a fresh encoder for `value`.
    ///
    /// # Errors
    ///
    /// Returns an [`EncoderError`] if `value` does not belong to this codec's domain (wrong
    /// variant, wrong arity, missing record field, no matching union alternative, ...).
    fn make_encoder(&self, value: Value) -> Result<Box<dyn Encoder>, EncoderError>;

    /// Builds a fresh, empty decoder.
    fn make_decoder(&self) -> Box<dyn Decoder>;
}

/// Drives `encoder` against `sink` until it reports no remaining work.
#[cfg(feature = "alloc")]
pub fn encode_all(encoder: &mut dyn Encoder, sink: &mut dyn Sink) -> usize {
    let mut total = 0;
    while encoder.has_remaining() {
        let n = encoder.encode(sink);
        total += n;
        if n == 0 {
            break;
        }
    }
    total
}

/// Drives `decoder` against `source` until it reports no remaining work, then finalizes it.
#[cfg(feature = "alloc")]
pub fn decode_all(
    mut decoder: Box<dyn Decoder>,
    source: &mut dyn Source,
) -> Result<Value, DecoderError> {
    while decoder.has_remaining() {
        let n = decoder.decode(source);
        if n == 0 {
            break;
        }
    }
    decoder.get()
}
