//! Error types raised while constructing or driving codecs.

use core::fmt;

#[cfg(feature = "alloc")]
use alloc::string::String;

/// Raised at codec-construction time: the value handed to `make_encoder` doesn't belong to the
/// codec's domain, or a schema-level invariant was violated.
///
/// This covers the "Construction" error class from the error model: a value not matching any
/// declared union alternative, a missing record field, a value of the wrong type or arity.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderError {
    kind: EncoderErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
enum EncoderErrorKind {
    WrongArity { expected: usize, found: usize },
    MissingField {
        #[cfg(feature = "alloc")]
        name: String,
    },
    NoMatchingVariant,
    WrongShape,
}

impl EncoderError {
    pub(crate) fn wrong_arity(expected: usize, found: usize) -> Self {
        EncoderError {
            kind: EncoderErrorKind::WrongArity { expected, found },
        }
    }

    #[cfg(feature = "alloc")]
    pub(crate) fn missing_field(name: impl Into<String>) -> Self {
        EncoderError {
            kind: EncoderErrorKind::MissingField { name: name.into() },
        }
    }

    pub(crate) fn no_matching_variant() -> Self {
        EncoderError {
            kind: EncoderErrorKind::NoMatchingVariant,
        }
    }

    pub(crate) fn wrong_shape() -> Self {
        EncoderError {
            kind: EncoderErrorKind::WrongShape,
        }
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            EncoderErrorKind::WrongArity { expected, found } => {
                write!(f, "expected {} values, found {}", expected, found)
            }
            #[cfg(feature = "alloc")]
            EncoderErrorKind::MissingField { name } => {
                write!(f, "missing record field `{}`", name)
            }
            #[cfg(not(feature = "alloc"))]
            EncoderErrorKind::MissingField {} => write!(f, "missing record field"),
            EncoderErrorKind::NoMatchingVariant => {
                write!(f, "value does not match any declared union alternative")
            }
            EncoderErrorKind::WrongShape => write!(f, "value has the wrong shape for this codec"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncoderError {}

/// Raised while driving a decoder: the wire bytes observed so far are invalid.
///
/// This covers the "Decode-time" error class: an invalid enum ordinal, an invalid union index,
/// an invalid boolean byte, malformed UTF-8, or a decoder finalized before it was complete.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderError {
    kind: DecoderErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
enum DecoderErrorKind {
    InvalidBoolean(u8),
    InvalidEnumOrdinal { index: usize, arity: usize },
    InvalidUnionIndex { index: usize, arity: usize },
    InvalidUtf8,
    Incomplete { missing: usize },
    InvalidVarint,
}

impl DecoderError {
    pub(crate) fn invalid_boolean(byte: u8) -> Self {
        DecoderError {
            kind: DecoderErrorKind::InvalidBoolean(byte),
        }
    }

    pub(crate) fn invalid_varint() -> Self {
        DecoderError {
            kind: DecoderErrorKind::InvalidVarint,
        }
    }

    pub(crate) fn invalid_enum_ordinal(index: usize, arity: usize) -> Self {
        DecoderError {
            kind: DecoderErrorKind::InvalidEnumOrdinal { index, arity },
        }
    }

    pub(crate) fn invalid_union_index(index: usize, arity: usize) -> Self {
        DecoderError {
            kind: DecoderErrorKind::InvalidUnionIndex { index, arity },
        }
    }

    pub(crate) fn invalid_utf8() -> Self {
        DecoderError {
            kind: DecoderErrorKind::InvalidUtf8,
        }
    }

    pub(crate) fn incomplete(missing: usize) -> Self {
        DecoderError {
            kind: DecoderErrorKind::Incomplete { missing },
        }
    }
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            DecoderErrorKind::InvalidBoolean(byte) => {
                write!(f, "invalid boolean value 0x{:02x}", byte)
            }
            DecoderErrorKind::InvalidEnumOrdinal { index, arity } => {
                write!(f, "invalid enum ordinal {} (only {} members)", index, arity)
            }
            DecoderErrorKind::InvalidUnionIndex { index, arity } => {
                write!(f, "invalid union index {} (only {} alternatives)", index, arity)
            }
            DecoderErrorKind::InvalidUtf8 => write!(f, "supplied bytes are not valid UTF-8"),
            DecoderErrorKind::Incomplete { missing } => {
                let plural = if missing == 1 { " was" } else { "s were" };
                write!(
                    f,
                    "end of stream reached too soon, {} more byte{} required",
                    missing, plural
                )
            }
            DecoderErrorKind::InvalidVarint => write!(
                f,
                "invalid varint: continuation bit still set after the maximum terminator run length"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecoderError {}

/// Raised for argument-validation failures that don't fit the encode/decode split, e.g. a
/// non-positive raw buffer size, or a `Serializable::load` that rejects its field mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueError {
    #[cfg(feature = "alloc")]
    message: String,
}

impl ValueError {
    #[cfg(feature = "alloc")]
    pub fn new(message: impl Into<String>) -> Self {
        ValueError {
            message: message.into(),
        }
    }

    #[cfg(not(feature = "alloc"))]
    pub fn new() -> Self {
        ValueError {}
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[cfg(feature = "alloc")]
        {
            write!(f, "{}", self.message)
        }
        #[cfg(not(feature = "alloc"))]
        {
            write!(f, "invalid value")
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValueError {}
