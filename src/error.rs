use core::fmt;

/// A structured error kind identifying why encoding or decoding failed.
///
/// This enum is intentionally stable and string-free so error handling stays
/// hot-path friendly; [`CborError`] pairs a kind with the byte offset at which
/// the condition was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Input contains bytes after the single top-level CBOR item.
    TrailingBytes,
    /// Reserved additional-info value (28..=30) was used.
    ReservedAdditionalInfo,
    /// Indefinite-length encoding (or a break) where it is not permitted.
    IndefiniteNotAllowed,
    /// Chunk inside an indefinite-length string has the wrong type.
    IndefiniteChunkTypeMismatch,
    /// A break byte appeared outside an indefinite-length item.
    StrayBreak,
    /// Nesting depth limit exceeded.
    MaxDepthExceeded,
    /// Arithmetic overflow while computing a length or offset.
    LengthOverflow,

    /// Invalid UTF-8 in a text string.
    InvalidUtf8,
    /// A CBOR simple value outside {false, true, null, undefined}.
    UnassignedSimpleValue,
    /// A tag number with no registered decoder.
    UnknownTag,
    /// Map key is not a text string.
    NonStringMapKey,
    /// Duplicate map key detected.
    DuplicateMapKey,

    /// Non-canonical (non-shortest) argument or float encoding was used.
    NonCanonicalEncoding,
    /// Map keys are not in canonical order.
    MapKeysOutOfOrder,
    /// Integer outside the signed 64-bit range while big integers are disabled.
    IntOutOfRange,
    /// The `undefined` value while it is disabled.
    UndefinedNotAllowed,

    /// A big integer too large for major type 0/1 and no tag encoder registered.
    BigIntRequiresTag,
}

/// An encode or decode error with a stable kind and a byte offset.
///
/// For decode errors the offset refers to the input byte position where the
/// condition was detected; for encode errors it refers to the output-buffer
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error kind.
    pub kind: ErrorKind,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ErrorKind::UnexpectedEof => "unexpected end of input",
            ErrorKind::TrailingBytes => "trailing bytes after single CBOR item",
            ErrorKind::ReservedAdditionalInfo => "reserved additional info value",
            ErrorKind::IndefiniteNotAllowed => "indefinite length not allowed",
            ErrorKind::IndefiniteChunkTypeMismatch => {
                "indefinite-length string chunk has mismatched type"
            }
            ErrorKind::StrayBreak => "break outside indefinite-length item",
            ErrorKind::MaxDepthExceeded => "nesting depth limit exceeded",
            ErrorKind::LengthOverflow => "length overflow",

            ErrorKind::InvalidUtf8 => "text must be valid UTF-8",
            ErrorKind::UnassignedSimpleValue => "unassigned simple value",
            ErrorKind::UnknownTag => "no decoder registered for tag",
            ErrorKind::NonStringMapKey => "map keys must be text strings",
            ErrorKind::DuplicateMapKey => "duplicate map key",

            ErrorKind::NonCanonicalEncoding => "non-canonical encoding",
            ErrorKind::MapKeysOutOfOrder => "map keys out of canonical order",
            ErrorKind::IntOutOfRange => "integer outside signed 64-bit range",
            ErrorKind::UndefinedNotAllowed => "undefined value not allowed",

            ErrorKind::BigIntRequiresTag => {
                "big integer outside major-type range requires a tag encoder"
            }
        };

        write!(f, "cbor error at {}: {msg}", self.offset)
    }
}

impl std::error::Error for CborError {}
