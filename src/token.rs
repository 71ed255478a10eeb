use std::borrow::Cow;

use crate::float;
use crate::jump::read_token;
use crate::wire::{Reader, Writer};
use crate::{CborError, ErrorKind};

/// The neutral type of a [`Token`], spanning all CBOR entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Unsigned integer (major type 0).
    Uint,
    /// Negative integer (major type 1).
    NegInt,
    /// Byte string (major type 2).
    Bytes,
    /// Text string (major type 3).
    Text,
    /// Array (major type 4).
    Array,
    /// Map (major type 5).
    Map,
    /// Tag (major type 6).
    Tag,
    /// Floating-point number (major type 7).
    Float,
    /// The simple value `false`.
    False,
    /// The simple value `true`.
    True,
    /// The simple value `null`.
    Null,
    /// The simple value `undefined`.
    Undefined,
    /// The break sentinel terminating an indefinite-length item.
    Break,
}

/// A single CBOR token: the neutral intermediate representation bridging the
/// binary layout and the logical value model.
///
/// The `Indefinite*` variants mark the start of indefinite-length items and
/// appear only on the decode path; their [`TokenType`] is that of the item
/// they start.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// An unsigned integer.
    Uint(u64),
    /// A negative integer, carried as its logical value in `-(2^64)..=-1`.
    NegInt(i128),
    /// A byte string.
    Bytes(Cow<'a, [u8]>),
    /// A text string of validated UTF-8.
    Text(Cow<'a, str>),
    /// An array header with its element count.
    Array(u64),
    /// A map header with its entry (pair) count.
    Map(u64),
    /// A tag header with its tag number.
    Tag(u64),
    /// A floating-point number.
    Float(f64),
    /// The simple value `false`.
    False,
    /// The simple value `true`.
    True,
    /// The simple value `null`.
    Null,
    /// The simple value `undefined`.
    Undefined,
    /// The break sentinel.
    Break,
    /// Start of an indefinite-length byte string.
    IndefiniteBytes,
    /// Start of an indefinite-length text string.
    IndefiniteText,
    /// Start of an indefinite-length array.
    IndefiniteArray,
    /// Start of an indefinite-length map.
    IndefiniteMap,
}

impl Token<'_> {
    /// The neutral type of this token.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        match self {
            Self::Uint(_) => TokenType::Uint,
            Self::NegInt(_) => TokenType::NegInt,
            Self::Bytes(_) | Self::IndefiniteBytes => TokenType::Bytes,
            Self::Text(_) | Self::IndefiniteText => TokenType::Text,
            Self::Array(_) | Self::IndefiniteArray => TokenType::Array,
            Self::Map(_) | Self::IndefiniteMap => TokenType::Map,
            Self::Tag(_) => TokenType::Tag,
            Self::Float(_) => TokenType::Float,
            Self::False => TokenType::False,
            Self::True => TokenType::True,
            Self::Null => TokenType::Null,
            Self::Undefined => TokenType::Undefined,
            Self::Break => TokenType::Break,
        }
    }

    /// Copy any borrowed payload, detaching the token from its input buffer.
    #[must_use]
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Self::Uint(v) => Token::Uint(v),
            Self::NegInt(v) => Token::NegInt(v),
            Self::Bytes(b) => Token::Bytes(Cow::Owned(b.into_owned())),
            Self::Text(s) => Token::Text(Cow::Owned(s.into_owned())),
            Self::Array(n) => Token::Array(n),
            Self::Map(n) => Token::Map(n),
            Self::Tag(n) => Token::Tag(n),
            Self::Float(x) => Token::Float(x),
            Self::False => Token::False,
            Self::True => Token::True,
            Self::Null => Token::Null,
            Self::Undefined => Token::Undefined,
            Self::Break => Token::Break,
            Self::IndefiniteBytes => Token::IndefiniteBytes,
            Self::IndefiniteText => Token::IndefiniteText,
            Self::IndefiniteArray => Token::IndefiniteArray,
            Self::IndefiniteMap => Token::IndefiniteMap,
        }
    }

    /// Serialize this token in canonical form.
    ///
    /// Arguments use their smallest encoding and floats their smallest exact
    /// width (f64 when `float64` is set). Indefinite-length starts and breaks
    /// are rejected: the encode path emits definite lengths only.
    pub(crate) fn write(&self, w: &mut Writer, float64: bool) -> Result<(), CborError> {
        match self {
            Self::Uint(v) => w.write_argument(0, *v),
            Self::NegInt(v) => {
                let arg = checked_negint_arg(*v, w.position())?;
                w.write_argument(1, arg);
            }
            Self::Bytes(b) => {
                let len = checked_len(b.len(), w.position())?;
                w.write_argument(2, len);
                w.write_slice(b);
            }
            Self::Text(s) => {
                let len = checked_len(s.len(), w.position())?;
                w.write_argument(3, len);
                w.write_slice(s.as_bytes());
            }
            Self::Array(n) => w.write_argument(4, *n),
            Self::Map(n) => w.write_argument(5, *n),
            Self::Tag(n) => w.write_argument(6, *n),
            Self::Float(x) => float::write_float(w, *x, float64),
            Self::False => w.write_byte(0xf4),
            Self::True => w.write_byte(0xf5),
            Self::Null => w.write_byte(0xf6),
            Self::Undefined => w.write_byte(0xf7),
            Self::Break
            | Self::IndefiniteBytes
            | Self::IndefiniteText
            | Self::IndefiniteArray
            | Self::IndefiniteMap => {
                return Err(CborError::new(
                    ErrorKind::IndefiniteNotAllowed,
                    w.position(),
                ));
            }
        }
        Ok(())
    }
}

fn checked_negint_arg(v: i128, off: usize) -> Result<u64, CborError> {
    if v >= 0 {
        return Err(CborError::new(ErrorKind::IntOutOfRange, off));
    }
    u64::try_from(-1 - v).map_err(|_| CborError::new(ErrorKind::IntOutOfRange, off))
}

fn checked_len(len: usize, off: usize) -> Result<u64, CborError> {
    u64::try_from(len).map_err(|_| CborError::new(ErrorKind::LengthOverflow, off))
}

/// A streaming tokenizer over a CBOR byte slice.
///
/// Yields one [`Token`] per CBOR entity; string payloads borrow from the
/// input. The iterator is fused after the first error.
pub struct Tokenizer<'a> {
    reader: Reader<'a>,
    failed: bool,
}

impl Tokenizer<'_> {
    /// Byte offset of the next token.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.reader.position()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, CborError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.remaining() == 0 {
            return None;
        }
        let item = read_token(&mut self.reader);
        self.failed = item.is_err();
        Some(item)
    }
}

/// Tokenize `bytes` into a stream of CBOR tokens.
///
/// This is the lower-level counterpart of [`decode`](crate::decode): no
/// strictness, nesting, or option handling is applied, and any number of
/// top-level items may follow one another.
#[must_use]
pub fn tokenize(bytes: &[u8]) -> Tokenizer<'_> {
    Tokenizer {
        reader: Reader::new(bytes),
        failed: false,
    }
}

/// Serialize a stream of tokens to canonical CBOR bytes.
///
/// The inverse of [`tokenize`] for definite-length input: every argument is
/// written in smallest form and floats at their smallest exact width.
/// No structural validation is performed; callers are responsible for
/// emitting well-formed item sequences.
///
/// # Errors
///
/// Returns an error on indefinite-length or break tokens, negative-integer
/// tokens outside `-(2^64)..=-1`, or oversized payload lengths.
pub fn serialize<'a, I>(tokens: I) -> Result<Vec<u8>, CborError>
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut w = Writer::new();
    for token in tokens {
        token.write(&mut w, false)?;
    }
    Ok(w.into_vec())
}
