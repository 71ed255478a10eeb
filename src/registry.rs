use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::token::Token;
use crate::value::{BigInt, Value};
use crate::{CborError, ErrorKind};

/// The closed set of logical type names used for encoder dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    /// Non-negative integer.
    Uint,
    /// Negative integer.
    NegInt,
    /// Floating-point number.
    Float,
    /// Integer outside the signed 64-bit range.
    BigInt,
    /// Boolean.
    Bool,
    /// Null.
    Null,
    /// Undefined.
    Undefined,
    /// Byte string.
    Bytes,
    /// Text string.
    String,
    /// Array.
    Array,
    /// Map.
    Map,
    /// Tagged value.
    Tag,
}

const LOGICAL_TYPE_COUNT: usize = 12;

impl LogicalType {
    /// Classify a value. The classifier is fixed: it always returns the same
    /// name for structurally equal values.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Int(v) => {
                if *v >= 0 {
                    Self::Uint
                } else {
                    Self::NegInt
                }
            }
            Value::BigInt(_) => Self::BigInt,
            Value::Float(_) => Self::Float,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
            Value::Undefined => Self::Undefined,
            Value::Bytes(_) => Self::Bytes,
            Value::Text(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Map(_) => Self::Map,
            Value::Tag(..) => Self::Tag,
        }
    }

    /// The logical type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uint => "uint",
            Self::NegInt => "negint",
            Self::Float => "float",
            Self::BigInt => "bigint",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Uint => 0,
            Self::NegInt => 1,
            Self::Float => 2,
            Self::BigInt => 3,
            Self::Bool => 4,
            Self::Null => 5,
            Self::Undefined => 6,
            Self::Bytes => 7,
            Self::String => 8,
            Self::Array => 9,
            Self::Map => 10,
            Self::Tag => 11,
        }
    }
}

/// A user-supplied encoder for one logical type.
///
/// Returning `Some(tokens)` emits exactly those tokens; returning `None`
/// defers to the default emitter. An empty token list omits the value
/// entirely — the caller is then responsible for keeping any surrounding
/// container count consistent.
pub type TypeEncoderFn =
    Box<dyn Fn(&Value) -> Result<Option<Vec<Token<'static>>>, CborError> + Send + Sync>;

/// Encoder-side dispatch registry, keyed by [`LogicalType`].
pub struct TypeEncoders {
    slots: [Option<TypeEncoderFn>; LOGICAL_TYPE_COUNT],
}

impl Default for TypeEncoders {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl TypeEncoders {
    /// Construct an empty registry: every type uses the default emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encoder for `ty`, replacing any previous one.
    pub fn register<F>(&mut self, ty: LogicalType, encoder: F)
    where
        F: Fn(&Value) -> Result<Option<Vec<Token<'static>>>, CborError> + Send + Sync + 'static,
    {
        self.slots[ty.index()] = Some(Box::new(encoder));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, ty: LogicalType, encoder: F) -> Self
    where
        F: Fn(&Value) -> Result<Option<Vec<Token<'static>>>, CborError> + Send + Sync + 'static,
    {
        self.register(ty, encoder);
        self
    }

    /// Registry that encodes out-of-range big integers as tag 2/3 bignums
    /// with their canonical byte-string magnitude. In-range big integers
    /// defer to the default major-type-0/1 emitter.
    #[must_use]
    pub fn with_bignum_tags() -> Self {
        Self::new().with(LogicalType::BigInt, |value| {
            let Value::BigInt(big) = value else {
                return Ok(None);
            };
            if big.as_major_arg().is_some() {
                return Ok(None);
            }
            let tag = if big.is_negative() { 3 } else { 2 };
            Ok(Some(vec![
                Token::Tag(tag),
                Token::Bytes(Cow::Owned(big.magnitude().to_vec())),
            ]))
        })
    }

    pub(crate) fn get(&self, ty: LogicalType) -> Option<&TypeEncoderFn> {
        self.slots[ty.index()].as_ref()
    }
}

impl fmt::Debug for TypeEncoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for ty in ALL_LOGICAL_TYPES {
            if self.slots[ty.index()].is_some() {
                list.entry(&ty.name());
            }
        }
        list.finish()
    }
}

const ALL_LOGICAL_TYPES: [LogicalType; LOGICAL_TYPE_COUNT] = [
    LogicalType::Uint,
    LogicalType::NegInt,
    LogicalType::Float,
    LogicalType::BigInt,
    LogicalType::Bool,
    LogicalType::Null,
    LogicalType::Undefined,
    LogicalType::Bytes,
    LogicalType::String,
    LogicalType::Array,
    LogicalType::Map,
    LogicalType::Tag,
];

/// A user-supplied decoder for one tag number, called with the already
/// decoded inner value.
pub type TagDecoderFn = Box<dyn Fn(Value) -> Result<Value, CborError> + Send + Sync>;

/// Decoder-side tag dispatch table. Tags without an entry fail with
/// [`ErrorKind::UnknownTag`].
#[derive(Default)]
pub struct TagRegistry {
    decoders: BTreeMap<u64, TagDecoderFn>,
}

impl TagRegistry {
    /// Construct an empty table: every tag is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder for `tag`, replacing any previous one.
    pub fn register<F>(&mut self, tag: u64, decoder: F)
    where
        F: Fn(Value) -> Result<Value, CborError> + Send + Sync + 'static,
    {
        self.decoders.insert(tag, Box::new(decoder));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, tag: u64, decoder: F) -> Self
    where
        F: Fn(Value) -> Result<Value, CborError> + Send + Sync + 'static,
    {
        self.register(tag, decoder);
        self
    }

    /// Table with decoders for tags 2 and 3 producing [`Value::BigInt`].
    ///
    /// The tag content must be a byte string holding a canonical magnitude
    /// (non-empty, no leading zero); anything else fails with
    /// `NonCanonicalEncoding`.
    #[must_use]
    pub fn with_bignums() -> Self {
        Self::new()
            .with(2, |inner| bignum_from_tag(false, inner))
            .with(3, |inner| bignum_from_tag(true, inner))
    }

    /// Returns `true` iff a decoder is registered for `tag`.
    #[must_use]
    pub fn contains(&self, tag: u64) -> bool {
        self.decoders.contains_key(&tag)
    }

    pub(crate) fn get(&self, tag: u64) -> Option<&TagDecoderFn> {
        self.decoders.get(&tag)
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.decoders.keys()).finish()
    }
}

fn bignum_from_tag(negative: bool, inner: Value) -> Result<Value, CborError> {
    match inner {
        Value::Bytes(magnitude) => Ok(Value::BigInt(BigInt::new(negative, magnitude)?)),
        _ => Err(CborError::new(ErrorKind::NonCanonicalEncoding, 0)),
    }
}
