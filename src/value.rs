use crate::{CborError, ErrorKind};

/// A big integer as sign plus canonical big-endian magnitude bytes.
///
/// The magnitude is the CBOR tag-2/3 content: for a non-negative big integer
/// the value is `+m`; for a negative one the value is `-1 - m`. The magnitude
/// must be non-empty with no leading zero byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInt {
    negative: bool,
    magnitude: Vec<u8>,
}

impl BigInt {
    /// Construct a `BigInt` from sign and big-endian magnitude bytes.
    ///
    /// # Errors
    ///
    /// Returns `NonCanonicalEncoding` if the magnitude is empty or has a
    /// leading zero byte.
    pub fn new(negative: bool, magnitude: Vec<u8>) -> Result<Self, CborError> {
        if magnitude.is_empty() || magnitude[0] == 0 {
            return Err(CborError::new(ErrorKind::NonCanonicalEncoding, 0));
        }
        Ok(Self {
            negative,
            magnitude,
        })
    }

    /// Construct from a non-zero `u128` magnitude, stripping leading zeros.
    #[must_use]
    pub fn from_u128(negative: bool, magnitude: u128) -> Option<Self> {
        if magnitude == 0 {
            return None;
        }
        let raw = magnitude.to_be_bytes();
        let lead = (magnitude.leading_zeros() / 8) as usize;
        Some(Self {
            negative,
            magnitude: raw[lead..].to_vec(),
        })
    }

    pub(crate) fn from_arg(negative: bool, arg: u64) -> Self {
        debug_assert!(arg > 0);
        let raw = arg.to_be_bytes();
        let lead = (arg.leading_zeros() / 8) as usize;
        Self {
            negative,
            magnitude: raw[lead..].to_vec(),
        }
    }

    /// Sign flag: `true` if the value is negative (`-1 - m`).
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// The canonical big-endian magnitude bytes.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    /// The value as an `i128`, when the magnitude fits.
    #[must_use]
    pub fn to_i128(&self) -> Option<i128> {
        if self.magnitude.len() > 15 {
            return None;
        }
        let mut m: i128 = 0;
        for &b in &self.magnitude {
            m = (m << 8) | i128::from(b);
        }
        Some(if self.negative { -1 - m } else { m })
    }

    /// The (major type, argument) pair when the value fits major type 0/1.
    pub(crate) fn as_major_arg(&self) -> Option<(u8, u64)> {
        if self.magnitude.len() > 8 {
            return None;
        }
        let mut m: u64 = 0;
        for &b in &self.magnitude {
            m = (m << 8) | u64::from(b);
        }
        if self.negative {
            Some((1, m))
        } else {
            Some((0, m))
        }
    }
}

/// A CBOR map as insertion-ordered key/value entries.
///
/// Decoding preserves the original entry order; encoding re-sorts entries
/// into canonical key order, so no side index is kept. Equality compares the
/// key/value associations without regard to entry order, matching the
/// encoder's view of structural equality.
#[derive(Debug, Clone, Default)]
pub struct CborMap {
    entries: Vec<(Value, Value)>,
}

impl PartialEq for CborMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k) == Some(v))
    }
}

impl CborMap {
    /// Construct an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap an existing vector of entries, preserving its order.
    #[must_use]
    pub fn from_entries(entries: Vec<(Value, Value)>) -> Self {
        Self { entries }
    }

    /// Insert an entry, replacing the value of a structurally equal key.
    pub fn insert(&mut self, key: Value, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a value by structural key equality.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value by text key.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
            .map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` iff the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    /// Consume and return the entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

impl FromIterator<(Value, Value)> for CborMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for CborMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A logical CBOR value.
///
/// Integers outside the signed 64-bit range are carried as [`BigInt`];
/// everything else maps one-to-one onto the CBOR data model subset this
/// crate supports.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed 64-bit integer (major type 0 or 1).
    Int(i64),
    /// An integer outside the signed 64-bit range.
    BigInt(BigInt),
    /// An IEEE-754 binary64 number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// The null value.
    Null,
    /// The undefined value.
    Undefined,
    /// A byte string.
    Bytes(Vec<u8>),
    /// A UTF-8 text string.
    Text(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A mapping from values to values.
    Map(CborMap),
    /// A tagged value: tag number plus inner item.
    Tag(u64, Box<Value>),
}

impl Value {
    /// Construct a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Construct a byte-string value.
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Construct a tagged value.
    #[must_use]
    pub fn tag(number: u64, inner: Self) -> Self {
        Self::Tag(number, Box::new(inner))
    }

    /// The integer value, if this is an in-range integer.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The float value, if this is a float.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean value, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The text content, if this is a text string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The byte-string content, if this is a byte string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The map, if this is a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&CborMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns `true` iff this is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` iff this is undefined.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or_else(|_| Self::BigInt(BigInt::from_arg(false, v)), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<CborMap> for Value {
    fn from(v: CborMap) -> Self {
        Self::Map(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Self::BigInt(v)
    }
}
