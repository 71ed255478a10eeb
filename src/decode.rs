use crate::float;
use crate::jump::read_token;
use crate::order::{is_strictly_ascending, KeyOrder};
use crate::registry::TagRegistry;
use crate::token::Token;
use crate::value::{BigInt, CborMap, Value};
use crate::wire::Reader;
use crate::{CborError, ErrorKind, DEFAULT_MAX_DEPTH};

// Cap on speculative container preallocation so a short input cannot demand
// an arbitrarily large buffer up front.
const PREALLOC_LIMIT: usize = 4096;

/// Options controlling the strict decoder.
pub struct DecodeOptions {
    /// Permit indefinite-length items. When `false`, any additional-info 31
    /// (including a break) fails with `IndefiniteNotAllowed`.
    pub allow_indefinite: bool,
    /// Permit the `undefined` value.
    pub allow_undefined: bool,
    /// Permit integers outside the signed 64-bit range, decoded as
    /// [`Value::BigInt`]. When `false` they fail with `IntOutOfRange`.
    pub allow_bigint: bool,
    /// Require canonical input: smallest-form arguments, ascending map keys,
    /// and canonical floats.
    pub strict: bool,
    /// Permit non-text map keys. When `false`, a non-text key fails with
    /// `NonStringMapKey`. Decoded maps preserve entry order either way.
    pub use_maps: bool,
    /// Reject repeated keys (by encoded bytes) within one map.
    pub reject_duplicate_map_keys: bool,
    /// Maximum container nesting depth.
    pub max_depth: usize,
    /// Comparator used by the strict map-order check.
    pub key_order: KeyOrder,
    /// Tag dispatch table. Tags without an entry fail with `UnknownTag`.
    pub tags: TagRegistry,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            allow_indefinite: true,
            allow_undefined: true,
            allow_bigint: true,
            strict: false,
            use_maps: false,
            reject_duplicate_map_keys: true,
            max_depth: DEFAULT_MAX_DEPTH,
            key_order: KeyOrder::default(),
            tags: TagRegistry::new(),
        }
    }
}

impl DecodeOptions {
    /// Options for validating canonical input: `strict` with indefinite
    /// lengths forbidden.
    ///
    /// `use_maps` is enabled: key-type policy is an application concern,
    /// and the encoder emits non-text map keys in canonical form.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            allow_indefinite: false,
            strict: true,
            use_maps: true,
            ..Self::default()
        }
    }
}

/// Decode exactly one CBOR item under default options.
///
/// # Errors
///
/// Returns an error if the input is not a single well-formed CBOR item
/// within the supported subset, with the byte offset where the condition
/// was detected.
pub fn decode(bytes: &[u8]) -> Result<Value, CborError> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode exactly one CBOR item.
///
/// # Errors
///
/// See [`decode`]; stricter options surface additional failures
/// (`NonCanonicalEncoding`, `MapKeysOutOfOrder`, `IntOutOfRange`,
/// `UndefinedNotAllowed`, `IndefiniteNotAllowed`).
pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> Result<Value, CborError> {
    let mut d = Decoder {
        reader: Reader::new(bytes),
        options,
    };
    let value = d.next_value(0)?;
    if d.reader.remaining() != 0 {
        return Err(CborError::new(
            ErrorKind::TrailingBytes,
            d.reader.position(),
        ));
    }
    Ok(value)
}

struct Decoder<'a, 'o> {
    reader: Reader<'a>,
    options: &'o DecodeOptions,
}

impl<'a, 'o> Decoder<'a, 'o> {
    fn next_token(&mut self) -> Result<(usize, Token<'a>), CborError> {
        let off = self.reader.position();
        let ib = self.reader.peek_byte()?;
        let token = read_token(&mut self.reader)?;
        if !self.options.allow_indefinite
            && matches!(
                token,
                Token::Break
                    | Token::IndefiniteBytes
                    | Token::IndefiniteText
                    | Token::IndefiniteArray
                    | Token::IndefiniteMap
            )
        {
            return Err(CborError::new(ErrorKind::IndefiniteNotAllowed, off));
        }
        if self.options.strict {
            strict_check(ib, &token, off)?;
        }
        Ok((off, token))
    }

    fn next_value(&mut self, depth: usize) -> Result<Value, CborError> {
        let (off, token) = self.next_token()?;
        self.value_from(token, off, depth)
    }

    #[allow(clippy::too_many_lines)]
    fn value_from(&mut self, token: Token<'a>, off: usize, depth: usize) -> Result<Value, CborError> {
        match token {
            Token::Uint(v) => {
                if let Ok(i) = i64::try_from(v) {
                    return Ok(Value::Int(i));
                }
                if self.options.allow_bigint {
                    Ok(Value::BigInt(BigInt::from_arg(false, v)))
                } else {
                    Err(CborError::new(ErrorKind::IntOutOfRange, off))
                }
            }
            Token::NegInt(v) => {
                if let Ok(i) = i64::try_from(v) {
                    return Ok(Value::Int(i));
                }
                if self.options.allow_bigint {
                    let arg = u64::try_from(-1 - v)
                        .map_err(|_| CborError::new(ErrorKind::LengthOverflow, off))?;
                    Ok(Value::BigInt(BigInt::from_arg(true, arg)))
                } else {
                    Err(CborError::new(ErrorKind::IntOutOfRange, off))
                }
            }
            Token::Bytes(b) => Ok(Value::Bytes(b.into_owned())),
            Token::Text(s) => Ok(Value::Text(s.into_owned())),
            Token::Array(n) => {
                self.ensure_depth(depth, off)?;
                let len = checked_len(n, off)?;
                let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    items.push(self.next_value(depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            Token::Map(n) => {
                self.ensure_depth(depth, off)?;
                let len = checked_len(n, off)?;
                self.map_value(Some(len), depth)
            }
            Token::Tag(number) => {
                self.ensure_depth(depth, off)?;
                let inner = self.next_value(depth + 1)?;
                match self.options.tags.get(number) {
                    Some(decoder) => decoder(inner),
                    None => Err(CborError::new(ErrorKind::UnknownTag, off)),
                }
            }
            Token::Float(x) => Ok(Value::Float(x)),
            Token::False => Ok(Value::Bool(false)),
            Token::True => Ok(Value::Bool(true)),
            Token::Null => Ok(Value::Null),
            Token::Undefined => {
                if self.options.allow_undefined {
                    Ok(Value::Undefined)
                } else {
                    Err(CborError::new(ErrorKind::UndefinedNotAllowed, off))
                }
            }
            Token::Break => Err(CborError::new(ErrorKind::StrayBreak, off)),
            Token::IndefiniteBytes => self.chunked_bytes(),
            Token::IndefiniteText => self.chunked_text(),
            Token::IndefiniteArray => {
                self.ensure_depth(depth, off)?;
                let mut items = Vec::new();
                loop {
                    let (item_off, item) = self.next_token()?;
                    if matches!(item, Token::Break) {
                        break;
                    }
                    items.push(self.value_from(item, item_off, depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            Token::IndefiniteMap => {
                self.ensure_depth(depth, off)?;
                self.map_value(None, depth)
            }
        }
    }

    fn chunked_bytes(&mut self) -> Result<Value, CborError> {
        let mut out = Vec::new();
        loop {
            let (chunk_off, chunk) = self.next_token()?;
            match chunk {
                Token::Break => break,
                Token::Bytes(b) => out.extend_from_slice(&b),
                _ => {
                    return Err(CborError::new(
                        ErrorKind::IndefiniteChunkTypeMismatch,
                        chunk_off,
                    ))
                }
            }
        }
        Ok(Value::Bytes(out))
    }

    fn chunked_text(&mut self) -> Result<Value, CborError> {
        let mut out = String::new();
        loop {
            let (chunk_off, chunk) = self.next_token()?;
            match chunk {
                Token::Break => break,
                Token::Text(s) => out.push_str(&s),
                _ => {
                    return Err(CborError::new(
                        ErrorKind::IndefiniteChunkTypeMismatch,
                        chunk_off,
                    ))
                }
            }
        }
        Ok(Value::Text(out))
    }

    // `count` is the entry count for definite maps, or None to read until a
    // break at key position.
    fn map_value(&mut self, count: Option<usize>, depth: usize) -> Result<Value, CborError> {
        let data = self.reader.data();
        let prealloc = count.unwrap_or(0).min(PREALLOC_LIMIT);
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(prealloc);
        let mut key_spans: Vec<(usize, usize)> = Vec::with_capacity(prealloc);

        loop {
            if let Some(n) = count {
                if entries.len() == n {
                    break;
                }
            }
            let (key_off, key_token) = self.next_token()?;
            if count.is_none() && matches!(key_token, Token::Break) {
                break;
            }
            let key = self.value_from(key_token, key_off, depth + 1)?;
            let key_end = self.reader.position();
            let encoded_key = &data[key_off..key_end];

            if !self.options.use_maps && !matches!(key, Value::Text(_)) {
                return Err(CborError::new(ErrorKind::NonStringMapKey, key_off));
            }
            if self.options.reject_duplicate_map_keys {
                for &(s, e) in &key_spans {
                    if &data[s..e] == encoded_key {
                        return Err(CborError::new(ErrorKind::DuplicateMapKey, key_off));
                    }
                }
            }
            if self.options.strict {
                if let Some(&(s, e)) = key_spans.last() {
                    if !is_strictly_ascending(self.options.key_order, &data[s..e], encoded_key) {
                        return Err(CborError::new(ErrorKind::MapKeysOutOfOrder, key_off));
                    }
                }
            }
            key_spans.push((key_off, key_end));

            let value = self.next_value(depth + 1)?;
            entries.push((key, value));
        }
        Ok(Value::Map(CborMap::from_entries(entries)))
    }

    fn ensure_depth(&self, depth: usize, off: usize) -> Result<(), CborError> {
        if depth >= self.options.max_depth {
            return Err(CborError::new(ErrorKind::MaxDepthExceeded, off));
        }
        Ok(())
    }
}

fn checked_len(n: u64, off: usize) -> Result<usize, CborError> {
    usize::try_from(n).map_err(|_| CborError::new(ErrorKind::LengthOverflow, off))
}

fn strict_check(ib: u8, token: &Token<'_>, off: usize) -> Result<(), CborError> {
    let ai = ib & 0x1f;
    let arg = match token {
        Token::Uint(v) => Some(*v),
        Token::NegInt(v) => u64::try_from(-1 - *v).ok(),
        Token::Bytes(b) => u64::try_from(b.len()).ok(),
        Token::Text(s) => u64::try_from(s.len()).ok(),
        Token::Array(n) | Token::Map(n) | Token::Tag(n) => Some(*n),
        Token::Float(x) => return float::strict_check(ai, *x, off),
        _ => None,
    };
    let Some(arg) = arg else { return Ok(()) };
    let minimal = match ai {
        24 => arg >= 24,
        25 => arg > 0xff,
        26 => arg > 0xffff,
        27 => arg > 0xffff_ffff,
        _ => true,
    };
    if minimal {
        Ok(())
    } else {
        Err(CborError::new(ErrorKind::NonCanonicalEncoding, off))
    }
}
