use crate::float;
use crate::order::{cmp_encoded_keys, KeyOrder};
use crate::registry::{LogicalType, TypeEncoders};
use crate::value::Value;
use crate::wire::Writer;
use crate::{CborError, ErrorKind, DEFAULT_MAX_DEPTH};

/// Options controlling the deterministic encoder.
pub struct EncodeOptions {
    /// Skip float width minimization and always emit 64-bit floats.
    /// Integer-valued floats still normalize to integers.
    pub float64: bool,
    /// Comparator used to sort encoded map keys.
    pub key_order: KeyOrder,
    /// Maximum container nesting depth.
    pub max_depth: usize,
    /// Per-logical-type encoder overrides.
    pub type_encoders: TypeEncoders,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            float64: false,
            key_order: KeyOrder::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            type_encoders: TypeEncoders::new(),
        }
    }
}

/// Encode a value to canonical CBOR bytes under default options.
///
/// The output is byte-identical for structurally equal values: integer and
/// length arguments use their smallest form, floats their smallest exact
/// width, and map entries are sorted by encoded key bytes.
///
/// # Errors
///
/// Returns an error if nesting exceeds the depth limit, a map contains
/// duplicate keys after encoding, or a big integer cannot be represented
/// without a tag encoder.
pub fn encode(value: &Value) -> Result<Vec<u8>, CborError> {
    encode_with(value, &EncodeOptions::default())
}

/// Encode a value to canonical CBOR bytes.
///
/// # Errors
///
/// See [`encode`]; type encoders may additionally fail with their own errors.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, CborError> {
    let mut w = Writer::new();
    encode_value(&mut w, value, options, 0)?;
    Ok(w.into_vec())
}

fn encode_value(
    w: &mut Writer,
    value: &Value,
    options: &EncodeOptions,
    depth: usize,
) -> Result<(), CborError> {
    if let Some(encoder) = options.type_encoders.get(LogicalType::of(value)) {
        if let Some(tokens) = encoder(value)? {
            for token in &tokens {
                token.write(w, options.float64)?;
            }
            return Ok(());
        }
    }

    match value {
        Value::Int(v) => encode_int(w, *v),
        Value::BigInt(big) => match big.as_major_arg() {
            Some((major, arg)) => w.write_argument(major, arg),
            None => return Err(CborError::new(ErrorKind::BigIntRequiresTag, w.position())),
        },
        Value::Float(x) => match float::integral_to_i64(*x) {
            Some(v) => encode_int(w, v),
            None => float::write_float(w, *x, options.float64),
        },
        Value::Bool(v) => w.write_byte(if *v { 0xf5 } else { 0xf4 }),
        Value::Null => w.write_byte(0xf6),
        Value::Undefined => w.write_byte(0xf7),
        Value::Bytes(b) => {
            let len = checked_len(b.len(), w.position())?;
            w.write_argument(2, len);
            w.write_slice(b);
        }
        Value::Text(s) => {
            let len = checked_len(s.len(), w.position())?;
            w.write_argument(3, len);
            w.write_slice(s.as_bytes());
        }
        Value::Array(items) => {
            ensure_depth(depth, options.max_depth, w.position())?;
            let len = checked_len(items.len(), w.position())?;
            w.write_argument(4, len);
            for item in items {
                encode_value(w, item, options, depth + 1)?;
            }
        }
        Value::Map(map) => {
            ensure_depth(depth, options.max_depth, w.position())?;
            encode_map(w, map, options, depth)?;
        }
        Value::Tag(number, inner) => {
            ensure_depth(depth, options.max_depth, w.position())?;
            w.write_argument(6, *number);
            encode_value(w, inner, options, depth + 1)?;
        }
    }
    Ok(())
}

fn encode_int(w: &mut Writer, v: i64) {
    if v >= 0 {
        #[allow(clippy::cast_sign_loss)]
        w.write_argument(0, v as u64);
    } else {
        #[allow(clippy::cast_sign_loss)]
        w.write_argument(1, (-1 - v) as u64);
    }
}

// Keys are encoded into scratch buffers first so entries can be sorted by
// their encoded bytes; values are only encoded once the order is fixed.
fn encode_map(
    w: &mut Writer,
    map: &crate::value::CborMap,
    options: &EncodeOptions,
    depth: usize,
) -> Result<(), CborError> {
    let mut entries: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(map.len());
    for (key, value) in map.iter() {
        let mut kw = Writer::new();
        encode_value(&mut kw, key, options, depth + 1)?;
        entries.push((kw.into_vec(), value));
    }
    entries.sort_by(|a, b| cmp_encoded_keys(options.key_order, &a.0, &b.0));
    for pair in entries.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(CborError::new(ErrorKind::DuplicateMapKey, w.position()));
        }
    }

    let len = checked_len(entries.len(), w.position())?;
    w.write_argument(5, len);
    for (key_bytes, value) in entries {
        w.write_slice(&key_bytes);
        encode_value(w, value, options, depth + 1)?;
    }
    Ok(())
}

fn ensure_depth(depth: usize, max_depth: usize, off: usize) -> Result<(), CborError> {
    if depth >= max_depth {
        return Err(CborError::new(ErrorKind::MaxDepthExceeded, off));
    }
    Ok(())
}

fn checked_len(len: usize, off: usize) -> Result<u64, CborError> {
    u64::try_from(len).map_err(|_| CborError::new(ErrorKind::LengthOverflow, off))
}
