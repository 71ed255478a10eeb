use half::f16;

use crate::wire::Writer;
use crate::{CborError, ErrorKind};

/// Canonical NaN as half-precision bits (the only NaN encoding emitted).
pub(crate) const CANONICAL_NAN_F16: u16 = 0x7e00;

/// The f64 bit pattern the canonical f16 NaN widens to.
pub(crate) const CANONICAL_NAN_F64_BITS: u64 = 0x7ff8_0000_0000_0000;

const NEGATIVE_ZERO_F64_BITS: u64 = 0x8000_0000_0000_0000;

/// The smallest float width that reproduces `x` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FloatWidth {
    F16,
    F32,
    F64,
}

/// Select the smallest of {f16, f32, f64} whose round-trip through f64 is
/// bit-exact. `x` must not be NaN; NaN canonicalization happens before width
/// selection.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn minimal_width(x: f64) -> FloatWidth {
    debug_assert!(!x.is_nan());
    let bits = x.to_bits();
    if f64::from(f16::from_f64(x)).to_bits() == bits {
        return FloatWidth::F16;
    }
    if f64::from(x as f32).to_bits() == bits {
        return FloatWidth::F32;
    }
    FloatWidth::F64
}

/// Return `x` as an `i64` when it is an integer-valued finite float in the
/// signed 64-bit range. Negative zero is excluded so its sign survives a
/// round-trip.
pub(crate) fn integral_to_i64(x: f64) -> Option<i64> {
    if !x.is_finite() || x.fract() != 0.0 || x.to_bits() == NEGATIVE_ZERO_F64_BITS {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let wide = x as i128;
    i64::try_from(wide).ok()
}

/// Emit `x` as a major-7 float, minimized unless `float64` is set.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn write_float(w: &mut Writer, x: f64, float64: bool) {
    if float64 {
        let bits = if x.is_nan() { CANONICAL_NAN_F64_BITS } else { x.to_bits() };
        w.write_byte(0xfb);
        w.write_be_u64(bits);
        return;
    }
    if x.is_nan() {
        w.write_byte(0xf9);
        w.write_be_u16(CANONICAL_NAN_F16);
        return;
    }
    match minimal_width(x) {
        FloatWidth::F16 => {
            w.write_byte(0xf9);
            w.write_be_u16(f16::from_f64(x).to_bits());
        }
        FloatWidth::F32 => {
            w.write_byte(0xfa);
            w.write_be_u32((x as f32).to_bits());
        }
        FloatWidth::F64 => {
            w.write_byte(0xfb);
            w.write_be_u64(x.to_bits());
        }
    }
}

/// Strict-mode canonicality check for a decoded float.
///
/// `ai` is the additional-info field of the initial byte (25/26/27). A float
/// is canonical iff it is the canonical f16 NaN, or a non-integral value
/// carried at its minimal width. Integer-valued floats in the signed 64-bit
/// range are rejected since the encoder normalizes them to integers.
pub(crate) fn strict_check(ai: u8, x: f64, off: usize) -> Result<(), CborError> {
    if x.is_nan() {
        if ai == 25 && x.to_bits() == CANONICAL_NAN_F64_BITS {
            return Ok(());
        }
        return Err(CborError::new(ErrorKind::NonCanonicalEncoding, off));
    }
    if integral_to_i64(x).is_some() {
        return Err(CborError::new(ErrorKind::NonCanonicalEncoding, off));
    }
    let want = match minimal_width(x) {
        FloatWidth::F16 => 25,
        FloatWidth::F32 => 26,
        FloatWidth::F64 => 27,
    };
    if ai == want {
        Ok(())
    } else {
        Err(CborError::new(ErrorKind::NonCanonicalEncoding, off))
    }
}
