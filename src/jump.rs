//! Per-initial-byte decode dispatch.
//!
//! A 256-entry table maps each possible initial byte to the handler that
//! reads its argument and payload and constructs the corresponding
//! [`Token`]. The table is a static array of function pointers built at
//! compile time.

use std::borrow::Cow;

use half::f16;

use crate::token::Token;
use crate::utf8;
use crate::wire::Reader;
use crate::{CborError, ErrorKind};

pub(crate) type TokenFn = for<'a> fn(&mut Reader<'a>, u8, usize) -> Result<Token<'a>, CborError>;

static JUMP_TABLE: [TokenFn; 256] = build_table();

/// Read a single token, dispatching on the initial byte.
pub(crate) fn read_token<'a>(reader: &mut Reader<'a>) -> Result<Token<'a>, CborError> {
    let off = reader.position();
    let ib = reader.read_byte()?;
    JUMP_TABLE[ib as usize](reader, ib, off)
}

const fn build_table() -> [TokenFn; 256] {
    let mut table = [reserved as TokenFn; 256];
    let mut ib = 0usize;
    while ib < 256 {
        #[allow(clippy::cast_possible_truncation)]
        {
            table[ib] = entry_for(ib as u8);
        }
        ib += 1;
    }
    table
}

const fn entry_for(ib: u8) -> TokenFn {
    let major = ib >> 5;
    let ai = ib & 0x1f;
    if matches!(ai, 28..=30) {
        return reserved;
    }
    let entry: TokenFn = match major {
        0 => {
            if ai == 31 {
                invalid_indefinite
            } else {
                uint
            }
        }
        1 => {
            if ai == 31 {
                invalid_indefinite
            } else {
                negint
            }
        }
        2 => {
            if ai == 31 {
                indefinite_bytes
            } else {
                bytes
            }
        }
        3 => {
            if ai == 31 {
                indefinite_text
            } else {
                text
            }
        }
        4 => {
            if ai == 31 {
                indefinite_array
            } else {
                array
            }
        }
        5 => {
            if ai == 31 {
                indefinite_map
            } else {
                map
            }
        }
        6 => {
            if ai == 31 {
                invalid_indefinite
            } else {
                tag
            }
        }
        _ => match ai {
            20 => simple_false,
            21 => simple_true,
            22 => simple_null,
            23 => simple_undefined,
            24 => simple_extended,
            25 => float16,
            26 => float32,
            27 => float64,
            31 => break_stop,
            _ => unassigned_simple,
        },
    };
    entry
}

fn read_argument(r: &mut Reader<'_>, ai: u8, off: usize) -> Result<u64, CborError> {
    match ai {
        0..=23 => Ok(u64::from(ai)),
        24 => Ok(u64::from(r.read_u8()?)),
        25 => Ok(u64::from(r.read_be_u16()?)),
        26 => Ok(u64::from(r.read_be_u32()?)),
        27 => r.read_be_u64(),
        _ => Err(CborError::new(ErrorKind::ReservedAdditionalInfo, off)),
    }
}

fn read_length(r: &mut Reader<'_>, ai: u8, off: usize) -> Result<usize, CborError> {
    let len = read_argument(r, ai, off)?;
    usize::try_from(len).map_err(|_| CborError::new(ErrorKind::LengthOverflow, off))
}

fn uint<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let arg = read_argument(r, ib & 0x1f, off)?;
    Ok(Token::Uint(arg))
}

fn negint<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let arg = read_argument(r, ib & 0x1f, off)?;
    Ok(Token::NegInt(-1 - i128::from(arg)))
}

fn bytes<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let len = read_length(r, ib & 0x1f, off)?;
    let payload = r.read_slice(len)?;
    Ok(Token::Bytes(Cow::Borrowed(payload)))
}

fn text<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let len = read_length(r, ib & 0x1f, off)?;
    let payload = r.read_slice(len)?;
    let s = utf8::validate(payload).map_err(|()| CborError::new(ErrorKind::InvalidUtf8, off))?;
    Ok(Token::Text(Cow::Borrowed(s)))
}

fn array<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let arg = read_argument(r, ib & 0x1f, off)?;
    Ok(Token::Array(arg))
}

fn map<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let arg = read_argument(r, ib & 0x1f, off)?;
    Ok(Token::Map(arg))
}

fn tag<'a>(r: &mut Reader<'a>, ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let arg = read_argument(r, ib & 0x1f, off)?;
    Ok(Token::Tag(arg))
}

fn float16<'a>(r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    let bits = r.read_be_u16()?;
    Ok(Token::Float(f64::from(f16::from_bits(bits))))
}

fn float32<'a>(r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    let bits = r.read_be_u32()?;
    Ok(Token::Float(f64::from(f32::from_bits(bits))))
}

fn float64<'a>(r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    let bits = r.read_be_u64()?;
    Ok(Token::Float(f64::from_bits(bits)))
}

fn simple_false<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::False)
}

fn simple_true<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::True)
}

fn simple_null<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::Null)
}

fn simple_undefined<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::Undefined)
}

// Minor 24 carries a one-byte simple value: < 32 is representable inline,
// the rest are outside the supported set. Both reject.
fn simple_extended<'a>(r: &mut Reader<'a>, _ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    let _ = r.read_u8()?;
    Err(CborError::new(ErrorKind::UnassignedSimpleValue, off))
}

fn unassigned_simple<'a>(_r: &mut Reader<'a>, _ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    Err(CborError::new(ErrorKind::UnassignedSimpleValue, off))
}

fn break_stop<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::Break)
}

fn indefinite_bytes<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::IndefiniteBytes)
}

fn indefinite_text<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::IndefiniteText)
}

fn indefinite_array<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::IndefiniteArray)
}

fn indefinite_map<'a>(_r: &mut Reader<'a>, _ib: u8, _off: usize) -> Result<Token<'a>, CborError> {
    Ok(Token::IndefiniteMap)
}

fn invalid_indefinite<'a>(
    _r: &mut Reader<'a>,
    _ib: u8,
    off: usize,
) -> Result<Token<'a>, CborError> {
    Err(CborError::new(ErrorKind::IndefiniteNotAllowed, off))
}

fn reserved<'a>(_r: &mut Reader<'a>, _ib: u8, off: usize) -> Result<Token<'a>, CborError> {
    Err(CborError::new(ErrorKind::ReservedAdditionalInfo, off))
}
