//! The zero-copy slice read API (spec §4.1). Every function takes an input
//! slice and returns `(value, remaining)`; strings and bytes borrow directly
//! from the input rather than allocating, so the caller's lifetime is tied to
//! the buffer they passed in.

use crate::error::{Error, Result};
use crate::kind::{kind_of, prefix, Kind};

#[inline]
fn split(b: &[u8], n: usize) -> Result<(&[u8], &[u8])> {
    if b.len() < n {
        return Err(Error::ShortBytes { wanted: n, remaining: b.len() });
    }
    Ok(b.split_at(n))
}

#[inline]
fn prefix_byte(b: &[u8]) -> Result<(u8, &[u8])> {
    if b.is_empty() {
        return Err(Error::ShortBytes { wanted: 1, remaining: 0 });
    }
    Ok((b[0], &b[1..]))
}

/// Peek the coarse kind of the next object without consuming anything.
pub fn peek_kind(b: &[u8]) -> Result<Kind> {
    let (p, _) = prefix_byte(b)?;
    Ok(kind_of(p))
}

pub fn read_nil(b: &[u8]) -> Result<&[u8]> {
    let (p, rest) = prefix_byte(b)?;
    match p {
        prefix::NIL => Ok(rest),
        _ => type_mismatch(p, "nil"),
    }
}

pub fn read_bool(b: &[u8]) -> Result<(bool, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    match p {
        prefix::FALSE => Ok((false, rest)),
        prefix::TRUE => Ok((true, rest)),
        _ => type_mismatch(p, "bool"),
    }
}

/// Accepts *any* valid integer encoding representing a signed value
/// (fixint, int8..int64, uint8..uint64), per spec §8 invariant 4.
pub fn read_i64(b: &[u8]) -> Result<(i64, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    if prefix::is_positive_fixint(p) {
        return Ok((p as i64, rest));
    }
    if prefix::is_negative_fixint(p) {
        return Ok((p as i8 as i64, rest));
    }
    match p {
        prefix::INT8 => {
            let (bytes, rest) = split(rest, 1)?;
            Ok((bytes[0] as i8 as i64, rest))
        }
        prefix::INT16 => {
            let (bytes, rest) = split(rest, 2)?;
            Ok((i16::from_be_bytes(bytes.try_into().unwrap()) as i64, rest))
        }
        prefix::INT32 => {
            let (bytes, rest) = split(rest, 4)?;
            Ok((i32::from_be_bytes(bytes.try_into().unwrap()) as i64, rest))
        }
        prefix::INT64 => {
            let (bytes, rest) = split(rest, 8)?;
            Ok((i64::from_be_bytes(bytes.try_into().unwrap()), rest))
        }
        prefix::UINT8 => {
            let (bytes, rest) = split(rest, 1)?;
            Ok((bytes[0] as i64, rest))
        }
        prefix::UINT16 => {
            let (bytes, rest) = split(rest, 2)?;
            Ok((u16::from_be_bytes(bytes.try_into().unwrap()) as i64, rest))
        }
        prefix::UINT32 => {
            let (bytes, rest) = split(rest, 4)?;
            Ok((u32::from_be_bytes(bytes.try_into().unwrap()) as i64, rest))
        }
        prefix::UINT64 => {
            let (bytes, rest) = split(rest, 8)?;
            let v = u64::from_be_bytes(bytes.try_into().unwrap());
            i64::try_from(v).map(|v| (v, rest)).map_err(|_| Error::IntOverflow { value: v as i64, bits: 63 })
        }
        _ => type_mismatch(p, "int"),
    }
}

/// Accepts any valid integer encoding representing an unsigned value.
pub fn read_u64(b: &[u8]) -> Result<(u64, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    if prefix::is_positive_fixint(p) {
        return Ok((p as u64, rest));
    }
    match p {
        prefix::UINT8 => {
            let (bytes, rest) = split(rest, 1)?;
            Ok((bytes[0] as u64, rest))
        }
        prefix::UINT16 => {
            let (bytes, rest) = split(rest, 2)?;
            Ok((u16::from_be_bytes(bytes.try_into().unwrap()) as u64, rest))
        }
        prefix::UINT32 => {
            let (bytes, rest) = split(rest, 4)?;
            Ok((u32::from_be_bytes(bytes.try_into().unwrap()) as u64, rest))
        }
        prefix::UINT64 => {
            let (bytes, rest) = split(rest, 8)?;
            Ok((u64::from_be_bytes(bytes.try_into().unwrap()), rest))
        }
        prefix::INT8 => {
            let (bytes, rest) = split(rest, 1)?;
            let v = bytes[0] as i8;
            u64::try_from(v).map(|v| (v, rest)).map_err(|_| Error::UintOverflow { value: v as i64 as u64, bits: 64 })
        }
        prefix::INT16 => {
            let (bytes, rest) = split(rest, 2)?;
            let v = i16::from_be_bytes(bytes.try_into().unwrap());
            u64::try_from(v).map(|v| (v, rest)).map_err(|_| Error::UintOverflow { value: v as i64 as u64, bits: 64 })
        }
        prefix::INT32 => {
            let (bytes, rest) = split(rest, 4)?;
            let v = i32::from_be_bytes(bytes.try_into().unwrap());
            u64::try_from(v).map(|v| (v, rest)).map_err(|_| Error::UintOverflow { value: v as i64 as u64, bits: 64 })
        }
        prefix::INT64 => {
            let (bytes, rest) = split(rest, 8)?;
            let v = i64::from_be_bytes(bytes.try_into().unwrap());
            u64::try_from(v).map(|v| (v, rest)).map_err(|_| Error::UintOverflow { value: v as u64, bits: 64 })
        }
        _ if prefix::is_negative_fixint(p) => Err(Error::UintOverflow { value: p as i8 as i64 as u64, bits: 64 }),
        _ => type_mismatch(p, "uint"),
    }
}

/// `ReadInt8` (spec §4.1): fails with `IntOverflow` if the decoded value
/// does not fit the requested width.
pub fn read_int8(b: &[u8]) -> Result<(i8, &[u8])> {
    let (v, rest) = read_i64(b)?;
    i8::try_from(v).map(|v| (v, rest)).map_err(|_| Error::IntOverflow { value: v, bits: 8 })
}

pub fn read_int16(b: &[u8]) -> Result<(i16, &[u8])> {
    let (v, rest) = read_i64(b)?;
    i16::try_from(v).map(|v| (v, rest)).map_err(|_| Error::IntOverflow { value: v, bits: 16 })
}

pub fn read_int32(b: &[u8]) -> Result<(i32, &[u8])> {
    let (v, rest) = read_i64(b)?;
    i32::try_from(v).map(|v| (v, rest)).map_err(|_| Error::IntOverflow { value: v, bits: 32 })
}

pub fn read_f32(b: &[u8]) -> Result<(f32, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    match p {
        prefix::FLOAT32 => {
            let (bytes, rest) = split(rest, 4)?;
            Ok((f32::from_be_bytes(bytes.try_into().unwrap()), rest))
        }
        _ => type_mismatch(p, "float32"),
    }
}

pub fn read_f64(b: &[u8]) -> Result<(f64, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    match p {
        prefix::FLOAT64 => {
            let (bytes, rest) = split(rest, 8)?;
            Ok((f64::from_be_bytes(bytes.try_into().unwrap()), rest))
        }
        _ => type_mismatch(p, "float64"),
    }
}

pub fn read_str(b: &[u8]) -> Result<(&str, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    let (len, rest) = if prefix::is_fixstr(p) {
        ((p & 0x1f) as usize, rest)
    } else {
        match p {
            prefix::STR8 => {
                let (bytes, rest) = split(rest, 1)?;
                (bytes[0] as usize, rest)
            }
            prefix::STR16 => {
                let (bytes, rest) = split(rest, 2)?;
                (u16::from_be_bytes(bytes.try_into().unwrap()) as usize, rest)
            }
            prefix::STR32 => {
                let (bytes, rest) = split(rest, 4)?;
                (u32::from_be_bytes(bytes.try_into().unwrap()) as usize, rest)
            }
            _ => return type_mismatch(p, "str"),
        }
    };
    let (bytes, rest) = split(rest, len)?;
    let s = std::str::from_utf8(bytes).map_err(|_| Error::Fatal("invalid utf-8 in str payload"))?;
    Ok((s, rest))
}

pub fn read_bin(b: &[u8]) -> Result<(&[u8], &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    let (len, rest) = match p {
        prefix::BIN8 => {
            let (bytes, rest) = split(rest, 1)?;
            (bytes[0] as usize, rest)
        }
        prefix::BIN16 => {
            let (bytes, rest) = split(rest, 2)?;
            (u16::from_be_bytes(bytes.try_into().unwrap()) as usize, rest)
        }
        prefix::BIN32 => {
            let (bytes, rest) = split(rest, 4)?;
            (u32::from_be_bytes(bytes.try_into().unwrap()) as usize, rest)
        }
        _ => return type_mismatch(p, "bin"),
    };
    split(rest, len)
}

pub fn read_array_len(b: &[u8]) -> Result<(u32, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    if prefix::is_fixarray(p) {
        return Ok(((p & 0x0f) as u32, rest));
    }
    match p {
        prefix::ARRAY16 => {
            let (bytes, rest) = split(rest, 2)?;
            Ok((u16::from_be_bytes(bytes.try_into().unwrap()) as u32, rest))
        }
        prefix::ARRAY32 => {
            let (bytes, rest) = split(rest, 4)?;
            Ok((u32::from_be_bytes(bytes.try_into().unwrap()), rest))
        }
        _ => type_mismatch(p, "array"),
    }
}

pub fn read_map_len(b: &[u8]) -> Result<(u32, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    if prefix::is_fixmap(p) {
        return Ok(((p & 0x0f) as u32, rest));
    }
    match p {
        prefix::MAP16 => {
            let (bytes, rest) = split(rest, 2)?;
            Ok((u16::from_be_bytes(bytes.try_into().unwrap()) as u32, rest))
        }
        prefix::MAP32 => {
            let (bytes, rest) = split(rest, 4)?;
            Ok((u32::from_be_bytes(bytes.try_into().unwrap()), rest))
        }
        _ => type_mismatch(p, "map"),
    }
}

/// Reads an extension header (fixext/ext8/16/32) and returns
/// `(type_id, payload_len, remaining_before_payload)`. The caller slices the
/// payload themselves; see [`crate::ext`] for the typed wrapper.
pub fn read_ext_meta(b: &[u8]) -> Result<(i8, usize, &[u8])> {
    let (p, rest) = prefix_byte(b)?;
    let (len, rest) = match p {
        prefix::FIXEXT1 => (1usize, rest),
        prefix::FIXEXT2 => (2, rest),
        prefix::FIXEXT4 => (4, rest),
        prefix::FIXEXT8 => (8, rest),
        prefix::FIXEXT16 => (16, rest),
        prefix::EXT8 => {
            let (bytes, rest) = split(rest, 1)?;
            (bytes[0] as usize, rest)
        }
        prefix::EXT16 => {
            let (bytes, rest) = split(rest, 2)?;
            (u16::from_be_bytes(bytes.try_into().unwrap()) as usize, rest)
        }
        prefix::EXT32 => {
            let (bytes, rest) = split(rest, 4)?;
            (u32::from_be_bytes(bytes.try_into().unwrap()) as usize, rest)
        }
        _ => return type_mismatch(p, "ext"),
    };
    let (type_byte, rest) = split(rest, 1)?;
    Ok((type_byte[0] as i8, len, rest))
}

#[cold]
fn type_mismatch<T>(prefix: u8, wanted: &'static str) -> Result<T> {
    let kind = kind_of(prefix);
    if matches!(kind, Kind::Invalid) {
        return Err(Error::InvalidPrefix(prefix));
    }
    Err(Error::TypeError { wanted, got: kind_name(kind) })
}

fn kind_name(k: Kind) -> &'static str {
    match k {
        Kind::Nil => "nil",
        Kind::Bool => "bool",
        Kind::Int => "int",
        Kind::Uint => "uint",
        Kind::Float32 => "float32",
        Kind::Float64 => "float64",
        Kind::Str => "str",
        Kind::Bin => "bin",
        Kind::Array => "array",
        Kind::Map => "map",
        Kind::Ext => "ext",
        Kind::Invalid => "invalid",
    }
}

/// A raw, unrecognized leading byte (e.g. `0xc1`) is always `InvalidPrefix`,
/// regardless of which reader was attempting to dispatch on it.
pub(crate) fn check_known_prefix(b: &[u8]) -> Result<()> {
    let (p, _) = prefix_byte(b)?;
    if matches!(kind_of(p), Kind::Invalid) {
        return Err(Error::InvalidPrefix(p));
    }
    Ok(())
}
