//! The zero-copy slice write API (spec §4.1). Each writer appends to a
//! caller-owned `Vec<u8>` and picks the tightest prefix that fits the value.

use crate::kind::prefix;

pub fn write_nil(buf: &mut Vec<u8>) {
    buf.push(prefix::NIL);
}

pub fn write_bool(buf: &mut Vec<u8>, v: bool) {
    buf.push(if v { prefix::TRUE } else { prefix::FALSE });
}

/// Writes the tightest signed-integer prefix for `v` (spec §4.1: a
/// nonnegative `< 128` becomes a positive fixint, `-32 <= x < 0` a negative
/// fixint, otherwise the narrowest `intN`/`uintN` that fits).
pub fn write_int(buf: &mut Vec<u8>, v: i64) {
    if (0..0x80).contains(&v) {
        buf.push(v as u8);
        return;
    }
    if (-32..0).contains(&v) {
        buf.push(v as i8 as u8);
        return;
    }
    if v >= 0 {
        write_uint(buf, v as u64);
        return;
    }
    if let Ok(v) = i8::try_from(v) {
        buf.push(prefix::INT8);
        buf.push(v as u8);
    } else if let Ok(v) = i16::try_from(v) {
        buf.push(prefix::INT16);
        buf.extend_from_slice(&v.to_be_bytes());
    } else if let Ok(v) = i32::try_from(v) {
        buf.push(prefix::INT32);
        buf.extend_from_slice(&v.to_be_bytes());
    } else {
        buf.push(prefix::INT64);
        buf.extend_from_slice(&v.to_be_bytes());
    }
}

/// Writes the tightest unsigned-integer prefix for `v`.
pub fn write_uint(buf: &mut Vec<u8>, v: u64) {
    if v < 0x80 {
        buf.push(v as u8);
    } else if let Ok(v) = u8::try_from(v) {
        buf.push(prefix::UINT8);
        buf.push(v);
    } else if let Ok(v) = u16::try_from(v) {
        buf.push(prefix::UINT16);
        buf.extend_from_slice(&v.to_be_bytes());
    } else if let Ok(v) = u32::try_from(v) {
        buf.push(prefix::UINT32);
        buf.extend_from_slice(&v.to_be_bytes());
    } else {
        buf.push(prefix::UINT64);
        buf.extend_from_slice(&v.to_be_bytes());
    }
}

pub fn write_f32(buf: &mut Vec<u8>, v: f32) {
    buf.push(prefix::FLOAT32);
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn write_f64(buf: &mut Vec<u8>, v: f64) {
    buf.push(prefix::FLOAT64);
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn write_str(buf: &mut Vec<u8>, v: &str) {
    let bytes = v.as_bytes();
    let len = bytes.len();
    if len < 32 {
        buf.push(0xa0 | len as u8);
    } else if let Ok(len) = u8::try_from(len) {
        buf.push(prefix::STR8);
        buf.push(len);
    } else if let Ok(len) = u16::try_from(len) {
        buf.push(prefix::STR16);
        buf.extend_from_slice(&len.to_be_bytes());
    } else {
        buf.push(prefix::STR32);
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    buf.extend_from_slice(bytes);
}

pub fn write_bin(buf: &mut Vec<u8>, v: &[u8]) {
    let len = v.len();
    if let Ok(len) = u8::try_from(len) {
        buf.push(prefix::BIN8);
        buf.push(len);
    } else if let Ok(len) = u16::try_from(len) {
        buf.push(prefix::BIN16);
        buf.extend_from_slice(&len.to_be_bytes());
    } else {
        buf.push(prefix::BIN32);
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    buf.extend_from_slice(v);
}

pub fn write_array_len(buf: &mut Vec<u8>, len: u32) {
    if len < 16 {
        buf.push(0x90 | len as u8);
    } else if let Ok(len) = u16::try_from(len) {
        buf.push(prefix::ARRAY16);
        buf.extend_from_slice(&len.to_be_bytes());
    } else {
        buf.push(prefix::ARRAY32);
        buf.extend_from_slice(&len.to_be_bytes());
    }
}

pub fn write_map_len(buf: &mut Vec<u8>, len: u32) {
    if len < 16 {
        buf.push(0x80 | len as u8);
    } else if let Ok(len) = u16::try_from(len) {
        buf.push(prefix::MAP16);
        buf.extend_from_slice(&len.to_be_bytes());
    } else {
        buf.push(prefix::MAP32);
        buf.extend_from_slice(&len.to_be_bytes());
    }
}

/// Writes an ext header for a payload of `len` bytes tagged with `type_id`
/// (spec §4.2): `fixext*` for lengths in `{1,2,4,8,16}`, else the narrowest
/// `ext8`/`ext16`/`ext32`. Length 0 has no `fixext0`, so it is written as
/// `ext8` with a length byte of `0` (spec §9, the documented non-optimization).
pub fn write_ext_header(buf: &mut Vec<u8>, type_id: i8, len: usize) {
    match len {
        1 => buf.push(prefix::FIXEXT1),
        2 => buf.push(prefix::FIXEXT2),
        4 => buf.push(prefix::FIXEXT4),
        8 => buf.push(prefix::FIXEXT8),
        16 => buf.push(prefix::FIXEXT16),
        _ if len < 0x100 => {
            buf.push(prefix::EXT8);
            buf.push(len as u8);
        }
        _ if len < 0x1_0000 => {
            buf.push(prefix::EXT16);
            buf.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            buf.push(prefix::EXT32);
            buf.extend_from_slice(&(len as u32).to_be_bytes());
        }
    }
    buf.push(type_id as u8);
}
