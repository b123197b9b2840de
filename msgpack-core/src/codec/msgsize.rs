//! Pre-computed upper-bound wire sizes (spec §8, invariant 2; SPEC_FULL §14).
//!
//! These mirror [`super::write`]'s tightest-prefix choices exactly, so
//! `msgsize_int(v) == write_int(buf, v).len()` for every `v` — generated code
//! can pre-size a buffer with [`Vec::with_capacity`] before encoding.

/// A type whose encoded wire size can be computed without actually encoding
/// it (SPEC_FULL §14). Derived types implement this alongside `encode`/
/// `decode` so callers can pre-size a buffer with [`Vec::with_capacity`].
pub trait Msgsize {
    fn msgsize(&self) -> usize;
}

pub fn msgsize_nil() -> usize {
    1
}

pub fn msgsize_bool() -> usize {
    1
}

pub fn msgsize_int(v: i64) -> usize {
    if (0..0x80).contains(&v) || (-32..0).contains(&v) {
        1
    } else if v >= 0 {
        msgsize_uint(v as u64)
    } else if i8::try_from(v).is_ok() {
        2
    } else if i16::try_from(v).is_ok() {
        3
    } else if i32::try_from(v).is_ok() {
        5
    } else {
        9
    }
}

pub fn msgsize_uint(v: u64) -> usize {
    if v < 0x80 {
        1
    } else if u8::try_from(v).is_ok() {
        2
    } else if u16::try_from(v).is_ok() {
        3
    } else if u32::try_from(v).is_ok() {
        5
    } else {
        9
    }
}

pub fn msgsize_f32() -> usize {
    5
}

pub fn msgsize_f64() -> usize {
    9
}

pub fn msgsize_str(len: usize) -> usize {
    let header = if len < 32 {
        1
    } else if u8::try_from(len).is_ok() {
        2
    } else if u16::try_from(len).is_ok() {
        3
    } else {
        5
    };
    header + len
}

pub fn msgsize_bin(len: usize) -> usize {
    let header = if u8::try_from(len).is_ok() {
        2
    } else if u16::try_from(len).is_ok() {
        3
    } else {
        5
    };
    header + len
}

pub fn msgsize_array_header(len: u32) -> usize {
    if len < 16 {
        1
    } else if u16::try_from(len).is_ok() {
        3
    } else {
        5
    }
}

pub fn msgsize_map_header(len: u32) -> usize {
    msgsize_array_header(len)
}

pub fn msgsize_ext(len: usize) -> usize {
    let header = match len {
        1 | 2 | 4 | 8 | 16 => 2,
        _ if len < 0x100 => 3,
        _ if len < 0x1_0000 => 4,
        _ => 6,
    };
    header + len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write;

    #[test]
    fn matches_write_int() {
        for v in [0, 127, 128, 255, 256, 32767, 32768, i32::MAX as i64, i32::MAX as i64 + 1, i64::MAX, -32, -33, -128, i64::MIN] {
            let mut buf = Vec::new();
            write::write_int(&mut buf, v);
            assert_eq!(buf.len(), msgsize_int(v), "mismatch for {v}");
        }
    }

    #[test]
    fn matches_write_str() {
        for len in [0usize, 31, 32, 255, 256, 65535, 65536] {
            let s = "a".repeat(len);
            let mut buf = Vec::new();
            write::write_str(&mut buf, &s);
            assert_eq!(buf.len(), msgsize_str(len));
        }
    }
}
