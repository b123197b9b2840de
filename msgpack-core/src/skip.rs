//! C3 — the structural skipper (spec §4.3). Advances past a well-formed
//! object in O(object-size) time using an explicit work stack rather than
//! recursion, so auxiliary space is bounded by nesting depth, not object size.

use crate::codec::read::check_known_prefix;
use crate::error::{Error, Result};
use crate::kind::{prefix, Kind};

/// Advances past the next well-formed MessagePack object in `b`, returning
/// the remaining slice. Generated decode code calls this whenever it
/// encounters an unknown map key (spec §4.3).
///
/// Implementation is iterative: `pending` starts at one ("skip one object")
/// and each array/map header pushes its element count (maps count twice
/// their length, once per key and once per value) onto that same counter
/// instead of the call stack.
pub fn skip(b: &[u8]) -> Result<&[u8]> {
    let mut rest = b;
    let mut pending: usize = 1;
    while pending > 0 {
        let additional = skip_one(&mut rest)?;
        pending -= 1;
        pending += additional;
    }
    Ok(rest)
}

/// Consumes exactly one prefix and its fixed-size payload, advancing `rest`
/// in place. Returns the number of child objects still owed (0 for scalars,
/// the element count for arrays, twice the pair count for maps).
fn skip_one(rest: &mut &[u8]) -> Result<usize> {
    check_known_prefix(rest)?;
    let p = rest[0];
    *rest = &rest[1..];
    if prefix::is_positive_fixint(p) || prefix::is_negative_fixint(p) {
        return Ok(0);
    }
    if prefix::is_fixstr(p) {
        advance(rest, (p & 0x1f) as usize)?;
        return Ok(0);
    }
    if prefix::is_fixarray(p) {
        return Ok((p & 0x0f) as usize);
    }
    if prefix::is_fixmap(p) {
        return Ok(2 * (p & 0x0f) as usize);
    }
    match p {
        prefix::NIL | prefix::FALSE | prefix::TRUE => Ok(0),
        prefix::UINT8 | prefix::INT8 => {
            advance(rest, 1)?;
            Ok(0)
        }
        prefix::UINT16 | prefix::INT16 => {
            advance(rest, 2)?;
            Ok(0)
        }
        prefix::UINT32 | prefix::INT32 | prefix::FLOAT32 => {
            advance(rest, 4)?;
            Ok(0)
        }
        prefix::UINT64 | prefix::INT64 | prefix::FLOAT64 => {
            advance(rest, 8)?;
            Ok(0)
        }
        prefix::STR8 | prefix::BIN8 => {
            let len = read_len(rest, 1)?;
            advance(rest, len)?;
            Ok(0)
        }
        prefix::STR16 | prefix::BIN16 => {
            let len = read_len(rest, 2)?;
            advance(rest, len)?;
            Ok(0)
        }
        prefix::STR32 | prefix::BIN32 => {
            let len = read_len(rest, 4)?;
            advance(rest, len)?;
            Ok(0)
        }
        prefix::ARRAY16 => Ok(read_len(rest, 2)?),
        prefix::ARRAY32 => Ok(read_len(rest, 4)?),
        prefix::MAP16 => Ok(2 * read_len(rest, 2)?),
        prefix::MAP32 => Ok(2 * read_len(rest, 4)?),
        prefix::FIXEXT1 => {
            advance(rest, 1 + 1)?;
            Ok(0)
        }
        prefix::FIXEXT2 => {
            advance(rest, 1 + 2)?;
            Ok(0)
        }
        prefix::FIXEXT4 => {
            advance(rest, 1 + 4)?;
            Ok(0)
        }
        prefix::FIXEXT8 => {
            advance(rest, 1 + 8)?;
            Ok(0)
        }
        prefix::FIXEXT16 => {
            advance(rest, 1 + 16)?;
            Ok(0)
        }
        prefix::EXT8 => {
            let len = read_len(rest, 1)?;
            advance(rest, 1 + len)?;
            Ok(0)
        }
        prefix::EXT16 => {
            let len = read_len(rest, 2)?;
            advance(rest, 1 + len)?;
            Ok(0)
        }
        prefix::EXT32 => {
            let len = read_len(rest, 4)?;
            advance(rest, 1 + len)?;
            Ok(0)
        }
        _ => Err(Error::InvalidPrefix(p)),
    }
}

#[inline]
fn advance(rest: &mut &[u8], n: usize) -> Result<()> {
    if rest.len() < n {
        return Err(Error::ShortBytes { wanted: n, remaining: rest.len() });
    }
    *rest = &rest[n..];
    Ok(())
}

#[inline]
fn read_len(rest: &mut &[u8], width: usize) -> Result<usize> {
    if rest.len() < width {
        return Err(Error::ShortBytes { wanted: width, remaining: rest.len() });
    }
    let (bytes, tail) = rest.split_at(width);
    let len = match width {
        1 => bytes[0] as usize,
        2 => u16::from_be_bytes(bytes.try_into().unwrap()) as usize,
        4 => u32::from_be_bytes(bytes.try_into().unwrap()) as usize,
        _ => unreachable!(),
    };
    *rest = tail;
    Ok(len)
}

/// The coarse kind of the next object, exposed for callers that want to
/// dispatch before skipping (e.g. generated decode code checking for `Nil`).
pub fn peek_kind(b: &[u8]) -> Result<Kind> {
    crate::codec::read::peek_kind(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write::*;

    #[test]
    fn skips_scalar() {
        let mut buf = Vec::new();
        write_int(&mut buf, 42);
        buf.extend_from_slice(b"tail");
        assert_eq!(skip(&buf).unwrap(), b"tail");
    }

    #[test]
    fn skips_nested_map() {
        let mut buf = Vec::new();
        write_map_len(&mut buf, 1);
        write_str(&mut buf, "a");
        write_array_len(&mut buf, 2);
        write_int(&mut buf, 1);
        write_int(&mut buf, 2);
        buf.extend_from_slice(b"tail");
        assert_eq!(skip(&buf).unwrap(), b"tail");
    }

    #[test]
    fn consumes_exactly_len_on_concatenation() {
        let mut buf = Vec::new();
        write_int(&mut buf, 1);
        write_str(&mut buf, "hi");
        write_bool(&mut buf, true);
        let mut rest = buf.as_slice();
        for _ in 0..3 {
            rest = skip(rest).unwrap();
        }
        assert!(rest.is_empty());
    }

    #[test]
    fn unknown_prefix_is_invalid() {
        assert_eq!(skip(&[0xc1]), Err(Error::InvalidPrefix(0xc1)));
    }
}
