//! Property-based coverage of spec §8's quantified invariants. `proptest`
//! fills the role `quickcheck`/`proptest` play in the sibling example repos
//! (`vitte-vitbc`, `fuel-vm`) for this kind of round-trip law; the host
//! crate itself has no equivalent because it only ever reads, never writes.

use proptest::prelude::*;

use crate::codec::{msgsize, read, write};

proptest! {
    /// Invariant 1: decode(encode(v)) == v for ints, and it consumes exactly
    /// the encoded bytes.
    #[test]
    fn int_roundtrip(v: i64) {
        let mut buf = Vec::new();
        write::write_int(&mut buf, v);
        let (decoded, rest) = read::read_i64(&buf).unwrap();
        prop_assert_eq!(decoded, v);
        prop_assert!(rest.is_empty());
    }

    /// Invariant 4: the decoder accepts any valid integer encoding
    /// representing `v`, not just the tightest one.
    #[test]
    fn int_decodes_regardless_of_width(v: i32) {
        let v = v as i64;
        let mut fixed_width = Vec::new();
        fixed_width.push(0xd3); // int64
        fixed_width.extend_from_slice(&v.to_be_bytes());
        let (decoded, _) = read::read_i64(&fixed_width).unwrap();
        prop_assert_eq!(decoded, v);
    }

    #[test]
    fn uint_roundtrip(v: u64) {
        let mut buf = Vec::new();
        write::write_uint(&mut buf, v);
        let (decoded, rest) = read::read_u64(&buf).unwrap();
        prop_assert_eq!(decoded, v);
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn float32_roundtrip(v: f32) {
        let mut buf = Vec::new();
        write::write_f32(&mut buf, v);
        let (decoded, rest) = read::read_f32(&buf).unwrap();
        prop_assert!(decoded.to_bits() == v.to_bits() || (decoded.is_nan() && v.is_nan()));
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn float64_roundtrip(v: f64) {
        let mut buf = Vec::new();
        write::write_f64(&mut buf, v);
        let (decoded, rest) = read::read_f64(&buf).unwrap();
        prop_assert!(decoded.to_bits() == v.to_bits() || (decoded.is_nan() && v.is_nan()));
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn str_roundtrip(v in ".{0,300}") {
        let mut buf = Vec::new();
        write::write_str(&mut buf, &v);
        let (decoded, rest) = read::read_str(&buf).unwrap();
        prop_assert_eq!(decoded, v.as_str());
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn bin_roundtrip(v in prop::collection::vec(any::<u8>(), 0..300)) {
        let mut buf = Vec::new();
        write::write_bin(&mut buf, &v);
        let (decoded, rest) = read::read_bin(&buf).unwrap();
        prop_assert_eq!(decoded, v.as_slice());
        prop_assert!(rest.is_empty());
    }

    /// Invariant 2: len(encode(v)) == the pre-computed Msgsize upper bound.
    #[test]
    fn msgsize_matches_actual_encoded_len(v: i64) {
        let mut buf = Vec::new();
        write::write_int(&mut buf, v);
        prop_assert_eq!(buf.len(), msgsize::msgsize_int(v));
    }

    /// Invariant 3: skip(S) advances by exactly the length of the first
    /// object, and applied n times over a concatenation consumes len(S).
    #[test]
    fn skip_consumes_exactly_one_object(v: i64, tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut buf = Vec::new();
        write::write_int(&mut buf, v);
        let encoded_len = buf.len();
        buf.extend_from_slice(&tail);
        let rest = crate::skip(&buf).unwrap();
        prop_assert_eq!(rest.len(), buf.len() - encoded_len);
        prop_assert_eq!(rest, tail.as_slice());
    }

    /// Truncating input at any prefix boundary yields ErrShortBytes, never a
    /// panic or a silently wrong value.
    #[test]
    fn truncated_str_is_short_bytes(v in "\\PC{1,50}") {
        let mut buf = Vec::new();
        write::write_str(&mut buf, &v);
        for cut in 1..buf.len() {
            let truncated = &buf[..cut];
            let result = read::read_str(truncated);
            prop_assert!(result.is_err());
        }
    }
}

/// Literal end-to-end scenarios from spec §8.
#[cfg(test)]
mod literal_scenarios {
    use crate::codec::{read, write};
    use crate::ext::RawExtension;

    #[test]
    fn map_a1_b2_is_bit_exact() {
        let mut buf = Vec::new();
        write::write_map_len(&mut buf, 2);
        write::write_str(&mut buf, "a");
        write::write_int(&mut buf, 1);
        write::write_str(&mut buf, "b");
        write::write_int(&mut buf, 2);
        assert_eq!(buf, [0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0x02]);

        let (len, rest) = read::read_map_len(&buf).unwrap();
        assert_eq!(len, 2);
        let (k1, rest) = read::read_str(rest).unwrap();
        let (v1, rest) = read::read_i64(rest).unwrap();
        let (k2, rest) = read::read_str(rest).unwrap();
        let (v2, rest) = read::read_i64(rest).unwrap();
        assert_eq!((k1, v1, k2, v2), ("a", 1, "b", 2));
        assert!(rest.is_empty());
        assert!(crate::skip(&buf).unwrap().is_empty());
    }

    #[test]
    fn fixed_array_u8x3_is_bit_exact() {
        let mut buf = Vec::new();
        write::write_array_len(&mut buf, 3);
        write::write_int(&mut buf, 1);
        write::write_int(&mut buf, 2);
        write::write_int(&mut buf, 3);
        assert_eq!(buf, [0x93, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn raw_extension_type_mismatch_scenario() {
        let mut buf = Vec::new();
        RawExtension::write(&mut buf, 10, b"hello");
        assert_eq!(buf, [0xc7, 0x05, 0x0a, b'h', b'e', b'l', b'l', b'o']);
        assert!(RawExtension::read(&buf, 10).is_ok());
        let err = RawExtension::read(&buf, 11).unwrap_err();
        assert_eq!(err, crate::Error::ExtensionTypeError { wanted: 11, got: 10 });
    }

    #[test]
    fn boundary_lengths_round_trip() {
        for len in [0usize, 31, 32, 255, 256, 65535, 65536] {
            let s = "x".repeat(len);
            let mut buf = Vec::new();
            write::write_str(&mut buf, &s);
            let (decoded, rest) = read::read_str(&buf).unwrap();
            assert_eq!(decoded, s);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn boundary_integers_round_trip() {
        for v in [0i64, 127, 128, 255, 256, 32767, 32768, 2147483647, 2147483648, i64::MAX, -32, -33, -128, i64::MIN] {
            let mut buf = Vec::new();
            write::write_int(&mut buf, v);
            let (decoded, rest) = read::read_i64(&buf).unwrap();
            assert_eq!(decoded, v);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn unknown_prefix_is_invalid_prefix() {
        assert_eq!(read::read_i64(&[0xc1]).unwrap_err(), crate::Error::InvalidPrefix(0xc1));
        assert_eq!(crate::skip(&[0xc1]).unwrap_err(), crate::Error::InvalidPrefix(0xc1));
    }

    #[test]
    fn array_wrong_size_is_array_error() {
        let mut buf = Vec::new();
        write::write_array_len(&mut buf, 3);
        let (len, _) = read::read_array_len(&buf).unwrap();
        assert_ne!(len, 4);
    }
}
