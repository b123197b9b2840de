//! C2 — the extension subsystem (spec §4.2). An extension is an opaque byte
//! string tagged by an 8-bit signed type id. [`Registry`] maps an id to a
//! zero-value factory for decode-into-interface paths, mirroring the host
//! crate's `Context` (`structured/context.rs`): an explicit, session-scoped
//! value rather than process-wide mutable state (spec §9 design note).

use std::collections::HashMap;
use std::fmt;

use crate::codec::read::read_ext_meta;
use crate::codec::write::write_ext_header;
use crate::error::{Error, Result};
use crate::kind::reserved_ext;

/// A decoded extension: its wire type id plus the exact payload slice handed
/// to it (spec §4.2, and the §9 open question: a zero-length extension still
/// gets an empty slice, never skipped as an "optimization").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawExtension<'a> {
    pub type_id: i8,
    pub data: &'a [u8],
}

impl<'a> RawExtension<'a> {
    /// Reads an extension header and payload, verifying the wire type id
    /// matches `expected_type_id` (spec §4.2: `ExtensionTypeError` if not).
    pub fn read(b: &'a [u8], expected_type_id: i8) -> Result<(Self, &'a [u8])> {
        let (type_id, len, rest) = read_ext_meta(b)?;
        if type_id != expected_type_id {
            return Err(Error::ExtensionTypeError { wanted: expected_type_id, got: type_id });
        }
        if rest.len() < len {
            return Err(Error::ShortBytes { wanted: len, remaining: rest.len() });
        }
        let (data, rest) = rest.split_at(len);
        Ok((RawExtension { type_id, data }, rest))
    }

    /// Reads an extension header and payload without checking the type id,
    /// for the dynamic-registry decode path (see [`Registry::decode`]).
    pub fn read_any(b: &'a [u8]) -> Result<(Self, &'a [u8])> {
        let (type_id, len, rest) = read_ext_meta(b)?;
        if rest.len() < len {
            return Err(Error::ShortBytes { wanted: len, remaining: rest.len() });
        }
        let (data, rest) = rest.split_at(len);
        Ok((RawExtension { type_id, data }, rest))
    }

    pub fn write(buf: &mut Vec<u8>, type_id: i8, data: &[u8]) {
        write_ext_header(buf, type_id, data.len());
        buf.extend_from_slice(data);
    }
}

/// A factory that produces the zero value an extension decodes into, keyed
/// by type id in [`Registry`].
pub type ExtensionFactory = Box<dyn Fn(&[u8]) -> Box<[u8]> + Send + Sync>;

/// A session-scoped, read-mostly registry of extension type ids (spec §4.2,
/// §5 "Shared resources"). Registration is a configuration-time operation;
/// once built, lookups are safe for concurrent readers because `Registry`
/// itself is only ever handed out by shared reference after construction.
pub struct Registry {
    factories: HashMap<i8, ExtensionFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registered_ids", &{
                let mut ids: Vec<_> = self.factories.keys().copied().collect();
                ids.sort_unstable();
                ids
            })
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Registry { factories: HashMap::new() }
    }

    /// Registers a factory for `type_id`. Fails fast on a reserved id
    /// (complex64/complex128/time) or a duplicate registration — both are
    /// programmer mistakes, not runtime conditions (spec §6.4, §7).
    pub fn register(
        &mut self,
        type_id: i8,
        factory: impl Fn(&[u8]) -> Box<[u8]> + Send + Sync + 'static,
    ) -> std::result::Result<(), crate::error::RegistryError> {
        if matches!(type_id, reserved_ext::COMPLEX64 | reserved_ext::COMPLEX128 | reserved_ext::TIME) {
            return Err(crate::error::RegistryError::ReservedTypeId(type_id));
        }
        if self.factories.contains_key(&type_id) {
            return Err(crate::error::RegistryError::DuplicateTypeId(type_id));
        }
        self.factories.insert(type_id, Box::new(factory));
        #[cfg(feature = "tracing")]
        tracing::debug!(type_id, "registered extension factory");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, type_id: i8) -> Option<&ExtensionFactory> {
        self.factories.get(&type_id)
    }

    /// Decodes the next extension using whichever factory is registered for
    /// its wire type id, for the dynamic (decode-into-interface) path.
    pub fn decode<'a>(&self, b: &'a [u8]) -> Result<(RawExtension<'a>, &'a [u8])> {
        RawExtension::read_any(b)
    }
}

/// An owned extension value: a wire type id plus its payload, for fields
/// tagged `msg:"name,extension"` in derived code (spec §4.5). Unlike
/// [`RawExtension`], which borrows its payload from the input slice, this
/// type owns its bytes so it can be stored in a struct field across the
/// `decode` call that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub type_id: i8,
    pub data: Vec<u8>,
}

impl Extension {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        RawExtension::write(buf, self.type_id, &self.data);
    }

    pub fn decode(b: &[u8]) -> Result<(Self, &[u8])> {
        let (ext, rest) = RawExtension::read_any(b)?;
        Ok((Extension { type_id: ext.type_id, data: ext.data.to_vec() }, rest))
    }

    #[must_use]
    pub fn msgsize(&self) -> usize {
        crate::codec::msgsize::msgsize_ext(self.data.len())
    }
}

/// `time.Time` as a fixext8: seconds-since-epoch (i64 BE) and nanoseconds
/// (u32 BE), per spec §4.2 ("Time is encoded as a fixext with seconds-since-
/// epoch and nanoseconds").
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut payload = [0u8; 12];
        payload[..8].copy_from_slice(&self.seconds.to_be_bytes());
        payload[8..].copy_from_slice(&self.nanos.to_be_bytes());
        RawExtension::write(buf, reserved_ext::TIME, &payload);
    }

    pub fn decode(b: &[u8]) -> Result<(Self, &[u8])> {
        let (ext, rest) = RawExtension::read(b, reserved_ext::TIME)?;
        if ext.data.len() != 12 {
            return Err(Error::ExtensionTypeError { wanted: reserved_ext::TIME, got: ext.type_id });
        }
        let seconds = i64::from_be_bytes(ext.data[..8].try_into().unwrap());
        let nanos = u32::from_be_bytes(ext.data[8..].try_into().unwrap());
        Ok((Timestamp { seconds, nanos }, rest))
    }
}

/// `complex64` as a fixext8 of two IEEE-754 `f32`s (spec §4.2).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

impl Complex64 {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut payload = [0u8; 8];
        payload[..4].copy_from_slice(&self.re.to_be_bytes());
        payload[4..].copy_from_slice(&self.im.to_be_bytes());
        RawExtension::write(buf, reserved_ext::COMPLEX64, &payload);
    }

    pub fn decode(b: &[u8]) -> Result<(Self, &[u8])> {
        let (ext, rest) = RawExtension::read(b, reserved_ext::COMPLEX64)?;
        if ext.data.len() != 8 {
            return Err(Error::ExtensionTypeError { wanted: reserved_ext::COMPLEX64, got: ext.type_id });
        }
        let re = f32::from_be_bytes(ext.data[..4].try_into().unwrap());
        let im = f32::from_be_bytes(ext.data[4..].try_into().unwrap());
        Ok((Complex64 { re, im }, rest))
    }
}

/// `complex128` as a fixext16 of two IEEE-754 `f64`s (spec §4.2).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex128 {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut payload = [0u8; 16];
        payload[..8].copy_from_slice(&self.re.to_be_bytes());
        payload[8..].copy_from_slice(&self.im.to_be_bytes());
        RawExtension::write(buf, reserved_ext::COMPLEX128, &payload);
    }

    pub fn decode(b: &[u8]) -> Result<(Self, &[u8])> {
        let (ext, rest) = RawExtension::read(b, reserved_ext::COMPLEX128)?;
        if ext.data.len() != 16 {
            return Err(Error::ExtensionTypeError { wanted: reserved_ext::COMPLEX128, got: ext.type_id });
        }
        let re = f64::from_be_bytes(ext.data[..8].try_into().unwrap());
        let im = f64::from_be_bytes(ext.data[8..].try_into().unwrap());
        Ok((Complex128 { re, im }, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_extension_roundtrip() {
        let mut buf = Vec::new();
        RawExtension::write(&mut buf, 10, b"hello");
        assert_eq!(buf, [0xc7, 0x05, 0x0a, b'h', b'e', b'l', b'l', b'o']);
        let (ext, rest) = RawExtension::read(&buf, 10).unwrap();
        assert_eq!(ext.data, b"hello");
        assert!(rest.is_empty());
    }

    #[test]
    fn raw_extension_type_mismatch() {
        let mut buf = Vec::new();
        RawExtension::write(&mut buf, 10, b"hello");
        let err = RawExtension::read(&buf, 11).unwrap_err();
        assert_eq!(err, Error::ExtensionTypeError { wanted: 11, got: 10 });
    }

    #[test]
    fn zero_length_extension_is_ext8() {
        let mut buf = Vec::new();
        RawExtension::write(&mut buf, 1, b"");
        assert_eq!(buf, [0xc7, 0x00, 0x01]);
        let (ext, rest) = RawExtension::read(&buf, 1).unwrap();
        assert_eq!(ext.data, b"");
        assert!(rest.is_empty());
    }

    #[test]
    fn timestamp_roundtrip_is_nanosecond_exact() {
        let ts = Timestamp { seconds: 1_700_000_000, nanos: 500_000_000 };
        let mut buf = Vec::new();
        ts.encode(&mut buf);
        // seconds (i64) + nanos (u32) is a 12-byte payload, which fits none
        // of the fixext widths, so this falls through to ext8.
        assert_eq!(buf[0], 0xc7);
        assert_eq!(buf[1], 12);
        assert_eq!(buf[2] as i8, reserved_ext::TIME);
        let (decoded, rest) = Timestamp::decode(&buf).unwrap();
        assert_eq!(decoded, ts);
        assert!(rest.is_empty());
    }

    #[test]
    fn registering_reserved_id_fails() {
        let mut reg = Registry::new();
        let err = reg.register(reserved_ext::TIME, |d| d.into()).unwrap_err();
        assert_eq!(err, crate::error::RegistryError::ReservedTypeId(5));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut reg = Registry::new();
        reg.register(1, |d| d.into()).unwrap();
        let err = reg.register(1, |d| d.into()).unwrap_err();
        assert_eq!(err, crate::error::RegistryError::DuplicateTypeId(1));
    }

    #[test]
    fn owned_extension_roundtrips_and_msgsize_matches() {
        let ext = Extension { type_id: 9, data: vec![1, 2, 3, 4, 5] };
        let mut buf = Vec::new();
        ext.encode(&mut buf);
        assert_eq!(buf.len(), ext.msgsize());
        let (decoded, rest) = Extension::decode(&buf).unwrap();
        assert_eq!(decoded, ext);
        assert!(rest.is_empty());
    }
}
