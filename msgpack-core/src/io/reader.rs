//! C4 — the buffered streaming `Reader` (spec §4.4). Wraps any
//! [`std::io::Read`] source and exposes `Peek`/`Skip` with the stability
//! guarantee the spec requires: after a successful `peek(k)`, the first `k`
//! bytes stay valid until the next `skip` or a `peek` with a larger `k`.

use std::io::{self, Read};

use crate::error::{Error, Result};

/// A buffered adapter that turns any [`Read`] into the non-advancing
/// `Peek`/advancing `Skip` pair the codec's streaming API needs.
pub struct Reader<R> {
    inner: R,
    buf: Vec<u8>,
    /// Index into `buf` where unconsumed data starts; bytes before this are
    /// dead space reclaimed on the next fill.
    start: usize,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Reader { inner, buf: Vec::new(), start: 0 }
    }

    #[inline]
    fn available(&self) -> usize {
        self.buf.len() - self.start
    }

    /// Non-advancing: ensures at least `k` bytes are buffered and returns
    /// them. Returns `ErrShortBytes` only once the source is exhausted
    /// before `k` bytes could be assembled.
    pub fn peek(&mut self, k: usize) -> Result<&[u8]> {
        if self.available() < k {
            self.fill_to(k)?;
        }
        Ok(&self.buf[self.start..self.start + k])
    }

    /// Advances past `k` already-peeked bytes. Invalidates any slice
    /// returned by an earlier `peek`.
    pub fn skip(&mut self, k: usize) -> Result<()> {
        if self.available() < k {
            self.fill_to(k)?;
        }
        self.start += k;
        Ok(())
    }

    fn fill_to(&mut self, k: usize) -> Result<()> {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }
        self.buf.reserve(k.saturating_sub(self.buf.len()));
        while self.buf.len() < k {
            let mut chunk = [0u8; 4096];
            let want = (k - self.buf.len()).min(chunk.len());
            let read = read_some(&mut self.inner, &mut chunk[..want])?;
            if read == 0 {
                return Err(Error::ShortBytes { wanted: k, remaining: self.buf.len() });
            }
            self.buf.extend_from_slice(&chunk[..read]);
        }
        Ok(())
    }
}

fn read_some(r: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    loop {
        match r.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return Err(Error::Fatal("i/o error while filling reader")),
        }
    }
}
