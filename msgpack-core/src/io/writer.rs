//! C4 — the buffered streaming `Writer` (spec §4.4). Wraps any
//! [`std::io::Write`] sink and owns an output buffer plus an index `n`.
//! `require(k)` ensures `k` contiguous writable bytes are available,
//! flushing to the sink first if the buffer is full.

use std::io::{self, Write};

use crate::error::{Error, Result};

/// A buffered adapter over any [`Write`] sink. On a flush error the writer
/// is left "dead": its buffer is reset and every subsequent write fails
/// immediately, since the stream's framing can no longer be trusted
/// (spec §4.4, §7).
pub struct Writer<W> {
    sink: W,
    buf: Vec<u8>,
    n: usize,
    dead: bool,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Self {
        Self::with_capacity(sink, 4096)
    }

    pub fn with_capacity(sink: W, capacity: usize) -> Self {
        Writer { sink, buf: vec![0u8; capacity], n: 0, dead: false }
    }

    /// Ensures `k` contiguous writable bytes starting at the returned
    /// offset, flushing first if the current buffer cannot fit them. Never
    /// corrupts the sink on error: if `require` fails, nothing has been
    /// written to `sink` that the caller didn't already flush themselves.
    pub fn require(&mut self, k: usize) -> Result<(&mut [u8], usize)> {
        if self.dead {
            return Err(Error::Fatal("writer is dead after a failed flush"));
        }
        if self.n + k > self.buf.len() {
            if k > self.buf.len() {
                self.buf.resize(k, 0);
            }
            self.flush_buffered()?;
        }
        let offset = self.n;
        if offset + k > self.buf.len() {
            self.buf.resize(offset + k, 0);
        }
        Ok((&mut self.buf[..], offset))
    }

    /// Commits `k` bytes written at the offset returned by `require`,
    /// advancing the buffer index.
    pub fn commit(&mut self, k: usize) {
        self.n += k;
    }

    /// Writes the current buffer to the sink and resets it. On error the
    /// writer becomes dead; callers must discard it (spec §4.4).
    pub fn flush(&mut self) -> Result<()> {
        self.flush_buffered()?;
        self.sink.flush().map_err(|_| self.mark_dead())
    }

    fn flush_buffered(&mut self) -> Result<()> {
        if self.n == 0 {
            return Ok(());
        }
        let res = self.sink.write_all(&self.buf[..self.n]);
        self.n = 0;
        res.map_err(|_| self.mark_dead())
    }

    fn mark_dead(&mut self) -> Error {
        self.dead = true;
        Error::Fatal("writer sink returned an i/o error")
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// A writer-shaped error conversion hook for sinks that can't satisfy
/// `Write` directly (e.g. a canceled channel); see spec §5 "Cancellation".
pub fn io_error_is_cancellation(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe)
}
