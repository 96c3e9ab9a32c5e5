// SPDX-License-Identifier: MIT
//
// Output buffering for whole-frame writes.
//
// A frame is dozens of escape sequences and fragments of text. Sent one by
// one, the terminal would paint each as it arrives and the user would watch
// the screen being redrawn. Accumulating the frame here and handing it to the
// terminal in one write makes the redraw appear all at once.
//
// Growth is fallible: a refused allocation (or an exceeded byte budget) leaves
// what is already in the buffer untouched, so the caller can still flush a
// truncated frame instead of losing the whole thing.

use std::io::{self, Write};

use crate::error::{Result, TermError};

/// Default capacity: comfortably more than a full-screen frame of
/// placeholder rows, so ordinary frames never reallocate.
const DEFAULT_CAPACITY: usize = 16_384;

/// An append-only byte buffer holding one frame until it is flushed.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    /// Hard ceiling on `buf.len()`.
    limit: usize,
}

impl FrameBuffer {
    /// Create an empty buffer with the default capacity and no byte budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Create an empty buffer that refuses to grow past `limit` bytes.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY.min(limit)),
            limit,
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `bytes` after the existing content.
    ///
    /// # Errors
    ///
    /// [`TermError::OutOfMemory`] if the buffer can't grow by `bytes.len()`.
    /// Nothing is appended in that case.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let oom = || TermError::OutOfMemory {
            requested: bytes.len(),
        };
        if self.limit - self.buf.len() < bytes.len() {
            return Err(oom());
        }
        self.buf.try_reserve(bytes.len()).map_err(|_| oom())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Write the whole frame to `w`, then flush `w`.
    ///
    /// Short writes are retried until every byte is out, so a frame is never
    /// silently truncated.
    ///
    /// # Errors
    ///
    /// [`TermError::Io`] if the writer fails outright.
    pub fn flush_to(&self, w: &mut impl Write) -> Result<()> {
        let io_err = |source| TermError::Io { op: "write", source };
        if !self.buf.is_empty() {
            w.write_all(&self.buf).map_err(io_err)?;
        }
        w.flush().map_err(io_err)
    }
}

impl Write for FrameBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. The real flush is flush_to().
        Ok(())
    }
}

/// Undo the wrapping done by `FrameBuffer`'s `Write` impl.
///
/// Escape sequences are written through `io::Write`, which can only carry
/// an `io::Error`; this gets the original [`TermError`] back out.
pub(crate) fn unwrap_write_error(e: io::Error) -> TermError {
    match e.downcast::<TermError>() {
        Ok(err) => err,
        Err(source) => TermError::Io { op: "write", source },
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
