// SPDX-License-Identifier: MIT
//
// Single-byte input over a raw-mode terminal.
//
// In raw mode with VMIN=0/VTIME=1, read() returns 0 when a decisecond passes
// without a keypress. That is a poll tick, not end of input, so it is retried
// along with EINTR and EAGAIN. Everything else is a real failure.

use std::io::{self, Read};

use crate::error::{Result, TermError};

/// Block until one byte arrives and return it.
///
/// # Errors
///
/// [`TermError::Io`] if the read fails for any reason other than a poll
/// timeout, an interrupted call, or a would-block.
pub fn read_byte(r: &mut impl Read) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(1) => return Ok(byte[0]),
            Ok(_) => {}
            Err(e) if is_transient(&e) => {}
            Err(source) => return Err(TermError::Io { op: "read", source }),
        }
    }
}

/// Read once, returning `None` if the poll interval elapsed with no input.
///
/// # Errors
///
/// Same as [`read_byte`], except a timeout or would-block is `Ok(None)`
/// instead of a retry. An interrupted read is still retried.
pub fn try_read_byte(r: &mut impl Read) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(1) => return Ok(Some(byte[0])),
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(source) => return Err(TermError::Io { op: "read", source }),
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
