// SPDX-License-Identifier: MIT
//
// Window size discovery.
//
// The kernel usually knows the window size (TIOCGWINSZ). When it doesn't, or
// reports zero columns, ask the terminal itself: push the cursor into the
// bottom-right corner, request a cursor position report, and read the answer
// off the input stream. The corner's coordinates are the screen size.
//
// The reply is read into a fixed-size buffer. A terminal that never sends
// the terminator fails the probe once the buffer is full or input goes quiet
// for a poll interval; it can't make us wait forever.

use tracing::debug;

use crate::ansi;
use crate::error::{Result, TermError};
use crate::input::try_read_byte;
use crate::output::FrameBuffer;
use crate::terminal::{Size, Terminal};

/// Longest cursor position report accepted, terminator included.
pub const REPORT_BOUND: usize = 32;

/// Determine the terminal's size, preferring the kernel's answer.
///
/// # Errors
///
/// [`TermError::DimensionProbe`] if the kernel has no size and the cursor
/// report can't be requested, read or parsed.
pub fn probe(term: &mut impl Terminal) -> Result<Size> {
    if let Some(size) = term.window_size() {
        debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
        return Ok(size);
    }

    let size = probe_cursor_report(term)?;
    debug!(rows = size.rows, cols = size.cols, "window size from cursor report");
    Ok(size)
}

/// The fallback: measure the screen by where the cursor ends up.
fn probe_cursor_report(term: &mut impl Terminal) -> Result<Size> {
    let mut request = FrameBuffer::new();
    ansi::cursor_far_corner(&mut request)
        .and_then(|()| ansi::request_cursor_position(&mut request))
        .map_err(|e| TermError::probe(format!("composing request: {e}")))?;
    request
        .flush_to(term)
        .map_err(|e| TermError::probe(format!("sending request: {e}")))?;

    let mut reply = Vec::with_capacity(REPORT_BOUND);
    while reply.len() < REPORT_BOUND {
        match try_read_byte(term) {
            Ok(Some(b'R')) => {
                return parse_cursor_report(&reply)
                    .ok_or_else(|| TermError::probe("malformed cursor position report"));
            }
            Ok(Some(byte)) => reply.push(byte),
            Ok(None) => return Err(TermError::probe("terminal did not answer")),
            Err(e) => return Err(TermError::probe(format!("reading reply: {e}"))),
        }
    }
    Err(TermError::probe("cursor position report too long"))
}

/// Parse the body of a cursor position report, `ESC [ rows ; cols`, with
/// the terminating `R` already stripped.
///
/// Both numbers must be plain positive decimals.
#[must_use]
pub fn parse_cursor_report(body: &[u8]) -> Option<Size> {
    let params = body.strip_prefix(b"\x1b[")?;
    let sep = params.iter().position(|&b| b == b';')?;
    let size = Size {
        rows: parse_decimal(&params[..sep])?,
        cols: parse_decimal(&params[sep + 1..])?,
    };
    size.is_valid().then_some(size)
}

fn parse_decimal(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
