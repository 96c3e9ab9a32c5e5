// SPDX-License-Identifier: MIT
//
// Screen rendering — one frame, one write.
//
// Each frame hides the cursor, homes it, draws every row, homes it again and
// shows it. Rows are erased to end-of-line as they are drawn instead of
// clearing the whole screen first, so nothing blanks between frames. The last
// row never gets a trailing newline: that would scroll the terminal by one.

use std::io::Write;

use tracing::{trace, warn};

use crate::ansi;
use crate::error::{Result, TermError};
use crate::output::{FrameBuffer, unwrap_write_error};

/// Drawn at the start of every row that has no content.
pub const ROW_MARKER: &[u8] = b"~";

/// Draws full-screen frames of a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct ScreenRenderer {
    rows: u16,
    /// Byte budget for each frame's buffer.
    frame_limit: usize,
}

impl ScreenRenderer {
    /// A renderer for a screen `rows` tall.
    #[must_use]
    pub const fn new(rows: u16) -> Self {
        Self {
            rows,
            frame_limit: usize::MAX,
        }
    }

    /// Cap each frame's buffer at `limit` bytes.
    #[must_use]
    pub const fn with_frame_limit(mut self, limit: usize) -> Self {
        self.frame_limit = limit;
        self
    }

    /// Compose a frame and write it to `out` in one flush.
    ///
    /// If the frame buffer can't grow, the part composed so far is still
    /// flushed and the frame counts as drawn.
    ///
    /// # Errors
    ///
    /// [`TermError::Io`] if writing to `out` fails.
    pub fn render(&self, out: &mut impl Write) -> Result<()> {
        let mut frame = FrameBuffer::with_limit(self.frame_limit);

        match self.compose(&mut frame) {
            Ok(()) => {}
            Err(TermError::OutOfMemory { requested }) => {
                warn!(requested, composed = frame.len(), "frame truncated");
            }
            Err(e) => return Err(e),
        }

        trace!(bytes = frame.len(), "flushing frame");
        frame.flush_to(out)
        // `frame` is dropped here whether or not the flush succeeded.
    }

    /// Append the frame's escape sequences and rows to `frame`.
    fn compose(&self, frame: &mut FrameBuffer) -> Result<()> {
        ansi::cursor_hide(frame).map_err(unwrap_write_error)?;
        ansi::cursor_home(frame).map_err(unwrap_write_error)?;

        for y in 0..self.rows {
            frame.append(ROW_MARKER)?;
            ansi::erase_line(frame).map_err(unwrap_write_error)?;
            if y + 1 < self.rows {
                frame.append(b"\r\n")?;
            }
        }

        ansi::cursor_home(frame).map_err(unwrap_write_error)?;
        ansi::cursor_show(frame).map_err(unwrap_write_error)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
