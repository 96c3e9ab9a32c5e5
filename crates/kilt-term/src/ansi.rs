// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write VT100 sequences to any `impl Write`. No state and
// no decisions about when to emit; the renderer and the probe own that. When
// the writer is a `FrameBuffer` the only possible failure is the buffer
// refusing to grow.
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to the top-left cell (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Push the cursor to the bottom-right corner.
///
/// CUF and CUD stop at the screen edge, so a large count lands on the last
/// cell without knowing the screen size. CUP can't do this: it is undefined
/// for out-of-range positions.
///
/// Both counts are 999, so screens wider than 99 columns still reach the
/// right edge.
#[inline]
pub fn cursor_far_corner(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C\x1b[999B")
}

/// Ask the terminal to report the cursor position (DSR 6).
///
/// The reply arrives on the input stream as `ESC [ rows ; cols R`.
#[inline]
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2). Does not move the cursor.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Erase from the cursor to the end of the line (EL 0).
#[inline]
pub fn erase_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// The byte a terminal sends for Ctrl + `key`.
///
/// Control strips bits 5 and 6, which maps both `q` and `Q` to `0x11`.
#[inline]
#[must_use]
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_home_sequence() {
        assert_eq!(emit(|w| cursor_home(w)), "\x1b[H");
    }

    #[test]
    fn cursor_hide_sequence() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
    }

    #[test]
    fn cursor_show_sequence() {
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn far_corner_moves_right_then_down() {
        assert_eq!(emit(|w| cursor_far_corner(w)), "\x1b[999C\x1b[999B");
    }

    #[test]
    fn cursor_position_request() {
        assert_eq!(emit(|w| request_cursor_position(w)), "\x1b[6n");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_screen_sequence() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
    }

    #[test]
    fn erase_line_sequence() {
        assert_eq!(emit(|w| erase_line(w)), "\x1b[K");
    }

    // ── Keys ────────────────────────────────────────────────────────────

    #[test]
    fn ctrl_q_is_dc1() {
        assert_eq!(ctrl_key(b'q'), 0x11);
    }

    #[test]
    fn ctrl_ignores_case() {
        assert_eq!(ctrl_key(b'Q'), ctrl_key(b'q'));
    }
}
