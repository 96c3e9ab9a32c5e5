// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window size, and RAII restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and raw fd reads and writes. These are the
// POSIX interfaces for terminal control and have no safe std equivalent.
// Each unsafe block wraps a single call.
#![allow(unsafe_code)]
//
// Raw mode is a guard: `RawMode::enter` snapshots the attributes the terminal
// had before we touched it and hands back a value that puts them back.
// Callers on a normal exit path call `restore()` and get the outcome; drop
// covers early returns and panic unwinding, where a failure can only be
// logged. There is no exit hook to register and no global copy of the
// original attributes.
//
// `Terminal` is the seam the rest of the crate talks through. `Tty` is the
// real device (stdin/stdout as raw fds, no std buffering in between); tests
// substitute a scripted terminal.

use std::fmt;
use std::io::{self, Read, Write};
use std::os::fd::RawFd;

use tracing::{debug, warn};

use crate::error::{Result, TermError};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

impl Size {
    /// A size is usable only if neither dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.rows > 0 && self.cols > 0
    }
}

/// Query the window size of `fd` via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if `fd` is not a terminal, the query fails, or the kernel
/// reports a zero dimension (common on serial consoles and some emulators).
#[must_use]
pub fn get_size(fd: RawFd) -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    let size = Size {
        rows: ws.ws_row,
        cols: ws.ws_col,
    };
    (result == 0 && size.is_valid()).then_some(size)
}

// ─── TerminalMode ───────────────────────────────────────────────────────────

/// Snapshot of a terminal's attributes: the four flag words and the
/// control-character table (which includes the `VMIN`/`VTIME` read policy).
#[derive(Clone, Copy)]
pub struct TerminalMode {
    termios: libc::termios,
}

impl TerminalMode {
    /// Read the current attributes of `fd`.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if `tcgetattr` fails, typically because
    /// `fd` is not a terminal.
    pub fn capture(fd: RawFd) -> Result<Self> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
            return Err(TermError::last_os_query("tcgetattr"));
        }
        Ok(Self { termios })
    }

    /// Apply these attributes to `fd`, discarding unread input first.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if `tcsetattr` fails.
    pub fn apply(&self, fd: RawFd) -> Result<()> {
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const self.termios) } != 0 {
            return Err(TermError::last_os_query("tcsetattr"));
        }
        Ok(())
    }

    /// Derive the editor's raw mode from this snapshot.
    ///
    /// Input arrives byte by byte with no echo, no line editing, no signals
    /// from Ctrl-C/Ctrl-Z, no flow control, no CR→NL translation and no
    /// output post-processing. Characters are 8 bits wide. Reads return after
    /// at most one decisecond even when nothing was typed.
    #[must_use]
    pub fn raw(&self) -> Self {
        let mut t = self.termios;
        t.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        t.c_oflag &= !libc::OPOST;
        t.c_cflag |= libc::CS8;
        t.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        t.c_cc[libc::VMIN] = 0;
        t.c_cc[libc::VTIME] = 1;
        Self { termios: t }
    }
}

impl PartialEq for TerminalMode {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.termios, &other.termios);
        a.c_iflag == b.c_iflag
            && a.c_oflag == b.c_oflag
            && a.c_cflag == b.c_cflag
            && a.c_lflag == b.c_lflag
            && a.c_cc == b.c_cc
    }
}

impl Eq for TerminalMode {}

impl fmt::Debug for TerminalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.termios;
        f.debug_struct("TerminalMode")
            .field("iflag", &format_args!("{:#o}", t.c_iflag))
            .field("oflag", &format_args!("{:#o}", t.c_oflag))
            .field("cflag", &format_args!("{:#o}", t.c_cflag))
            .field("lflag", &format_args!("{:#o}", t.c_lflag))
            .field("vmin", &t.c_cc[libc::VMIN])
            .field("vtime", &t.c_cc[libc::VTIME])
            .finish()
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw mode on a terminal, held for as long as this value lives.
///
/// The original attributes are restored exactly once: by
/// [`restore`](Self::restore) if called, otherwise on drop.
///
/// ```no_run
/// use kilt_term::terminal::RawMode;
///
/// let raw = RawMode::enter(libc::STDIN_FILENO)?;
/// // ... read bytes, draw frames ...
/// raw.restore()?;
/// # Ok::<(), kilt_term::TermError>(())
/// ```
#[derive(Debug)]
pub struct RawMode {
    fd: RawFd,
    /// `None` once restored.
    original: Option<TerminalMode>,
}

impl RawMode {
    /// Snapshot `fd`'s attributes and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if the attributes can't be read or the
    /// raw set can't be applied. In the latter case the snapshot is put back
    /// before returning.
    pub fn enter(fd: RawFd) -> Result<Self> {
        let original = TerminalMode::capture(fd)?;

        // Armed before applying, so a failed apply still restores.
        let guard = Self {
            fd,
            original: Some(original),
        };
        original.raw().apply(fd)?;

        debug!(fd, ?original, "entered raw mode");
        Ok(guard)
    }

    /// Put the original attributes back now, reporting failure.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if `tcsetattr` fails.
    pub fn restore(mut self) -> Result<()> {
        self.restore_original()
    }

    fn restore_original(&mut self) -> Result<()> {
        if let Some(original) = self.original.take() {
            original.apply(self.fd)?;
            debug!(fd = self.fd, "restored terminal mode");
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.restore_original() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

impl RawGuard for RawMode {
    fn restore(self) -> Result<()> {
        Self::restore(self)
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// A held raw mode that can be given back with its outcome reported.
///
/// Dropping an unrestored guard still restores, but any failure there can
/// only be logged. Callers that can report errors use [`restore`](Self::restore).
pub trait RawGuard {
    /// Put the terminal's original mode back.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if the device refuses.
    fn restore(self) -> Result<()>;
}

/// A byte-oriented terminal the editor can drive.
///
/// Reads follow raw-mode semantics: `Ok(0)` means the poll interval elapsed
/// with nothing typed, not end of input.
pub trait Terminal: Read + Write {
    /// Holds raw mode until restored or dropped.
    type Guard: RawGuard;

    /// Switch the device into raw mode.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if the device refuses.
    fn enter_raw_mode(&mut self) -> Result<Self::Guard>;

    /// The window size as reported by the OS, if it reports one.
    fn window_size(&self) -> Option<Size>;
}

/// The controlling terminal, read and written through raw file descriptors.
///
/// Writes go straight to `write(2)`; there is no userspace buffer between a
/// flushed frame and the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Tty {
    input: RawFd,
    output: RawFd,
}

impl Tty {
    /// Stdin for input, stdout for output.
    #[must_use]
    pub const fn stdio() -> Self {
        Self::from_raw_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// Use arbitrary descriptors. The caller keeps them open for the
    /// lifetime of the `Tty`.
    #[must_use]
    pub const fn from_raw_fds(input: RawFd, output: RawFd) -> Self {
        Self { input, output }
    }
}

impl Read for Tty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(self.input, buf.as_mut_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.output, buf.as_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Unbuffered: every write() already reached the kernel.
        Ok(())
    }
}

impl Terminal for Tty {
    type Guard = RawMode;

    fn enter_raw_mode(&mut self) -> Result<RawMode> {
        RawMode::enter(self.input)
    }

    fn window_size(&self) -> Option<Size> {
        get_size(self.output)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
