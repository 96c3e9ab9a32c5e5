// SPDX-License-Identifier: MIT
//
// Editor loop — the heartbeat of the editor.
//
// Starting: enter raw mode, measure the screen. Running: draw a frame, wait
// for one byte, act on it, repeat. Terminated: the screen is wiped and the
// terminal's original mode is back.
//
// Single-threaded and synchronous. The only place the loop waits is the
// byte read, and raw mode bounds each wait to one decisecond before the read
// is quietly retried, so there are no threads, channels or timers here.
//
// The order of teardown matters. The wipe (`ESC[2J ESC[H`) is written while
// raw mode is still held, and only then is the original mode restored. On
// quit and on errors the restore is explicit and its failure is fatal; a
// panic unwinding through `run` restores through the guard's drop instead.

use tracing::{debug, error, info, trace};

use crate::ansi;
use crate::error::{Result, TermError};
use crate::input::read_byte;
use crate::output::{FrameBuffer, unwrap_write_error};
use crate::probe::probe;
use crate::render::ScreenRenderer;
use crate::session::Session;
use crate::terminal::{RawGuard, Terminal};

// ─── Action ──────────────────────────────────────────────────────────────────

/// What the loop does after reading a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop cleanly.
    Quit,
}

/// Where the loop is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Entering raw mode and measuring the screen.
    Starting,
    /// Drawing frames and reading input.
    Running,
    /// Finished, successfully or not. Final.
    Terminated,
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Tunables for the loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// The byte that ends the session. Default: Ctrl-Q.
    pub quit_byte: u8,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            quit_byte: ansi::ctrl_key(b'q'),
        }
    }
}

// ─── EditorLoop ──────────────────────────────────────────────────────────────

/// Drives one editor session on a terminal.
///
/// ```no_run
/// use kilt_term::event_loop::EditorLoop;
/// use kilt_term::terminal::Tty;
///
/// let mut editor = EditorLoop::new(Tty::stdio());
/// editor.run()?; // returns after Ctrl-Q, terminal restored
/// # Ok::<(), kilt_term::TermError>(())
/// ```
pub struct EditorLoop<T: Terminal> {
    term: T,
    config: LoopConfig,
    state: LoopState,
}

impl<T: Terminal> EditorLoop<T> {
    /// Create a loop with the default configuration.
    pub fn new(term: T) -> Self {
        Self::with_config(term, LoopConfig::default())
    }

    /// Create a loop with a custom configuration.
    pub const fn with_config(term: T, config: LoopConfig) -> Self {
        Self {
            term,
            config,
            state: LoopState::Starting,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// The terminal being driven.
    #[inline]
    #[must_use]
    pub const fn terminal(&self) -> &T {
        &self.term
    }

    /// Decide what a byte means. Only the quit byte does anything yet.
    #[must_use]
    pub const fn dispatch(&self, byte: u8) -> Action {
        if byte == self.config.quit_byte {
            Action::Quit
        } else {
            Action::Continue
        }
    }

    /// Run the session to completion.
    ///
    /// Returns `Ok(())` when the quit byte is read. On any error the screen
    /// is wiped on a best-effort basis before the error is returned. Either
    /// way restoring the terminal's original mode has been attempted by the
    /// time this returns, and the loop is [`LoopState::Terminated`].
    ///
    /// # Errors
    ///
    /// Any [`TermError`] from entering raw mode, probing the size, terminal
    /// I/O, or restoring the original mode. All of them are fatal to the
    /// session.
    pub fn run(&mut self) -> Result<()> {
        self.state = LoopState::Starting;
        let result = self.run_inner();
        self.state = LoopState::Terminated;
        result
    }

    fn run_inner(&mut self) -> Result<()> {
        let raw = match self.term.enter_raw_mode() {
            Ok(raw) => raw,
            Err(e) => return Err(self.abort(e)),
        };
        let size = match probe(&mut self.term) {
            Ok(size) => size,
            Err(e) => {
                let e = self.abort(e);
                return release(raw, Err(e));
            }
        };
        let session = Session::new(raw, size);

        info!(rows = size.rows, cols = size.cols, "session started");
        self.state = LoopState::Running;

        let outcome = match self.run_session(&session) {
            Ok(()) => {
                debug!("quit requested");
                Ok(())
            }
            Err(e) => Err(self.abort(e)),
        };
        // The screen is wiped by now; raw mode goes last.
        release(session.into_guard(), outcome)
    }

    /// Render, read, dispatch until quit.
    fn run_session(&mut self, session: &Session<T::Guard>) -> Result<()> {
        let renderer = ScreenRenderer::new(session.size().rows);

        loop {
            renderer.render(&mut self.term)?;

            let byte = read_byte(&mut self.term)?;
            match self.dispatch(byte) {
                Action::Quit => return self.wipe(),
                Action::Continue => trace!(byte, "ignored input"),
            }
        }
    }

    /// Clear the screen and home the cursor, in one write.
    fn wipe(&mut self) -> Result<()> {
        let mut frame = FrameBuffer::new();
        ansi::clear_screen(&mut frame)
            .and_then(|()| ansi::cursor_home(&mut frame))
            .map_err(unwrap_write_error)?;
        frame.flush_to(&mut self.term)
    }

    /// Best-effort wipe on the way out of a failed session.
    fn abort(&mut self, e: TermError) -> TermError {
        error!(error = %e, "terminal session failed");
        if let Err(wipe_err) = self.wipe() {
            debug!(error = %wipe_err, "could not clear screen");
        }
        e
    }
}

/// Restore the terminal after a session ended with `outcome`.
///
/// A restore failure is fatal and is returned when the session itself
/// succeeded. When both failed, the session's error wins and the restore
/// failure is logged.
fn release(guard: impl RawGuard, outcome: Result<()>) -> Result<()> {
    match (outcome, guard.restore()) {
        (Ok(()), restored) => restored,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            error!(error = %restore_err, "failed to restore terminal mode");
            Err(e)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
