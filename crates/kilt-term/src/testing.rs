// SPDX-License-Identifier: MIT
//
// Scripted terminal for unit tests.
//
// Input is a fixed byte script; once it runs out, reads behave like a raw
// mode poll timeout and return 0. Output is captured, and the raw-mode guard
// records how many output bytes existed when it restored, and whether that
// was an explicit restore or a drop, so tests can check what reached the
// screen before the terminal was handed back.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::error::{Result, TermError};
use crate::terminal::{RawGuard, Size, Terminal};

pub(crate) struct MockTerminal {
    size: Option<Size>,
    input: VecDeque<u8>,
    output: Rc<RefCell<Vec<u8>>>,
    restored_at: Rc<Cell<Option<usize>>>,
    restored_explicitly: Rc<Cell<bool>>,
    fail_writes: bool,
    fail_raw_mode: bool,
    fail_restore: bool,
}

impl MockTerminal {
    pub(crate) fn new(size: Option<Size>, input: &[u8]) -> Self {
        Self {
            size,
            input: input.iter().copied().collect(),
            output: Rc::default(),
            restored_at: Rc::default(),
            restored_explicitly: Rc::default(),
            fail_writes: false,
            fail_raw_mode: false,
            fail_restore: false,
        }
    }

    /// Every write fails with `BrokenPipe`.
    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// `enter_raw_mode` fails as if stdin were not a terminal.
    pub(crate) fn failing_raw_mode(mut self) -> Self {
        self.fail_raw_mode = true;
        self
    }

    /// An explicit restore fails as if the descriptor had been closed.
    pub(crate) fn failing_restore(mut self) -> Self {
        self.fail_restore = true;
        self
    }

    pub(crate) fn output(&self) -> Vec<u8> {
        self.output.borrow().clone()
    }

    pub(crate) fn unread(&self) -> usize {
        self.input.len()
    }

    /// Output length at the moment raw mode was restored, if it was.
    pub(crate) fn restored_at(&self) -> Option<usize> {
        self.restored_at.get()
    }

    /// Whether the restore came from `RawGuard::restore` rather than drop.
    pub(crate) fn restored_explicitly(&self) -> bool {
        self.restored_explicitly.get()
    }
}

impl Read for MockTerminal {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.input.len());
        for (slot, byte) in buf.iter_mut().zip(self.input.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.output.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records the restore point, on explicit restore or on drop.
pub(crate) struct MockGuard {
    output: Rc<RefCell<Vec<u8>>>,
    restored_at: Rc<Cell<Option<usize>>>,
    restored_explicitly: Rc<Cell<bool>>,
    fail_restore: bool,
    /// Cleared once restore has been attempted.
    armed: bool,
}

impl MockGuard {
    fn record(&mut self) {
        assert!(self.restored_at.get().is_none(), "terminal restored twice");
        self.armed = false;
        self.restored_at.set(Some(self.output.borrow().len()));
    }
}

impl RawGuard for MockGuard {
    fn restore(mut self) -> Result<()> {
        self.armed = false;
        if self.fail_restore {
            return Err(TermError::TerminalQuery {
                op: "tcsetattr",
                source: io::Error::from_raw_os_error(libc::EBADF),
            });
        }
        self.record();
        self.restored_explicitly.set(true);
        Ok(())
    }
}

impl Drop for MockGuard {
    fn drop(&mut self) {
        if self.armed {
            self.record();
        }
    }
}

impl Terminal for MockTerminal {
    type Guard = MockGuard;

    fn enter_raw_mode(&mut self) -> Result<MockGuard> {
        if self.fail_raw_mode {
            return Err(TermError::TerminalQuery {
                op: "tcgetattr",
                source: io::Error::from_raw_os_error(libc::ENOTTY),
            });
        }
        Ok(MockGuard {
            output: Rc::clone(&self.output),
            restored_at: Rc::clone(&self.restored_at),
            restored_explicitly: Rc::clone(&self.restored_explicitly),
            fail_restore: self.fail_restore,
            armed: true,
        })
    }

    fn window_size(&self) -> Option<Size> {
        self.size
    }
}
