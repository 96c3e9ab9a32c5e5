// SPDX-License-Identifier: MIT
//
// Per-run terminal session: the raw-mode guard plus the screen size measured
// right after entering raw mode. Built once when the editor starts and owned
// by the loop, which takes the guard back at the end to restore the terminal
// and report the outcome. Dropping a session restores it too.

use crate::terminal::Size;

/// Raw mode held for the session, and the fixed screen size.
#[derive(Debug)]
pub struct Session<G> {
    raw: G,
    size: Size,
}

impl<G> Session<G> {
    /// Bundle an active raw-mode guard with the measured screen size.
    pub const fn new(raw: G, size: Size) -> Self {
        Self { raw, size }
    }

    /// The screen size for the lifetime of the session.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// End the session, handing back the raw-mode guard.
    #[must_use]
    pub fn into_guard(self) -> G {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{RawGuard, Terminal};
    use crate::testing::MockTerminal;

    #[test]
    fn size_is_fixed_at_construction() {
        let size = Size { rows: 24, cols: 80 };
        let session = Session::new((), size);
        assert_eq!(session.size(), size);
    }

    #[test]
    fn dropping_session_restores_terminal() {
        let mut term = MockTerminal::new(None, b"");
        let session = Session::new(term.enter_raw_mode().unwrap(), Size { rows: 1, cols: 1 });
        assert_eq!(term.restored_at(), None);
        drop(session);
        assert_eq!(term.restored_at(), Some(0));
        assert!(!term.restored_explicitly());
    }

    #[test]
    fn guard_comes_back_unrestored() {
        let mut term = MockTerminal::new(None, b"");
        let session = Session::new(term.enter_raw_mode().unwrap(), Size { rows: 1, cols: 1 });
        let guard = session.into_guard();
        assert_eq!(term.restored_at(), None);
        guard.restore().unwrap();
        assert_eq!(term.restored_at(), Some(0));
        assert!(term.restored_explicitly());
    }
}
