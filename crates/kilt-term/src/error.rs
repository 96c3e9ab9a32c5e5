// SPDX-License-Identifier: MIT
//
// Error taxonomy for terminal control.
//
// Every variant is fatal to the editor except `OutOfMemory`, which the
// renderer absorbs by flushing whatever part of the frame it managed to
// build. The benign "no byte yet" read never becomes an error at all.

use std::io;

use thiserror::Error;

/// Errors raised by the terminal layer.
#[derive(Debug, Error)]
pub enum TermError {
    /// Reading or applying terminal attributes failed.
    #[error("{op}: {source}")]
    TerminalQuery {
        /// The failing call (`tcgetattr`, `tcsetattr`).
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Neither the window-size query nor the cursor-report fallback worked.
    #[error("unable to determine window size: {reason}")]
    DimensionProbe {
        /// What went wrong in the fallback probe.
        reason: String,
    },

    /// The frame buffer could not grow.
    #[error("out of memory growing frame buffer by {requested} bytes")]
    OutOfMemory {
        /// Size of the append that was refused.
        requested: usize,
    },

    /// A read or write on the terminal failed for a reason other than a
    /// poll timeout.
    #[error("{op}: {source}")]
    Io {
        /// The failing operation (`read`, `write`).
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl TermError {
    /// Build a [`TermError::DimensionProbe`] from anything printable.
    pub(crate) fn probe(reason: impl Into<String>) -> Self {
        Self::DimensionProbe {
            reason: reason.into(),
        }
    }

    /// Capture `errno` for a failed terminal attribute call.
    pub(crate) fn last_os_query(op: &'static str) -> Self {
        Self::TerminalQuery {
            op,
            source: io::Error::last_os_error(),
        }
    }
}

/// Shorthand for results in this crate.
pub type Result<T> = std::result::Result<T, TermError>;
