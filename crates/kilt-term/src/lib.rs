// SPDX-License-Identifier: MIT
//
// kilt-term — Terminal foundation for the kilt editor.
//
// Owns everything that has to reason about the terminal device itself:
// switching it into raw mode and back, finding out how big it is, and
// getting a complete frame onto the screen in one write. Editing features
// sit on top of this crate and never touch termios or escape sequences
// directly.
//
// Like the rest of the workspace, this talks to the terminal through raw
// termios and hand-written ANSI sequences rather than a TUI framework.

#[cfg(not(unix))]
compile_error!("kilt-term drives the terminal through termios and only builds on unix");

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod probe;
pub mod render;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, TermError};
