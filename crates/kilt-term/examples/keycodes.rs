// SPDX-License-Identifier: MIT
//
// kilt-term keycodes — print what each keypress sends in raw mode.
//
// Every byte read is shown as its decimal value, plus the character itself
// when it is printable. Arrow keys, function keys and Alt chords show up as
// multi-byte escape sequences; Ctrl chords as single control bytes. Press
// `q` to quit.
//
// Usage:
//   cargo run -p kilt-term --example keycodes

use std::io::Write;
use std::process;

use kilt_term::TermError;
use kilt_term::input::read_byte;
use kilt_term::terminal::{Terminal, Tty};

/// One line of output. Output post-processing is off, so lines end in CRLF.
fn describe(byte: u8) -> String {
    if byte.is_ascii_control() {
        format!("{byte}\r\n")
    } else {
        format!("{byte} ('{}')\r\n", char::from(byte))
    }
}

fn echo_keys(tty: &mut Tty) -> Result<(), TermError> {
    loop {
        let byte = read_byte(tty)?;
        if byte == b'q' {
            return Ok(());
        }
        tty.write_all(describe(byte).as_bytes())
            .map_err(|source| TermError::Io { op: "write", source })?;
    }
}

fn run() -> Result<(), TermError> {
    let mut tty = Tty::stdio();
    let raw = tty.enter_raw_mode()?;

    let echoed = echo_keys(&mut tty);
    let restored = raw.restore();
    echoed.and(restored)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("keycodes: {e}");
        process::exit(1);
    }
}
