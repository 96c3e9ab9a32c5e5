// SPDX-License-Identifier: MIT
//
// kilt — a small terminal screen editor.
//
// This binary wires the process to the terminal crate:
//
//   kilt-term → raw mode, window size, frame rendering, editor loop
//
// Startup reads the environment for logging, hands stdin/stdout to the
// editor loop, and turns the loop's outcome into an exit status. By the time
// `run` returns the terminal is back in its original mode, so any error can
// be printed normally.

mod config;

use std::fs::OpenOptions;
use std::io;
use std::process;
use std::sync::Mutex;

use kilt_term::event_loop::EditorLoop;
use kilt_term::terminal::Tty;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Send `tracing` output to the configured log file, if any.
///
/// Never logs to stdout or stderr: both are the editor's screen.
fn init_logging(config: &Config) -> io::Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)
}

fn main() {
    let config = Config::from_env();

    if let Err(e) = init_logging(&config) {
        eprintln!("kilt: logging disabled: {e}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "kilt starting");

    let mut editor = EditorLoop::new(Tty::stdio());
    let result = editor.run();
    if let Err(e) = &result {
        eprintln!("kilt: {e}");
    }

    info!("kilt exiting");
    process::exit(exit_code(&result));
}

/// 0 after a clean quit, 1 after any fatal terminal error.
const fn exit_code(result: &kilt_term::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kilt_term::TermError;

    #[test]
    fn clean_quit_exits_zero() {
        assert_eq!(exit_code(&Ok(())), 0);
    }

    #[test]
    fn fatal_errors_exit_one() {
        let failures = [
            TermError::TerminalQuery {
                op: "tcsetattr",
                source: io::Error::from(io::ErrorKind::InvalidInput),
            },
            TermError::DimensionProbe {
                reason: "terminal did not answer".to_owned(),
            },
            TermError::OutOfMemory { requested: 64 },
            TermError::Io {
                op: "read",
                source: io::Error::from(io::ErrorKind::BrokenPipe),
            },
        ];
        for err in failures {
            assert_eq!(exit_code(&Err(err)), 1);
        }
    }

    #[test]
    fn logging_without_path_is_noop() {
        init_logging(&Config::default()).unwrap();
    }

    #[test]
    fn logging_rejects_bad_filter() {
        let dir = std::env::temp_dir().join(format!("kilt-test-{}", process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = Config {
            log_path: Some(dir.join("kilt.log")),
            log_filter: "kilt=loud".to_owned(),
        };

        let err = init_logging(&config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn logging_unwritable_path_fails() {
        let config = Config {
            log_path: Some("/nonexistent-dir/kilt.log".into()),
            log_filter: "info".to_owned(),
        };
        assert!(init_logging(&config).is_err());
    }
}
