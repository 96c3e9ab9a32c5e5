// SPDX-License-Identifier: MIT
//
// Runtime configuration, read from the environment.
//
// The screen belongs to the editor, so logs can only go to a file, and only
// when one is asked for.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Log file location.
pub const LOG_PATH_VAR: &str = "KILT_LOG";
/// `EnvFilter` directives for the log file.
pub const LOG_FILTER_VAR: &str = "KILT_LOG_FILTER";

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings for one run of the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where to append log output. `None` disables logging.
    pub log_path: Option<PathBuf>,
    /// Filter directives, e.g. `kilt_term=debug`.
    pub log_filter: String,
}

impl Config {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Read settings through `lookup`. Empty values count as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let var = |key| lookup(key).filter(|v| !v.is_empty());

        Self {
            log_path: var(LOG_PATH_VAR).map(PathBuf::from),
            log_filter: var(LOG_FILTER_VAR)
                .and_then(|v| v.into_string().ok())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
