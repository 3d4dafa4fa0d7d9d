// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor tuning and command-line options.

use std::time::Duration;

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::history::DEFAULT_CAPACITY;
use crate::model::Point;
use crate::ops::{ChildPlacement, LayoutSpacing, PASTE_OFFSET};

/// Environment variable holding the log filter (`tracing-subscriber` `EnvFilter` syntax).
pub const LOG_ENV: &str = "MINDWEAVE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_STORE_DIR: &str = ".mindweave";
pub const DEFAULT_OWNER: &str = "local";

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub history_capacity: usize,
    pub autosave_delay: Duration,
    pub child_placement: ChildPlacement,
    pub layout_spacing: LayoutSpacing,
    pub paste_offset: Point,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            child_placement: ChildPlacement::default(),
            layout_spacing: LayoutSpacing::default(),
            paste_offset: PASTE_OFFSET,
        }
    }
}

impl EditorConfig {
    pub fn from_options(options: &CliOptions) -> Self {
        let mut config = Self::default();
        if let Some(capacity) = options.history {
            config.history_capacity = capacity;
        }
        if let Some(ms) = options.autosave_ms {
            config.autosave_delay = Duration::from_millis(ms);
        }
        config
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub help: bool,
    pub store_dir: Option<String>,
    pub owner: Option<String>,
    pub autosave_ms: Option<u64>,
    pub history: Option<usize>,
    pub durable_writes: bool,
}

impl CliOptions {
    pub fn store_dir(&self) -> &str {
        self.store_dir.as_deref().unwrap_or(DEFAULT_STORE_DIR)
    }

    pub fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("{flag} given more than once")]
    Duplicate { flag: &'static str },
    #[error("{flag} needs a value")]
    MissingValue { flag: &'static str },
    #[error("invalid value for {flag}: {value:?}")]
    InvalidValue { flag: &'static str, value: String },
    #[error("unknown option {0:?}")]
    Unknown(String),
}

fn take_value(
    args: &mut impl Iterator<Item = String>,
    slot_is_set: bool,
    flag: &'static str,
) -> Result<String, UsageError> {
    if slot_is_set {
        return Err(UsageError::Duplicate { flag });
    }
    args.next().ok_or(UsageError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, UsageError> {
    raw.parse()
        .map_err(|_| UsageError::InvalidValue { flag, value: raw })
}

pub fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, UsageError> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "--store" => {
                let dir = take_value(&mut args, options.store_dir.is_some(), "--store")?;
                options.store_dir = Some(dir);
            }
            "--owner" => {
                let owner = take_value(&mut args, options.owner.is_some(), "--owner")?;
                options.owner = Some(owner);
            }
            "--autosave-ms" => {
                let raw = take_value(&mut args, options.autosave_ms.is_some(), "--autosave-ms")?;
                options.autosave_ms = Some(parse_number(raw, "--autosave-ms")?);
            }
            "--history" => {
                let raw = take_value(&mut args, options.history.is_some(), "--history")?;
                let capacity: usize = parse_number(raw.clone(), "--history")?;
                if capacity == 0 {
                    return Err(UsageError::InvalidValue {
                        flag: "--history",
                        value: raw,
                    });
                }
                options.history = Some(capacity);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(UsageError::Duplicate {
                        flag: "--durable-writes",
                    });
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(UsageError::Unknown(arg)),
            _ => {
                if options.store_dir.is_some() {
                    return Err(UsageError::Duplicate { flag: "--store" });
                }
                options.store_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{parse_options, CliOptions, EditorConfig, UsageError, DEFAULT_OWNER};

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.owner(), DEFAULT_OWNER);
        assert_eq!(EditorConfig::from_options(&options), EditorConfig::default());
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_options(args(&[
            "--store",
            "maps",
            "--owner",
            "alice",
            "--autosave-ms",
            "250",
            "--history",
            "10",
            "--durable-writes",
        ]))
        .expect("parse options");

        assert_eq!(options.store_dir(), "maps");
        assert_eq!(options.owner(), "alice");
        assert!(options.durable_writes);

        let config = EditorConfig::from_options(&options);
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.autosave_delay, Duration::from_millis(250));
    }

    #[test]
    fn parses_positional_store_dir() {
        let options = parse_options(args(&["some/dir"])).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
    }

    #[rstest]
    #[case::duplicate_flag(&["--owner", "a", "--owner", "b"], UsageError::Duplicate { flag: "--owner" })]
    #[case::positional_and_flag(&["dir", "--store", "other"], UsageError::Duplicate { flag: "--store" })]
    #[case::missing_value(&["--store"], UsageError::MissingValue { flag: "--store" })]
    #[case::not_a_number(&["--autosave-ms", "soon"], UsageError::InvalidValue { flag: "--autosave-ms", value: "soon".to_owned() })]
    #[case::zero_history(&["--history", "0"], UsageError::InvalidValue { flag: "--history", value: "0".to_owned() })]
    #[case::unknown(&["--verbose"], UsageError::Unknown("--verbose".to_owned()))]
    fn rejects_bad_arguments(#[case] raw: &[&str], #[case] expected: UsageError) {
        assert_eq!(parse_options(args(raw)), Err(expected));
    }
}
