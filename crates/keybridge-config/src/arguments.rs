//! Filters the host's argument list down to configuration flags.
//!
//! Browsers start native messaging hosts with positional arguments of their
//! own: Chromium passes the calling extension origin, Firefox passes the
//! manifest path and the extension id, and Windows builds of Chromium append
//! `--parent-window=<handle>`. None of these are configuration, so only the
//! flags listed in [`CONFIG_CLI_FLAGS`] (with their values) reach the loader.

use std::ffi::{OsStr, OsString};

/// Long flags recognised by the configuration loader.
pub const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--audit-log",
    "--temp-dir",
    "--gpg-program",
    "--gnupg-home",
    "--max-frame-bytes",
];

/// Result of separating configuration flags from browser-supplied arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgumentSplit {
    /// Program name followed by recognised configuration flags and values.
    pub config_arguments: Vec<OsString>,
    /// First positional argument, normally the calling extension origin.
    pub caller: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Skip;
    }

    let mut parts = text.splitn(2, '=');
    let flag = parts.next().unwrap_or_default();
    let has_inline_value = parts.next().is_some();

    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Skip
    }
}

/// Splits raw process arguments into loader arguments and the caller origin.
///
/// Unlike a conventional CLI, unrecognised arguments never stop the scan:
/// browsers may place their own arguments before or after configuration
/// flags.
#[must_use]
pub fn split_config_arguments<I, T>(args: I) -> ConfigArgumentSplit
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut iter = args.into_iter().map(Into::into);
    let mut split = ConfigArgumentSplit::default();

    let Some(program) = iter.next() else {
        return split;
    };
    split.config_arguments.push(program);

    while let Some(argument) = iter.next() {
        match classify(&argument) {
            FlagAction::Include { needs_value } => {
                split.config_arguments.push(argument);
                if needs_value {
                    if let Some(value) = iter.next() {
                        split.config_arguments.push(value);
                    }
                }
            }
            FlagAction::Skip => {
                let text = argument.to_string_lossy();
                if split.caller.is_none() && !text.starts_with('-') {
                    split.caller = Some(text.into_owned());
                }
            }
        }
    }

    split
}
