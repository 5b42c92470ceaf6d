//! Command resolution and dispatch
//!
//! Every top level command, built-in or alias, is a [`command::Command`]. The
//! built-ins (`jobs`, `start`, `config`) are merged with the aliases read from
//! configuration into a [`registry::CommandRegistry`], which is built once per
//! invocation and dispatches the requested command name.
//!
//! Aliases either point at a built-in by name, or start with `!` and are
//! evaluated by a shell (see [`shell::ShellEvalCommand`]).

use std::collections::BTreeMap;

use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use thiserror::Error;

use crate::config_file::ConfigError;
use crate::jenkins::RemoteError;
use crate::jenkins::pattern::PatternError;

pub mod alias;
pub mod command;
pub mod config;
pub mod jobs;
pub mod registry;
pub mod shell;
pub mod start;

use command::Command;

/// Errors surfaced by command dispatch
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("{0}")]
    Validation(String),
    #[error("Could not find a {interpreter} installation to evaluate alias {alias}, please install {interpreter}")]
    InterpreterMissing { interpreter: String, alias: String },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Failed evaluating alias {alias}: {reason}")]
    Execution { alias: String, reason: String },
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
    #[error("{command}: {message}")]
    Usage { command: String, message: String },
}

/// The built-in commands, keyed by name
#[must_use]
pub fn builtin_commands() -> BTreeMap<String, Command> {
    [jobs::command(), start::command(), config::command()]
        .into_iter()
        .map(|command| (command.name().to_string(), command))
        .collect()
}

/// Rewrite single dash long flags (`-save`, `-version`) to the `--save` form clap expects.
///
/// Only leading flags are rewritten; the first positional argument ends flag
/// parsing. Flags in `value_flags` consume the argument that follows them, a
/// short one written inline (`-h=ci`) is split into `-h ci`.
#[must_use]
pub fn expand_single_dash_flags(
    args: &[String],
    long_flags: &[&str],
    value_flags: &[&str],
) -> Vec<String> {
    let mut expanded = Vec::with_capacity(args.len());
    let mut takes_value = false;
    for (i, arg) in args.iter().enumerate() {
        if takes_value {
            takes_value = false;
            expanded.push(arg.clone());
            continue;
        }
        if arg == "--" || !arg.starts_with('-') {
            expanded.extend(args[i..].iter().cloned());
            break;
        }

        let name = arg.trim_start_matches('-');
        let (flag, inline_value) = match name.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (name, None),
        };
        takes_value = inline_value.is_none() && value_flags.contains(&flag);

        if !arg.starts_with("--") && long_flags.contains(&flag) {
            expanded.push(format!("-{arg}"));
        } else if let Some(value) = inline_value.filter(|_| {
            !arg.starts_with("--") && flag.len() == 1 && value_flags.contains(&flag)
        }) {
            expanded.push(format!("-{flag}"));
            expanded.push(value.to_string());
        } else {
            expanded.push(arg.clone());
        }
    }
    expanded
}

/// Parse the arguments of a built-in, `None` means help was requested and printed.
pub(crate) fn parse_args<T: Parser>(
    args: &[String],
    long_flags: &[&str],
) -> Result<Option<T>, CommandError> {
    match T::try_parse_from(expand_single_dash_flags(args, long_flags, &[])) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            Ok(None)
        }
        Err(e) => Err(usage_error(T::command().get_name(), &e)),
    }
}

/// Keep only the first line of a clap error, without its `error: ` prefix.
fn usage_error(command: &str, error: &clap::Error) -> CommandError {
    let rendered = error.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string();
    CommandError::Usage {
        command: command.to_string(),
        message,
    }
}

/// Parse a boolean flag value, accepting the spellings `1 t T true TRUE True` and
/// `0 f F false FALSE False`.
pub(crate) fn parse_flag_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("invalid boolean value {value:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_builtin_names() {
        let names: Vec<String> = builtin_commands().into_keys().collect();
        assert_eq!(names, vec!["config", "jobs", "start"]);
    }

    #[test]
    fn test_expand_long_flags() {
        assert_eq!(
            expand_single_dash_flags(&args(&["-save", "host", "-x"]), &["save"], &[]),
            args(&["--save", "host", "-x"])
        );
        assert_eq!(
            expand_single_dash_flags(&args(&["--save", "-save=1"]), &["save"], &[]),
            args(&["--save", "--save=1"])
        );
    }

    #[test]
    fn test_expand_stops_at_first_positional() {
        assert_eq!(
            expand_single_dash_flags(
                &args(&["-h", "ci", "-version", "mvn", "-version"]),
                &["version"],
                &["h"]
            ),
            args(&["-h", "ci", "--version", "mvn", "-version"])
        );
    }

    #[test]
    fn test_expand_inline_short_value_flag() {
        assert_eq!(
            expand_single_dash_flags(
                &args(&["-u", "bob", "-t=abc", "jobs", "-d"]),
                &["token"],
                &["u", "t", "token"]
            ),
            args(&["-u", "bob", "-t", "abc", "jobs", "-d"])
        );
        assert_eq!(
            expand_single_dash_flags(&args(&["-h=http://x=y", "jobs"]), &[], &["h"]),
            args(&["-h", "http://x=y", "jobs"])
        );
        assert_eq!(
            expand_single_dash_flags(&args(&["-token=abc", "jobs"]), &["token"], &["token"]),
            args(&["--token=abc", "jobs"])
        );
    }

    #[test]
    fn test_parse_flag_bool() {
        for value in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_flag_bool(value), Ok(true), "{value}");
        }
        for value in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_flag_bool(value), Ok(false), "{value}");
        }
        assert!(parse_flag_bool("yes").is_err());
    }

    #[test]
    fn test_usage_error_is_one_line() {
        let err = parse_args::<jobs::JobsArgs>(&args(&["-x"]), &[]).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, CommandError::Usage { ref command, .. } if command == "jobs"));
        assert!(message.starts_with("jobs: unexpected argument"), "{message}");
        assert!(!message.contains("error:"), "{message}");
        assert_eq!(message.lines().count(), 1, "{message}");
    }

    #[test]
    fn test_short_flags_untouched() {
        assert_eq!(
            expand_single_dash_flags(&args(&["-d", "-i=false", "build-*"]), &[], &[]),
            args(&["-d", "-i=false", "build-*"])
        );
    }
}
