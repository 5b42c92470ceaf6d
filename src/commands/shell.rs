use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

use log::debug;

use crate::commands::CommandError;

/// Interpreter used to evaluate `!` aliases
pub const DEFAULT_INTERPRETER: &str = "bash";

/// An alias evaluated as a shell expression.
///
/// The arguments are appended to the template verbatim, without quoting, and the
/// result is run as `bash -c <expression>` with the caller's stdout and stderr.
/// Stdin is the null device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellEvalCommand {
    name: String,
    template: String,
    interpreter: String,
}

impl ShellEvalCommand {
    #[must_use]
    pub fn new(name: &str, template: &str) -> Self {
        ShellEvalCommand {
            name: name.to_string(),
            template: template.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }

    #[must_use]
    pub fn with_interpreter(mut self, interpreter: &str) -> Self {
        interpreter.clone_into(&mut self.interpreter);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    #[must_use]
    pub fn expression(&self, args: &[String]) -> String {
        format!("{} {}", self.template, args.join(" "))
            .trim()
            .to_string()
    }

    /// # Errors
    ///
    /// Returns `CommandError::InterpreterMissing` if the interpreter is not on `PATH`,
    /// or `CommandError::Execution` if it cannot be launched or exits unsuccessfully.
    pub fn execute(&self, args: &[String]) -> Result<(), CommandError> {
        let shell =
            find_executable(&self.interpreter).ok_or_else(|| CommandError::InterpreterMissing {
                interpreter: self.interpreter.clone(),
                alias: self.name.clone(),
            })?;
        let expression = self.expression(args);
        debug!(
            "Evaluating alias '{}': {} -c {expression}",
            self.name,
            shell.display()
        );

        let status = ProcessCommand::new(&shell)
            .arg("-c")
            .arg(&expression)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| CommandError::Execution {
                alias: self.name.clone(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Execution {
                alias: self.name.clone(),
                reason: status.to_string(),
            })
        }
    }
}

/// Locate `name` on `PATH`, or check it directly if it already is a path
fn find_executable(name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    if path.components().count() > 1 {
        return is_executable(path).then(|| path.to_path_buf());
    }
    let search_path = std::env::var_os("PATH")?;
    std::env::split_paths(&search_path)
        .flat_map(|dir| {
            [
                dir.join(name),
                dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX)),
            ]
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
