use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::commands::CommandError;
use crate::commands::shell::ShellEvalCommand;
use crate::config_file::{ConfigError, ConfigStore};
use crate::jenkins::RemoteError;
use crate::jenkins::client::JenkinsClient;

/// Connection options shared by every command
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GlobalOpts {
    pub host: String,
    pub user: String,
    pub token: String,
    pub config_path: PathBuf,
}

impl GlobalOpts {
    /// Fill every option not given on the command line from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TokenEncoding` if the token has to be read from
    /// configuration and cannot be decoded.
    pub fn fill_from_config(&mut self, config: &ConfigStore) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            config.host().clone_into(&mut self.host);
        }
        if self.token.is_empty() {
            self.token = config.token()?;
        }
        if self.user.is_empty() {
            config.user().clone_into(&mut self.user);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RemoteError` if the configured host is missing or invalid.
    pub fn client(&self) -> Result<JenkinsClient, RemoteError> {
        JenkinsClient::new(&self.host, &self.user, &self.token)
    }
}

impl fmt::Debug for GlobalOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalOpts")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("config_path", &self.config_path)
            .finish()
    }
}

pub type Handler = Rc<dyn Fn(&GlobalOpts, &[String]) -> Result<(), CommandError>>;

/// A native command, described by its clap schema and run by its handler
#[derive(Clone)]
pub struct BuiltinCommand {
    schema: clap::Command,
    handler: Handler,
}

impl BuiltinCommand {
    pub fn new(
        schema: clap::Command,
        handler: impl Fn(&GlobalOpts, &[String]) -> Result<(), CommandError> + 'static,
    ) -> Self {
        BuiltinCommand {
            schema,
            handler: Rc::new(handler),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.get_name()
    }
}

impl fmt::Debug for BuiltinCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinCommand")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// A top level command
#[derive(Debug, Clone)]
pub enum Command {
    Builtin(BuiltinCommand),
    ShellEval(ShellEvalCommand),
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Command::Builtin(builtin) => builtin.name(),
            Command::ShellEval(shell) => shell.name(),
        }
    }

    /// Run the command with the arguments following its name.
    ///
    /// # Errors
    ///
    /// Returns whatever error the command fails with.
    pub fn execute(&self, opts: &GlobalOpts, args: &[String]) -> Result<(), CommandError> {
        match self {
            Command::Builtin(builtin) => (builtin.handler)(opts, args),
            Command::ShellEval(shell) => shell.execute(args),
        }
    }

    /// Usage text shown in the top level help
    #[must_use]
    pub fn help(&self) -> String {
        match self {
            Command::Builtin(builtin) => builtin.schema.clone().render_help().to_string(),
            Command::ShellEval(shell) => format!(
                "Evaluates `{}` with {}, appending any arguments\n",
                shell.template(),
                shell.interpreter()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::JENKINS_SECTION;

    fn config() -> ConfigStore {
        let mut config = ConfigStore::default();
        config.set(JENKINS_SECTION, "host", "http://ci.local".to_string());
        config.set(JENKINS_SECTION, "user", "bob".to_string());
        config.set(JENKINS_SECTION, "token", "c2VjcmV0".to_string());
        config
    }

    #[test]
    fn test_fill_from_config() {
        let mut opts = GlobalOpts::default();
        opts.fill_from_config(&config()).unwrap();
        assert_eq!(opts.host, "http://ci.local");
        assert_eq!(opts.user, "bob");
        assert_eq!(opts.token, "secret");
    }

    #[test]
    fn test_command_line_takes_precedence() {
        let mut opts = GlobalOpts {
            host: "http://other".to_string(),
            token: "plain".to_string(),
            ..Default::default()
        };
        opts.fill_from_config(&config()).unwrap();
        assert_eq!(opts.host, "http://other");
        assert_eq!(opts.user, "bob");
        assert_eq!(opts.token, "plain");
    }

    #[test]
    fn test_debug_hides_token() {
        let opts = GlobalOpts {
            token: "secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{opts:?}").contains("secret"));
    }

    #[test]
    fn test_builtin_execute_runs_handler() {
        let command = Command::Builtin(BuiltinCommand::new(
            clap::Command::new("echo"),
            |_, args| {
                if args == ["ok"] {
                    Ok(())
                } else {
                    Err(CommandError::Validation(args.join(" ")))
                }
            },
        ));
        assert_eq!(command.name(), "echo");
        assert!(
            command
                .execute(&GlobalOpts::default(), &["ok".to_string()])
                .is_ok()
        );
        assert!(
            command
                .execute(&GlobalOpts::default(), &["no".to_string()])
                .is_err()
        );
    }
}
