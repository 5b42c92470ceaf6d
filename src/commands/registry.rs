use std::collections::BTreeMap;
use std::fmt::Write as _;

use log::debug;

use crate::commands::CommandError;
use crate::commands::command::{Command, GlobalOpts};

/// The commands available for one invocation, built-ins merged with aliases
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    /// Merge `aliases` over `builtins`, an alias replaces a built-in of the same name.
    #[must_use]
    pub fn new(builtins: BTreeMap<String, Command>, aliases: BTreeMap<String, Command>) -> Self {
        let mut commands = builtins;
        commands.extend(aliases);
        CommandRegistry { commands }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered command names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Run the command registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::UnknownCommand` if nothing is registered as `name`,
    /// otherwise the command's own result.
    pub fn dispatch(
        &self,
        name: &str,
        opts: &GlobalOpts,
        args: &[String],
    ) -> Result<(), CommandError> {
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        debug!("Dispatching '{name}' with {} argument(s)", args.len());
        command.execute(opts, args)
    }

    /// Help for every registered command, in name order
    #[must_use]
    pub fn usage(&self) -> String {
        let mut usage = String::new();
        for (name, command) in &self.commands {
            let _ = write!(usage, "\n{name} command:\n{}", command.help());
        }
        usage
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::commands::command::BuiltinCommand;
    use crate::commands::shell::ShellEvalCommand;

    type Calls = Rc<RefCell<Vec<String>>>;

    fn recording(name: &'static str, calls: &Calls) -> (String, Command) {
        let calls = Rc::clone(calls);
        let command = BuiltinCommand::new(clap::Command::new(name), move |_, args| {
            calls.borrow_mut().push(format!("{name} {}", args.join(" ")));
            Ok(())
        });
        (name.to_string(), Command::Builtin(command))
    }

    #[test]
    fn test_dispatch_passes_arguments() {
        let calls = Calls::default();
        let registry = CommandRegistry::new(
            [recording("jobs", &calls)].into_iter().collect(),
            BTreeMap::new(),
        );
        registry
            .dispatch("jobs", &GlobalOpts::default(), &["-d".to_string()])
            .unwrap();
        assert_eq!(*calls.borrow(), vec!["jobs -d"]);
    }

    #[test]
    fn test_unknown_command_runs_nothing() {
        let calls = Calls::default();
        let registry = CommandRegistry::new(
            [recording("jobs", &calls)].into_iter().collect(),
            BTreeMap::new(),
        );
        match registry.dispatch("deploy", &GlobalOpts::default(), &[]) {
            Err(CommandError::UnknownCommand(name)) => assert_eq!(name, "deploy"),
            other => panic!("Expected UnknownCommand, got: {other:?}"),
        }
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_alias_overrides_builtin() {
        let calls = Calls::default();
        let registry = CommandRegistry::new(
            [recording("jobs", &calls), recording("start", &calls)]
                .into_iter()
                .collect(),
            [(
                "jobs".to_string(),
                Command::ShellEval(ShellEvalCommand::new("jobs", "echo alias")),
            )]
            .into_iter()
            .collect(),
        );
        assert!(matches!(registry.get("jobs"), Some(Command::ShellEval(_))));
        assert!(matches!(registry.get("start"), Some(Command::Builtin(_))));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["jobs", "start"]);
    }

    #[test]
    fn test_dispatch_returns_handler_error() {
        let registry = CommandRegistry::new(
            [(
                "fail".to_string(),
                Command::Builtin(BuiltinCommand::new(clap::Command::new("fail"), |_, _| {
                    Err(CommandError::Validation("nope".to_string()))
                })),
            )]
            .into_iter()
            .collect(),
            BTreeMap::new(),
        );
        let err = registry
            .dispatch("fail", &GlobalOpts::default(), &[])
            .unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_usage_lists_aliases() {
        let registry = CommandRegistry::new(
            BTreeMap::new(),
            [(
                "hi".to_string(),
                Command::ShellEval(ShellEvalCommand::new("hi", "echo hi")),
            )]
            .into_iter()
            .collect(),
        );
        assert!(registry.usage().contains("hi command:\nEvaluates `echo hi` with bash"));
    }
}
