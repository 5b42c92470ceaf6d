use std::collections::BTreeMap;

use log::debug;

use crate::commands::command::Command;
use crate::commands::shell::ShellEvalCommand;

/// Marks an alias value as a shell expression
pub const EVAL_MARKER: &str = "!";

/// Turn alias definitions into commands.
///
/// A value starting with `!` becomes a [`ShellEvalCommand`] evaluating the rest
/// of the value. A value naming one of `known` becomes a copy of that command.
/// Anything else is dropped; it is only reported at debug level. Aliases only
/// resolve against `known`, never against each other.
#[must_use]
pub fn resolve(
    aliases: &BTreeMap<String, String>,
    known: &BTreeMap<String, Command>,
) -> BTreeMap<String, Command> {
    let mut resolved = BTreeMap::new();
    for (name, value) in aliases {
        let name = name.trim();
        let value = value.trim();

        if value.starts_with(EVAL_MARKER) {
            let template = value.replacen(EVAL_MARKER, "", 1);
            debug!("Alias '{name}' evaluates `{template}`");
            resolved.insert(
                name.to_string(),
                Command::ShellEval(ShellEvalCommand::new(name, &template)),
            );
        } else if let Some(command) = known.get(value) {
            debug!("Alias '{name}' refers to command '{value}'");
            resolved.insert(name.to_string(), command.clone());
        } else {
            debug!("Dropping alias '{name}': `{value}` is not a command");
        }
    }
    resolved
}
