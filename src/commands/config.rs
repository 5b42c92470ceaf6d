use std::path::Path;

use clap::{ArgAction, CommandFactory, Parser};
use log::info;

use crate::commands::command::{BuiltinCommand, Command};
use crate::commands::{CommandError, parse_args, parse_flag_bool};
use crate::config_file::{ConfigStore, Property};

#[derive(Parser, Debug)]
#[command(name = "config", about = "Manage configuration", no_binary_name = true)]
pub struct ConfigArgs {
    /// Save configuration in the format key value
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = parse_flag_bool
    )]
    save: bool,

    /// Property name and value (host, user or token)
    property: Vec<String>,
}

#[must_use]
pub fn command() -> Command {
    Command::Builtin(BuiltinCommand::new(ConfigArgs::command(), |opts, args| {
        let Some(args) = parse_args::<ConfigArgs>(args, &["save"])? else {
            return Ok(());
        };
        match (args.save, args.property.as_slice()) {
            (true, [name, value]) => save_property(&opts.config_path, name, value),
            _ => Err(CommandError::Validation(format!(
                "Invalid number of arguments: {:?}, a valid example would be: jenkins config -save host http://localhost:8080",
                args.property
            ))),
        }
    }))
}

/// Validate and write a single property to the configuration file.
///
/// # Errors
///
/// Returns `CommandError::Config` if the property is unknown or the file cannot
/// be read or written.
pub fn save_property(path: &Path, name: &str, value: &str) -> Result<(), CommandError> {
    let property = Property::new(name, value)?;
    let mut config = ConfigStore::from_file(path)?;
    config.set_property(&property);
    config.save(path)?;
    info!("Saved property {name} to {}", path.display());
    Ok(())
}
