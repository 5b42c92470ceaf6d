use std::collections::BTreeMap;

use clap::{CommandFactory, Parser};
use log::info;

use crate::commands::command::{BuiltinCommand, Command};
use crate::commands::{CommandError, parse_args};
use crate::jenkins::JobServer;

#[derive(Parser, Debug)]
#[command(name = "start", about = "Start a job", no_binary_name = true)]
pub struct StartArgs {
    /// Name of the job to start
    job: Vec<String>,

    /// Job parameter in the format key:value, may be repeated
    #[arg(short = 'P', value_name = "KEY:VALUE")]
    params: Vec<String>,
}

#[must_use]
pub fn command() -> Command {
    Command::Builtin(BuiltinCommand::new(StartArgs::command(), |opts, args| {
        let Some(args) = parse_args::<StartArgs>(args, &[])? else {
            return Ok(());
        };
        let [job] = args.job.as_slice() else {
            return Err(CommandError::Validation("Missing job name".to_string()));
        };
        let params = parse_params(&args.params)?;
        let client = opts.client()?;
        let number = start_job(&client, job, &params)?;
        println!("#{number}");
        Ok(())
    }))
}

/// Parse `key:value` parameters, each must contain exactly one `:`.
///
/// # Errors
///
/// Returns `CommandError::Validation` naming the first malformed parameter.
pub fn parse_params(params: &[String]) -> Result<BTreeMap<String, String>, CommandError> {
    params
        .iter()
        .map(|param| match param.split(':').collect::<Vec<_>>().as_slice() {
            [key, value] => Ok(((*key).to_string(), (*value).to_string())),
            _ => Err(CommandError::Validation(format!(
                "Invalid parameter {param}, format is key:value"
            ))),
        })
        .collect()
}

/// Trigger `job`, returning the queue item number.
///
/// # Errors
///
/// Returns `CommandError::Remote` if the server rejects the request.
pub fn start_job(
    server: &dyn JobServer,
    job: &str,
    params: &BTreeMap<String, String>,
) -> Result<i64, CommandError> {
    info!("Starting job '{job}' with {} parameter(s)", params.len());
    Ok(server.start_job(job, params)?)
}
