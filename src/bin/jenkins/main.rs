use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::debug;

use jenkins_cli::commands::command::GlobalOpts;
use jenkins_cli::commands::expand_single_dash_flags;
use jenkins_cli::commands::registry::CommandRegistry;
use jenkins_cli::{load_config, load_registry, logger};

/// Global flags that may be written with a single dash, e.g. `-version`
const LONG_FLAGS: [&str; 7] = [
    "host", "user", "token", "config", "log-file", "version", "help",
];
const VALUE_FLAGS: [&str; 8] = [
    "h", "u", "t", "host", "user", "token", "config", "log-file",
];

#[derive(Parser, Debug)]
#[command(
    name = "jenkins",
    about = "Command line client for Jenkins",
    override_usage = "jenkins [global flags] <command> [command flags]",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Host of the Jenkins server
    #[arg(short = 'h', long, env = "JENKINS_HOST")]
    host: Option<String>,

    /// User that the API token belongs to
    #[arg(short = 'u', long, env = "JENKINS_USER")]
    user: Option<String>,

    /// API token to be used for authentication
    #[arg(short = 't', long, env = "JENKINS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Path to config file (defaults to ~/.jenkins.yaml)
    #[arg(long, env = "JENKINS_CONFIG")]
    config: Option<PathBuf>,

    /// Log file path (enables file logging in addition to stderr)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print version and exit
    #[arg(long)]
    version: bool,

    /// Print help, including every command and alias
    #[arg(long)]
    help: bool,

    /// Command to run, followed by its flags and arguments
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    command: Vec<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&args).unwrap_or_else(|e| e.exit());

    if cli.version {
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    logger::init(log_file)?;

    let (config, config_path) = load_config(cli.config.as_deref())?;
    let registry = load_registry(&config);

    if cli.help {
        print!("{}", usage(&registry));
        return Ok(ExitCode::SUCCESS);
    }
    let Some((name, command_args)) = cli.command.split_first() else {
        eprint!("{}", usage(&registry));
        return Ok(ExitCode::FAILURE);
    };

    let mut opts = GlobalOpts {
        host: cli.host.unwrap_or_default(),
        user: cli.user.unwrap_or_default(),
        token: cli.token.unwrap_or_default(),
        config_path,
    };
    opts.fill_from_config(&config)?;
    debug!("Running '{name}' with {opts:?}");

    registry.dispatch(name, &opts, command_args)?;
    Ok(ExitCode::SUCCESS)
}

fn parse_cli(args: &[String]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("jenkins".to_string()).chain(
        expand_single_dash_flags(args, &LONG_FLAGS, &VALUE_FLAGS),
    ))
}

fn usage(registry: &CommandRegistry) -> String {
    format!("{}{}", Cli::command().render_help(), registry.usage())
}
