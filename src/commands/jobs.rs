use std::fmt::Write as _;

use clap::{ArgAction, CommandFactory, Parser};

use crate::commands::command::{BuiltinCommand, Command};
use crate::commands::{CommandError, parse_args, parse_flag_bool};
use crate::jenkins::JobServer;
use crate::jenkins::collection::JobCollection;

#[derive(Parser, Debug)]
#[command(
    name = "jobs",
    about = "List jobs, optionally filtered by name",
    no_binary_name = true
)]
pub struct JobsArgs {
    /// Job name, `*` matches any characters (e.g. `build-*`)
    pattern: Option<String>,

    /// Show job details
    #[arg(
        short = 'd',
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = parse_flag_bool
    )]
    detailed: bool,

    /// Ignore case
    #[arg(
        short = 'i',
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        value_parser = parse_flag_bool
    )]
    ignore_case: bool,
}

/// One printed line of the job listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub name: String,
    pub status: String,
    pub last_build: Option<i64>,
    pub url: String,
}

#[must_use]
pub fn command() -> Command {
    Command::Builtin(BuiltinCommand::new(JobsArgs::command(), |opts, args| {
        let Some(args) = parse_args::<JobsArgs>(args, &[])? else {
            return Ok(());
        };
        let client = opts.client()?;
        let rows = list_jobs(
            &client,
            args.pattern.as_deref(),
            args.ignore_case,
            args.detailed,
        )?;
        print!("{}", render(&rows));
        Ok(())
    }))
}

/// Collect the rows to print.
///
/// Every row is built before returning, so a failing detail fetch yields no rows at all.
///
/// # Errors
///
/// Returns `CommandError::Remote` if listing or a detail fetch fails, or
/// `CommandError::InvalidPattern` if `pattern` does not compile.
pub fn list_jobs(
    server: &dyn JobServer,
    pattern: Option<&str>,
    ignore_case: bool,
    detailed: bool,
) -> Result<Vec<JobRow>, CommandError> {
    let jobs = JobCollection::fetch(server)?;
    let jobs = match pattern.filter(|pattern| !pattern.is_empty()) {
        Some(pattern) => jobs.filter_by_pattern(pattern, ignore_case)?,
        None => jobs,
    };

    jobs.iter()
        .map(|job| -> Result<JobRow, CommandError> {
            let last_build = if detailed {
                Some(job.last_build_number()?)
            } else {
                None
            };
            Ok(JobRow {
                name: job.name().to_string(),
                status: job.status().to_string(),
                last_build,
                url: job.url().to_string(),
            })
        })
        .collect()
}

/// Tab separated columns, each padded to its widest value
#[must_use]
pub fn render(rows: &[JobRow]) -> String {
    let name_width = column_width(rows, |row| row.name.len());
    let status_width = column_width(rows, |row| row.status.len());
    let build_width = column_width(rows, |row| {
        row.last_build.map_or(0, |build| build.to_string().len())
    });

    let mut output = String::new();
    for row in rows {
        match row.last_build {
            Some(build) => {
                let _ = writeln!(
                    output,
                    "{:<name_width$}\t{:<status_width$}\t#{:<build_width$}\t{}",
                    row.name, row.status, build, row.url
                );
            }
            None => {
                let _ = writeln!(output, "{:<name_width$}\t{}", row.name, row.status);
            }
        }
    }
    output
}

fn column_width(rows: &[JobRow], width: impl Fn(&JobRow) -> usize) -> usize {
    rows.iter().map(width).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jenkins::job::tests::{FakeServer, summary};

    fn server() -> FakeServer {
        FakeServer {
            jobs: vec![
                summary("build-api", "blue"),
                summary("deploy", "red"),
                summary("Build-web", "BLUE_ANIME"),
            ],
            ..Default::default()
        }
    }

    fn row(name: &str, status: &str, last_build: Option<i64>) -> JobRow {
        JobRow {
            name: name.to_string(),
            status: status.to_string(),
            last_build,
            url: format!("http://ci/job/{name}/"),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = JobsArgs::try_parse_from(["build-*"]).unwrap();
        assert_eq!(args.pattern.as_deref(), Some("build-*"));
        assert!(args.ignore_case);
        assert!(!args.detailed);
    }

    #[test]
    fn test_parse_case_flag() {
        let args = JobsArgs::try_parse_from(["-i=false", "-d", "build-*"]).unwrap();
        assert!(!args.ignore_case);
        assert!(args.detailed);
        assert_eq!(args.pattern.as_deref(), Some("build-*"));

        let args = JobsArgs::try_parse_from(["-i", "deploy"]).unwrap();
        assert!(args.ignore_case);
        assert_eq!(args.pattern.as_deref(), Some("deploy"));
    }

    #[test]
    fn test_parse_bool_spellings() {
        let args = JobsArgs::try_parse_from(["-d=true", "-i=False", "deploy"]).unwrap();
        assert!(args.detailed);
        assert!(!args.ignore_case);

        let args = JobsArgs::try_parse_from(["-d=0", "-i=T"]).unwrap();
        assert!(!args.detailed);
        assert!(args.ignore_case);

        assert!(JobsArgs::try_parse_from(["-d=maybe"]).is_err());
    }

    #[test]
    fn test_list_all_without_pattern() {
        let server = server();
        let rows = list_jobs(&server, None, true, false).unwrap();
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["build-api", "deploy", "Build-web"]);
        assert_eq!(rows[2].status, "In progress");
        assert_eq!(server.fetches.get(), 0);
    }

    #[test]
    fn test_list_filtered_with_details() {
        let server = server();
        let rows = list_jobs(&server, Some("build-*"), true, true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].last_build, Some(9));
        assert_eq!(rows[1].name, "Build-web");
        assert_eq!(server.fetches.get(), 2);
    }

    #[test]
    fn test_detail_failure_yields_no_rows() {
        let server = FakeServer {
            fail_fetch: true,
            ..server()
        };
        assert!(matches!(
            list_jobs(&server, None, true, true),
            Err(CommandError::Remote(_))
        ));
    }

    #[test]
    fn test_render_detailed() {
        let table = render(&[
            row("build-api", "Success", Some(12)),
            row("deploy", "Failed", Some(7)),
        ])
        .replace('\t', " | ");
        insta::assert_snapshot!(table.trim_end(), @r"
        build-api | Success | #12 | http://ci/job/build-api/
        deploy    | Failed  | #7  | http://ci/job/deploy/
        ");
    }

    #[test]
    fn test_render_summary() {
        let table = render(&[row("build-api", "Success", None), row("deploy", "Failed", None)])
            .replace('\t', " | ");
        insta::assert_snapshot!(table.trim_end(), @r"
        build-api | Success
        deploy    | Failed
        ");
    }
}
