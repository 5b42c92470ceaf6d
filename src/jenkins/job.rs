use std::cell::OnceCell;

use log::debug;

use crate::jenkins::{JobDetail, JobServer, JobSummary, RemoteError};

/// Map a Jenkins ball color to a readable status, unknown colors are returned as-is
#[must_use]
pub fn color_status(color: &str) -> &str {
    match color.to_lowercase().as_str() {
        "red" => "Failed",
        "yellow" => "Unstable",
        "blue" => "Success",
        "grey" => "Pending",
        "disabled" => "Disabled",
        "aborted" => "Aborted",
        "nobuilt" => "No built",
        "red_anime" | "yellow_anime" | "blue_anime" | "grey_anime" | "disabled_anime"
        | "aborted_anime" | "nobuilt_anime" => "In progress",
        _ => color,
    }
}

/// A listed job whose detail record is fetched from the server on first use
pub struct LazyRemoteJob<'a> {
    server: &'a dyn JobServer,
    summary: JobSummary,
    detail: OnceCell<JobDetail>,
}

impl<'a> LazyRemoteJob<'a> {
    #[must_use]
    pub fn new(server: &'a dyn JobServer, summary: JobSummary) -> Self {
        LazyRemoteJob {
            server,
            summary,
            detail: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    #[must_use]
    pub fn status(&self) -> &str {
        color_status(&self.summary.color)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.summary.url
    }

    /// # Errors
    ///
    /// Returns `RemoteError` if the job detail has not been fetched yet and fetching it fails.
    pub fn last_build_number(&self) -> Result<i64, RemoteError> {
        Ok(self.detail()?.last_build_number())
    }

    fn detail(&self) -> Result<&JobDetail, RemoteError> {
        if let Some(detail) = self.detail.get() {
            return Ok(detail);
        }
        debug!("Fetching detail for job '{}'", self.summary.name);
        let detail = self.server.fetch_job(&self.summary.name)?;
        Ok(self.detail.get_or_init(|| detail))
    }
}

impl std::fmt::Debug for LazyRemoteJob<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRemoteJob")
            .field("summary", &self.summary)
            .field("detail", &self.detail.get())
            .finish_non_exhaustive()
    }
}
