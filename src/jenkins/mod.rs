//! Access to the remote Jenkins server
//!
//! Everything that needs the server goes through the [`JobServer`] trait, so
//! listing, filtering and the lazily fetched job details can be exercised
//! without a network. [`client::JenkinsClient`] is the HTTP implementation.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

pub mod client;
pub mod collection;
pub mod job;
pub mod pattern;

/// Errors raised while talking to the Jenkins server
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("No Jenkins host configured, pass -h or run `jenkins config -save host <url>`")]
    MissingHost,
    #[error("Invalid Jenkins host `{host}`: {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("Failed to {operation}: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to {operation}: server responded with {status}")]
    Status {
        operation: String,
        status: reqwest::StatusCode,
    },
    #[error("Job `{0}` was queued but the server did not return a queue location")]
    MissingQueueLocation(String),
}

/// A job as returned by the job listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BuildRef {
    pub number: i64,
}

/// Detailed job record, fetched per job on demand
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(default)]
    pub last_build: Option<BuildRef>,
}

impl JobDetail {
    #[must_use]
    pub fn last_build_number(&self) -> i64 {
        self.last_build.map_or(0, |build| build.number)
    }
}

/// The operations this tool needs from a Jenkins server
pub trait JobServer {
    /// List all jobs in server order.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails.
    fn list_jobs(&self) -> Result<Vec<JobSummary>, RemoteError>;

    /// Fetch the detailed record of a single job.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails.
    fn fetch_job(&self, name: &str) -> Result<JobDetail, RemoteError>;

    /// Trigger a job, returning the queue item number the server assigned.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails.
    fn start_job(&self, name: &str, params: &BTreeMap<String, String>)
    -> Result<i64, RemoteError>;
}
