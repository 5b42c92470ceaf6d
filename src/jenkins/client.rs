use std::collections::BTreeMap;

use log::debug;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::jenkins::{JobDetail, JobServer, JobSummary, RemoteError};

const JOB_LIST_TREE: &str = "jobs[name,color,url]";

#[derive(Debug, Deserialize)]
struct JobListing {
    #[serde(default)]
    jobs: Vec<JobSummary>,
}

/// Blocking client for the Jenkins JSON API
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    http: Client,
    base: Url,
    user: String,
    token: String,
}

impl JenkinsClient {
    /// Create a client for `host`, a host without scheme is assumed to be `http://`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingHost` for an empty host, `RemoteError::InvalidHost`
    /// if it is not a usable URL, or `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(host: &str, user: &str, token: &str) -> Result<Self, RemoteError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(RemoteError::MissingHost);
        }
        let with_scheme = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        let base = Url::parse(&with_scheme).map_err(|e| RemoteError::InvalidHost {
            host: host.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::InvalidHost {
                host: host.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = Client::builder()
            .user_agent(concat!("jenkins-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RemoteError::Http {
                operation: "create HTTP client".to_string(),
                source,
            })?;

        Ok(JenkinsClient {
            http,
            base,
            user: user.to_string(),
            token: token.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response, RemoteError> {
        let request = if self.user.is_empty() {
            request
        } else {
            request.basic_auth(&self.user, Some(&self.token))
        };
        let response = request.send().map_err(|source| RemoteError::Http {
            operation: operation.to_string(),
            source,
        })?;
        let status = response.status();
        debug!("{operation}: {status}");
        if !status.is_success() {
            return Err(RemoteError::Status {
                operation: operation.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

impl JobServer for JenkinsClient {
    fn list_jobs(&self) -> Result<Vec<JobSummary>, RemoteError> {
        let operation = "list jobs";
        let request = self
            .http
            .get(self.endpoint(&["api", "json"]))
            .query(&[("tree", JOB_LIST_TREE)]);
        let listing: JobListing = self.send(request, operation)?.json().map_err(|source| {
            RemoteError::Http {
                operation: operation.to_string(),
                source,
            }
        })?;
        Ok(listing.jobs)
    }

    fn fetch_job(&self, name: &str) -> Result<JobDetail, RemoteError> {
        let operation = format!("fetch job {name}");
        let request = self.http.get(self.endpoint(&["job", name, "api", "json"]));
        self.send(request, &operation)?
            .json()
            .map_err(|source| RemoteError::Http { operation, source })
    }

    fn start_job(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<i64, RemoteError> {
        let operation = format!("start job {name}");
        let request = if params.is_empty() {
            self.http.post(self.endpoint(&["job", name, "build"]))
        } else {
            self.http
                .post(self.endpoint(&["job", name, "buildWithParameters"]))
                .query(params)
        };
        let response = self.send(request, &operation)?;
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|location| location.to_str().ok())
            .and_then(queue_id)
            .ok_or_else(|| RemoteError::MissingQueueLocation(name.to_string()))
    }
}

/// Extract the item number from a queue location such as `http://host/queue/item/17/`
fn queue_id(location: &str) -> Option<i64> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|id| id.parse().ok())
}
