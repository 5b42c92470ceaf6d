use std::rc::Rc;

use crate::jenkins::job::LazyRemoteJob;
use crate::jenkins::pattern::{PatternError, PatternMatcher};
use crate::jenkins::{JobServer, RemoteError};

/// Jobs in the order the server listed them.
///
/// Entries are shared between a collection and the collections filtered from it,
/// so a detail fetched through one is cached for all.
#[derive(Debug, Clone, Default)]
pub struct JobCollection<'a> {
    entries: Vec<Rc<LazyRemoteJob<'a>>>,
}

impl<'a> JobCollection<'a> {
    /// Fetch the job listing from the server.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the listing request fails.
    pub fn fetch(server: &'a dyn JobServer) -> Result<Self, RemoteError> {
        let entries = server
            .list_jobs()?
            .into_iter()
            .map(|summary| Rc::new(LazyRemoteJob::new(server, summary)))
            .collect();
        Ok(JobCollection { entries })
    }

    /// Keep only the jobs whose name matches `pattern`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if `pattern` does not compile.
    pub fn filter_by_pattern(&self, pattern: &str, ignore_case: bool) -> Result<Self, PatternError> {
        let matcher = PatternMatcher::compile(pattern, ignore_case)?;
        let entries = self
            .entries
            .iter()
            .filter(|job| matcher.matches(job.name()))
            .cloned()
            .collect();
        Ok(JobCollection { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &LazyRemoteJob<'a>> {
        self.entries.iter().map(|job| &**job)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
