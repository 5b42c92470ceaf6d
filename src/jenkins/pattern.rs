use regex::Regex;
use thiserror::Error;

const WILDCARD: char = '*';

#[derive(Error, Debug)]
#[error("Invalid job pattern `{pattern}`: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Compiled job name filter.
///
/// A pattern without `*` matches by equality. A pattern with `*` becomes a regex
/// anchored to the whole name, where every `*` matches any run of characters.
/// Other regex syntax in the pattern is passed through unescaped.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
    Exact { expected: String, ignore_case: bool },
    Wildcard { regex: Regex, ignore_case: bool },
}

impl PatternMatcher {
    /// # Errors
    ///
    /// Returns `PatternError` if the wildcard expansion is not a valid regex.
    pub fn compile(pattern: &str, ignore_case: bool) -> Result<Self, PatternError> {
        let pattern = fold_case(pattern, ignore_case);
        if !pattern.contains(WILDCARD) {
            return Ok(PatternMatcher::Exact {
                expected: pattern,
                ignore_case,
            });
        }

        let expanded = format!("^(?:{})$", pattern.replace(WILDCARD, ".*"));
        let regex = Regex::new(&expanded).map_err(|e| PatternError {
            pattern: pattern.clone(),
            source: e,
        })?;
        Ok(PatternMatcher::Wildcard { regex, ignore_case })
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            PatternMatcher::Exact {
                expected,
                ignore_case,
            } => *expected == fold_case(name, *ignore_case),
            PatternMatcher::Wildcard { regex, ignore_case } => {
                regex.is_match(&fold_case(name, *ignore_case))
            }
        }
    }
}

fn fold_case(value: &str, ignore_case: bool) -> String {
    if ignore_case {
        value.to_lowercase()
    } else {
        value.to_string()
    }
}
