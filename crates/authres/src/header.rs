use crate::format::format_with;
use crate::parser::parse_header;
use crate::results::ResultEntry;
use crate::{AuthResultsError, FormatOptions, ParseOptions, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A parsed Authentication-Results header value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthenticationResults {
    /// The authentication service identifier, usually the hostname of
    /// the MTA that performed the checks
    pub identifier: String,
    /// Results in the order they appear in the header
    pub results: Vec<ResultEntry>,
}

impl AuthenticationResults {
    pub fn new(identifier: impl Into<String>, results: Vec<ResultEntry>) -> Self {
        Self {
            identifier: identifier.into(),
            results,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self> {
        let (identifier, raw) = parse_header(text, options)?;
        let results: Vec<ResultEntry> = raw.into_iter().map(ResultEntry::from_raw).collect();
        tracing::trace!(
            identifier = identifier.as_str(),
            count = results.len(),
            "parsed authentication results"
        );
        Ok(Self {
            identifier,
            results,
        })
    }

    /// Renders the header value, without the `Authentication-Results:`
    /// name
    pub fn encode_value(&self) -> String {
        self.encode_with(&FormatOptions::default())
    }

    pub fn encode_with(&self, options: &FormatOptions) -> String {
        format_with(&self.identifier, &self.results, options)
    }

    /// Returns the results reported for `method`, ignoring case
    pub fn iter_method<'a>(&'a self, method: &'a str) -> impl Iterator<Item = &'a ResultEntry> {
        self.results
            .iter()
            .filter(move |entry| entry.method().eq_ignore_ascii_case(method))
    }
}

impl std::fmt::Display for AuthenticationResults {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(&self.encode_value())
    }
}

impl FromStr for AuthenticationResults {
    type Err = AuthResultsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
