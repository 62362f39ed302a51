//! Parsing and formatting of `Authentication-Results` header values,
//! <https://datatracker.ietf.org/doc/html/rfc8601>.
//!
//! ```
//! let header = authres::AuthenticationResults::parse(
//!     "mx.example.org; spf=pass smtp.mailfrom=example.com (checked)",
//! )
//! .unwrap();
//! assert_eq!(header.identifier, "mx.example.org");
//! assert_eq!(header.to_string(), "mx.example.org; spf=pass smtp.mailfrom=example.com");
//! ```
mod error;
mod format;
mod header;
mod nom_utils;
mod options;
mod parser;
mod results;
mod scanner;
mod token;

#[cfg(test)]
mod tests;

pub use error::AuthResultsError;
pub type Result<T> = std::result::Result<T, AuthResultsError>;

pub use format::{format, format_with};
pub use header::AuthenticationResults;
pub use options::{FormatOptions, ParseOptions, DEFAULT_MAX_COMMENT_DEPTH};
pub use results::*;

/// Parses a header value, with the field name already removed, into
/// its identifier and result entries
pub fn parse(text: &str) -> Result<(String, Vec<ResultEntry>)> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<(String, Vec<ResultEntry>)> {
    let header = AuthenticationResults::parse_with(text, options)?;
    Ok((header.identifier, header.results))
}
