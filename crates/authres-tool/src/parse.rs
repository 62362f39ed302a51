use anyhow::Context;
use authres::{AuthenticationResults, ParseOptions};
use clap::Parser;
use std::io::BufRead;

const HEADER_NAME: &str = "Authentication-Results:";

#[derive(Debug, Parser)]
/// Parses Authentication-Results header values and prints them as JSON.
///
/// Each value is parsed separately and printed as one JSON document.
/// When no values are given on the command line, each line of stdin
/// is parsed instead. A leading `Authentication-Results:` field name
/// is removed before parsing.
pub struct ParseCommand {
    /// Header values to parse
    values: Vec<String>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

impl ParseCommand {
    pub fn run(&self, options: &ParseOptions) -> anyhow::Result<()> {
        if self.values.is_empty() {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("reading stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                self.parse_one(&line, options)?;
            }
        } else {
            for value in &self.values {
                self.parse_one(value, options)?;
            }
        }
        Ok(())
    }

    fn parse_one(&self, text: &str, options: &ParseOptions) -> anyhow::Result<()> {
        let header = AuthenticationResults::parse_with(strip_header_name(text), options)
            .with_context(|| format!("failed to parse {text:?}"))?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&header)?
        } else {
            serde_json::to_string(&header)?
        };
        println!("{json}");
        Ok(())
    }
}

fn strip_header_name(text: &str) -> &str {
    match text.get(..HEADER_NAME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(HEADER_NAME) => &text[HEADER_NAME.len()..],
        _ => text,
    }
}
