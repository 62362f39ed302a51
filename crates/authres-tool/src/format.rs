use anyhow::Context;
use authres::{AuthenticationResults, FormatOptions};
use clap::Parser;

#[derive(Debug, Parser)]
/// Reads a JSON document, in the shape produced by `parse`, from stdin
/// and prints it as an Authentication-Results header value.
pub struct FormatCommand {
    /// Emit the version number after the identifier
    #[arg(long)]
    include_version: bool,

    /// Put each result on its own folded line
    #[arg(long)]
    fold: bool,
}

impl FormatCommand {
    pub fn run(&self, options: &FormatOptions) -> anyhow::Result<()> {
        let header: AuthenticationResults = serde_json::from_reader(std::io::stdin().lock())
            .context("reading Authentication-Results JSON from stdin")?;

        println!("{}", header.encode_with(&self.options(options)));
        Ok(())
    }

    /// Flags given on the command line take precedence over the
    /// configured options
    fn options(&self, configured: &FormatOptions) -> FormatOptions {
        FormatOptions {
            include_version: self.include_version || configured.include_version,
            fold: self.fold || configured.fold,
        }
    }
}
