//! `format` command: validate content and print the encoded payload string.

use clap::Args;

use crate::cli::common::{CliError, CliResult};
use crate::cli::content::ContentArgs;
use crate::formatter::{format_payload, format_value};

/// Print the QR payload for some content
#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct FormatArgs {
    #[command(subcommand)]
    content: Option<ContentArgs>,

    /// Format a raw JSON field object for KIND without form validation
    #[arg(long, num_args = 2, value_names = ["KIND", "FIELDS"])]
    json: Option<Vec<String>>,
}

impl FormatArgs {
    /// Execute format command
    pub fn execute(&self) -> CliResult<()> {
        let payload = match (&self.content, &self.json) {
            (Some(content), _) => format_payload(&content.to_payload()?),
            (None, Some(raw)) => {
                let [kind, fields] = raw.as_slice() else {
                    return Err(CliError::validation("--json expects KIND and FIELDS"));
                };
                let value: serde_json::Value = serde_json::from_str(fields)
                    .map_err(|e| CliError::validation(format!("Invalid JSON fields: {e}")))?;
                format_value(kind, &value)
            }
            (None, None) => {
                return Err(CliError::validation(
                    "Specify a content kind (url, text, phone, email, location, wifi, calendar, vcard) or --json KIND FIELDS",
                ))
            }
        };

        println!("{payload}");
        Ok(())
    }
}
