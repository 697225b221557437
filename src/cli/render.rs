//! `render` command: draw content with the saved style and save the image.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::common::{open_store, parse_value, CliError, CliResult};
use crate::cli::content::ContentArgs;
use crate::constants::size;
use crate::export::{DirectorySaver, FileSaver};
use crate::formatter::format_payload;
use crate::models::DownloadFormat;
use crate::render::{FilePreview, QrEngine, Renderer};

/// Render a styled QR code to an image file
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Content to encode; the saved preview data when omitted
    #[command(subcommand)]
    content: Option<ContentArgs>,

    /// Output file (defaults to qr-code.<ext> in the current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Image format: png, jpeg, webp or svg (defaults to the saved preference)
    #[arg(short, long, value_name = "FORMAT", global = true)]
    format: Option<String>,

    /// Square export size in pixels (128-2048)
    #[arg(short, long, value_name = "PIXELS", global = true)]
    size: Option<u32>,

    /// Also write an SVG preview to this file
    #[arg(long, value_name = "FILE", global = true)]
    preview: Option<PathBuf>,
}

/// Saves to one exact path, whatever file name the exporter proposes.
struct PathSaver<'a> {
    path: &'a Path,
}

impl FileSaver for PathSaver<'_> {
    fn save(&self, _filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!(
                "Failed to create output directory: {}",
                parent.display()
            ))?;
        }
        fs::write(self.path, bytes)
            .context(format!("Failed to write output: {}", self.path.display()))?;
        Ok(self.path.to_path_buf())
    }
}

impl RenderArgs {
    /// Execute render command
    pub fn execute(&self) -> CliResult<()> {
        let store = open_store()?;
        let format = self.resolve_format(store.download_format())?;
        if let Some(side) = self.size {
            if !(size::MIN..=size::MAX).contains(&side) {
                return Err(CliError::validation(format!(
                    "Invalid size {side}. Must be between {} and {} pixels",
                    size::MIN,
                    size::MAX
                )));
            }
        }

        let payload = match &self.content {
            Some(content) => format_payload(&content.to_payload()?),
            None => store.config().data.clone(),
        };
        if payload.is_empty() {
            return Err(CliError::validation("Nothing to encode"));
        }
        tracing::debug!("Rendering {} characters as {}", payload.len(), format);

        let mut renderer: Renderer<QrEngine> = match &self.preview {
            Some(path) => Renderer::with_display(Box::new(FilePreview::new(path))),
            None => Renderer::new(),
        };
        if !renderer.show(&payload, &store.render_config()) {
            return Err(CliError::validation(
                "Failed to render QR code (content may be too long for the error-correction level or output size)",
            ));
        }

        let path = match &self.output {
            Some(path) => renderer.export(format, self.size, &PathSaver { path }),
            None => renderer.export(format, self.size, &DirectorySaver::new(".")),
        }
        .map_err(|e| CliError::io(format!("{e:#}")))?;

        println!("{}", path.display());
        Ok(())
    }

    /// Explicit `--format`, then the output extension, then the saved preference.
    fn resolve_format(&self, preferred: DownloadFormat) -> CliResult<DownloadFormat> {
        if let Some(format) = &self.format {
            return parse_value(format);
        }
        let from_extension = self
            .output
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "jpg" => Some(DownloadFormat::Jpeg),
                other => other.parse().ok(),
            });
        Ok(from_extension.unwrap_or(preferred))
    }
}
