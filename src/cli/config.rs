//! Style configuration CLI commands.

use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::cli::common::{open_store, parse_value, CliError, CliResult};
use crate::constants::{APP_BINARY_NAME, APP_NAME};
use crate::export::DirectorySaver;
use crate::models::{
    ColorMode, CornerDotType, CornerSquareType, DotType, DotsPatch, DownloadFormat,
    ErrorCorrectionLevel, Fill, Frame, FrameStyle, GradientType, SectionPatch, StylePatch,
    StyleSection,
};
use crate::storage::FileStorage;
use crate::store::StyleStore;

/// Style configuration commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display the saved style and preferences
    Show(ConfigShowArgs),
    /// Change style values
    Set(Box<ConfigSetArgs>),
    /// Restore the stock style
    Reset,
    /// Write the style to qr-config.json
    Export(ConfigExportArgs),
    /// Replace the style with a previously exported file
    Import(ConfigImportArgs),
}

/// Display the saved style and preferences
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Change style values
#[derive(Args, Debug, Default)]
pub struct ConfigSetArgs {
    /// Output width in pixels
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Square output size (sets width and height)
    #[arg(long, value_name = "PIXELS", conflicts_with_all = ["width", "height"])]
    size: Option<u32>,

    /// Quiet margin in pixels
    #[arg(long, value_name = "PIXELS")]
    margin: Option<u32>,

    /// Preview payload
    #[arg(long, value_name = "TEXT")]
    data: Option<String>,

    /// Module shape (square, dots, rounded, extra-rounded, classy, classy-rounded)
    #[arg(long, value_name = "TYPE")]
    dot_type: Option<String>,

    /// Module color
    #[arg(long, value_name = "HEX")]
    dot_color: Option<String>,

    /// Color mode (single or gradient) of --section
    #[arg(long, value_name = "MODE")]
    color_mode: Option<String>,

    /// Section whose color mode is changed (dots, corners-square, corners-dot, background)
    #[arg(long, value_name = "SECTION", default_value = "dots", requires = "color_mode")]
    section: String,

    /// Module gradient type (linear or radial)
    #[arg(long, value_name = "TYPE")]
    gradient_type: Option<String>,

    /// Module gradient rotation in degrees
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    gradient_rotation: Option<f64>,

    /// Module gradient start color
    #[arg(long, value_name = "HEX")]
    gradient_start: Option<String>,

    /// Module gradient end color
    #[arg(long, value_name = "HEX")]
    gradient_end: Option<String>,

    /// Finder frame shape (square, dot, extra-rounded)
    #[arg(long, value_name = "TYPE")]
    corner_square_type: Option<String>,

    /// Finder frame color
    #[arg(long, value_name = "HEX")]
    corner_square_color: Option<String>,

    /// Finder centre shape (square, dot, none)
    #[arg(long, value_name = "TYPE")]
    corner_dot_type: Option<String>,

    /// Finder centre color
    #[arg(long, value_name = "HEX")]
    corner_dot_color: Option<String>,

    /// Background color
    #[arg(long, value_name = "HEX")]
    background: Option<String>,

    /// Error-correction level (L, M, Q, H)
    #[arg(long, value_name = "LEVEL")]
    error_correction: Option<String>,

    /// Preferred download format (png, jpeg, webp, svg)
    #[arg(long, value_name = "FORMAT")]
    download_format: Option<String>,

    /// Logo as a data URI or http(s) URL
    #[arg(long, value_name = "URI")]
    logo: Option<String>,

    /// Remove the logo
    #[arg(long, conflicts_with = "logo")]
    clear_logo: bool,

    /// Frame style (none, square, circle)
    #[arg(long, value_name = "STYLE")]
    frame: Option<String>,

    /// Frame label text
    #[arg(long, value_name = "TEXT")]
    frame_label: Option<String>,

    /// Frame label color
    #[arg(long, value_name = "HEX")]
    frame_label_color: Option<String>,

    /// Expanded settings panel (empty to collapse all)
    #[arg(long, value_name = "PANEL")]
    accordion: Option<String>,
}

/// Write the style to qr-config.json
#[derive(Args, Debug)]
pub struct ConfigExportArgs {
    /// Target directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,
}

/// Replace the style with a previously exported file
#[derive(Args, Debug)]
pub struct ConfigImportArgs {
    /// Exported configuration file
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
            ConfigCommand::Reset => {
                let mut store = open_store()?;
                store.reset_to_defaults();
                println!("Configuration reset to defaults.");
                Ok(())
            }
            ConfigCommand::Export(args) => args.execute(),
            ConfigCommand::Import(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let store = open_store()?;

        if self.json {
            let json = serde_json::to_string_pretty(store.state()).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(&store);
        }

        Ok(())
    }
}

/// Values of [`ConfigSetArgs`] after parsing, so nothing is applied when any is invalid.
#[derive(Debug, Default)]
struct ParsedSet {
    dot_type: Option<DotType>,
    color_mode: Option<(StyleSection, ColorMode)>,
    gradient_type: Option<GradientType>,
    corner_square_type: Option<CornerSquareType>,
    corner_dot_type: Option<CornerDotType>,
    error_correction: Option<ErrorCorrectionLevel>,
    download_format: Option<DownloadFormat>,
    frame: Option<FrameStyle>,
}

impl ConfigSetArgs {
    fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.size.is_none()
            && self.margin.is_none()
            && self.data.is_none()
            && self.dot_type.is_none()
            && self.dot_color.is_none()
            && self.color_mode.is_none()
            && self.gradient_type.is_none()
            && self.gradient_rotation.is_none()
            && self.gradient_start.is_none()
            && self.gradient_end.is_none()
            && self.corner_square_type.is_none()
            && self.corner_square_color.is_none()
            && self.corner_dot_type.is_none()
            && self.corner_dot_color.is_none()
            && self.background.is_none()
            && self.error_correction.is_none()
            && self.download_format.is_none()
            && self.logo.is_none()
            && !self.clear_logo
            && self.frame.is_none()
            && self.frame_label.is_none()
            && self.frame_label_color.is_none()
            && self.accordion.is_none()
    }

    fn parse(&self) -> CliResult<ParsedSet> {
        fn opt<T>(value: Option<&String>) -> CliResult<Option<T>>
        where
            T: std::str::FromStr<Err = anyhow::Error>,
        {
            value.map(|v| parse_value(v)).transpose()
        }

        let color_mode = match &self.color_mode {
            Some(mode) => Some((parse_value(&self.section)?, parse_value(mode)?)),
            None => None,
        };

        Ok(ParsedSet {
            dot_type: opt(self.dot_type.as_ref())?,
            color_mode,
            gradient_type: opt(self.gradient_type.as_ref())?,
            corner_square_type: opt(self.corner_square_type.as_ref())?,
            corner_dot_type: opt(self.corner_dot_type.as_ref())?,
            error_correction: opt(self.error_correction.as_ref())?,
            download_format: opt(self.download_format.as_ref())?,
            frame: opt(self.frame.as_ref())?,
        })
    }

    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.is_empty() {
            return Err(CliError::validation(format!(
                "At least one configuration option must be specified (see `{APP_BINARY_NAME} config set --help`)"
            )));
        }

        let parsed = self.parse()?;
        let mut store = open_store()?;
        self.apply(&mut store, parsed)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }

    fn apply(&self, store: &mut StyleStore<FileStorage>, parsed: ParsedSet) -> anyhow::Result<()> {
        let config = store.config().clone();

        let mut patch = StylePatch {
            width: self.size.or(self.width),
            height: self.size.or(self.height),
            margin: self.margin,
            data: self.data.clone(),
            ..StylePatch::default()
        };
        if let Some(square_type) = parsed.corner_square_type {
            let mut square = config.corners_square_options.clone();
            square.square_type = square_type;
            patch.corners_square_options = Some(square);
        }
        if let Some(dot_type) = parsed.corner_dot_type {
            let mut dot = config.corners_dot_options.clone();
            dot.dot_type = dot_type;
            patch.corners_dot_options = Some(dot);
        }
        if patch != StylePatch::default() {
            store.update_config(patch)?;
        }

        if parsed.dot_type.is_some() || self.dot_color.is_some() {
            store.update_module_options(DotsPatch {
                dot_type: parsed.dot_type,
                color: self.dot_color.clone(),
                gradient: None,
            })?;
        }
        for (section, color) in [
            (StyleSection::CornersSquare, &self.corner_square_color),
            (StyleSection::CornersDot, &self.corner_dot_color),
            (StyleSection::Background, &self.background),
        ] {
            if let Some(color) = color {
                store.update_section_options(
                    section,
                    SectionPatch {
                        color: Some(color.clone()),
                        gradient: None,
                    },
                )?;
            }
        }

        if let Some(gradient_type) = parsed.gradient_type {
            store.set_gradient_type(gradient_type);
        }
        if let Some((section, mode)) = parsed.color_mode {
            store.set_section_color_mode(section, mode);
        }
        if let Some(degrees) = self.gradient_rotation {
            store.set_gradient_rotation(degrees)?;
        }
        if let Some(color) = &self.gradient_start {
            store.update_gradient_color_stop(0, color)?;
        }
        if let Some(color) = &self.gradient_end {
            store.update_gradient_color_stop(1, color)?;
        }

        if let Some(level) = parsed.error_correction {
            store.set_error_correction_level(level);
        }
        if let Some(format) = parsed.download_format {
            store.set_download_format(format);
        }

        if let Some(logo) = &self.logo {
            store.set_logo(logo.as_str())?;
        } else if self.clear_logo {
            store.clear_logo();
        }

        if parsed.frame.is_some() || self.frame_label.is_some() || self.frame_label_color.is_some()
        {
            let current = &store.config().frame;
            let frame = Frame {
                style: parsed.frame.unwrap_or(current.style),
                label: self.frame_label.clone().unwrap_or_else(|| current.label.clone()),
                label_color: self
                    .frame_label_color
                    .clone()
                    .unwrap_or_else(|| current.label_color.clone()),
            };
            store.set_frame(frame)?;
        }

        if let Some(panel) = &self.accordion {
            store.set_active_accordion(panel.as_str());
        }

        Ok(())
    }
}

impl ConfigExportArgs {
    /// Execute export command
    pub fn execute(&self) -> CliResult<()> {
        let store = open_store()?;
        let path = store
            .export_configuration_as_file(&DirectorySaver::new(&self.dir))
            .map_err(|e| CliError::io(format!("Failed to export configuration: {e:#}")))?;
        println!("{}", path.display());
        Ok(())
    }
}

impl ConfigImportArgs {
    /// Execute import command
    pub fn execute(&self) -> CliResult<()> {
        let json = fs::read_to_string(&self.file).map_err(|e| {
            CliError::io(format!("Failed to read {}: {e}", self.file.display()))
        })?;

        let mut store = open_store()?;
        store
            .import_configuration(&json)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        println!("Configuration imported successfully.");
        Ok(())
    }
}

fn describe_fill(fill: &Fill) -> String {
    match &fill.gradient {
        Some(gradient) => {
            let stops: Vec<&str> = gradient
                .color_stops
                .iter()
                .map(|stop| stop.color.as_str())
                .collect();
            format!(
                "{} ({} gradient, {}°: {})",
                fill.color,
                gradient.gradient_type,
                gradient.rotation,
                stops.join(" -> ")
            )
        }
        None => fill.color.clone(),
    }
}

/// Output configuration in human-readable format
fn output_human_readable(store: &StyleStore<FileStorage>) {
    let config = store.config();
    let preferences = store.preferences();
    let heading = format!("{APP_NAME} Configuration");

    println!("{heading}");
    println!("{}", "=".repeat(heading.len()));
    println!();

    println!("Canvas:");
    println!("  Size: {}x{}", config.width, config.height);
    println!("  Margin: {}", config.margin);
    println!("  Preview data: {}", config.data);
    println!("  Error correction: {}", preferences.error_correction_level);
    match &config.image {
        Some(image) if image.chars().count() > 60 => {
            let prefix: String = image.chars().take(60).collect();
            println!("  Logo: {prefix}...");
        }
        Some(image) => println!("  Logo: {image}"),
        None => println!("  Logo: (none)"),
    }
    println!();

    println!("Modules:");
    println!("  Type: {}", config.dots_options.dot_type);
    println!("  Color: {}", describe_fill(&config.dots_options.fill));
    println!("Corner squares:");
    println!("  Type: {}", config.corners_square_options.square_type);
    println!(
        "  Color: {}",
        describe_fill(&config.corners_square_options.fill)
    );
    println!("Corner dots:");
    println!("  Type: {}", config.corners_dot_options.dot_type);
    println!("  Color: {}", describe_fill(&config.corners_dot_options.fill));
    println!("Background:");
    println!("  Color: {}", describe_fill(&config.background_options.fill));
    println!("Frame:");
    println!("  Style: {}", config.frame.style);
    if !config.frame.label.is_empty() {
        println!("  Label: {} ({})", config.frame.label, config.frame.label_color);
    }
    println!();

    println!("Preferences:");
    println!("  Download format: {}", preferences.download_format);
    let modes: Vec<String> = StyleSection::ALL
        .iter()
        .map(|section| format!("{}={}", section, store.color_mode(*section)))
        .collect();
    println!("  Color modes: {}", modes.join(", "));
    println!("  Gradient type: {}", preferences.gradient_type);
    if preferences.active_accordion.is_empty() {
        println!("  Active panel: (none)");
    } else {
        println!("  Active panel: {}", preferences.active_accordion);
    }
    println!();
    println!("Storage: {}", store.storage().dir().display());
}
