//! Visual style configuration for rendered QR codes.
//!
//! The JSON shape of [`StyleConfiguration`] is the one persisted under the
//! `qr-style-config` storage key and written by the configuration export, so
//! an exported `qr-config.json` can be imported again unchanged.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RgbColor;
use crate::constants::{self, size};

/// Implements `ALL`, `as_str`, `Display` and `FromStr` for a fieldless enum
/// whose variants have fixed wire names.
macro_rules! named_enum {
    ($ty:ident, $what:literal { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            #[doc = concat!("Every ", $what, ", in display order.")]
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            #[doc = concat!("Wire name of the ", $what, ".")]
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        anyhow::anyhow!(
                            "Invalid {} '{}'. Must be one of: {}",
                            $what,
                            s,
                            expected.join(", ")
                        )
                    })
            }
        }
    };
}

/// Shape of the data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    /// Plain squares
    Square,
    /// Circles
    Dots,
    /// Squares with rounded corners, merged with neighbours
    Rounded,
    /// Strongly rounded, merged with neighbours
    #[default]
    ExtraRounded,
    /// Leaf shape with two sharp corners
    Classy,
    /// Leaf shape with softened corners
    ClassyRounded,
}

named_enum!(DotType, "dot type" {
    Square => "square",
    Dots => "dots",
    Rounded => "rounded",
    ExtraRounded => "extra-rounded",
    Classy => "classy",
    ClassyRounded => "classy-rounded",
});

/// Shape of the three 7x7 finder frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    /// Square frame
    Square,
    /// Circular frame
    Dot,
    /// Rounded frame
    #[default]
    ExtraRounded,
}

named_enum!(CornerSquareType, "corner square type" {
    Square => "square",
    Dot => "dot",
    ExtraRounded => "extra-rounded",
});

/// Shape of the three 3x3 finder centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    /// Square centre
    Square,
    /// Circular centre
    #[default]
    Dot,
    /// Drawn like ordinary data modules
    None,
}

named_enum!(CornerDotType, "corner dot type" {
    Square => "square",
    Dot => "dot",
    None => "none",
});

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    /// Along a line rotated by the gradient's rotation
    #[default]
    Linear,
    /// Outwards from the centre
    Radial,
}

named_enum!(GradientType, "gradient type" {
    Linear => "linear",
    Radial => "radial",
});

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorCorrectionLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    #[default]
    H,
}

named_enum!(ErrorCorrectionLevel, "error correction level" {
    L => "L",
    M => "M",
    Q => "Q",
    H => "H",
});

/// Decoration drawn around the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    /// No frame, no label
    #[default]
    None,
    /// Rounded rectangle
    Square,
    /// Circle
    Circle,
}

named_enum!(FrameStyle, "frame style" {
    None => "none",
    Square => "square",
    Circle => "circle",
});

/// File format offered for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    /// Vector output
    Svg,
    /// Lossless raster
    #[default]
    Png,
    /// Lossy raster, no transparency
    Jpeg,
    /// WebP raster
    Webp,
}

named_enum!(DownloadFormat, "download format" {
    Svg => "svg",
    Png => "png",
    Jpeg => "jpeg",
    Webp => "webp",
});

impl DownloadFormat {
    /// File extension (without the dot).
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// MIME type of the exported file.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            DownloadFormat::Svg => "image/svg+xml",
            DownloadFormat::Png => "image/png",
            DownloadFormat::Jpeg => "image/jpeg",
            DownloadFormat::Webp => "image/webp",
        }
    }
}

/// How a section's color is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// One flat color
    #[default]
    Single,
    /// Two-stop gradient
    Gradient,
}

named_enum!(ColorMode, "color mode" {
    Single => "single",
    Gradient => "gradient",
});

/// A colorable part of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleSection {
    /// Data modules
    Dots,
    /// Finder frames
    CornersSquare,
    /// Finder centres
    CornersDot,
    /// Background
    Background,
}

named_enum!(StyleSection, "style section" {
    Dots => "dots",
    CornersSquare => "corners-square",
    CornersDot => "corners-dot",
    Background => "background",
});

/// One gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient, 0.0-1.0
    pub offset: f64,
    /// CSS hex color
    pub color: String,
}

impl ColorStop {
    /// Creates a stop.
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// Color gradient. The editor works with exactly two stops, the shape allows more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// Linear or radial
    #[serde(rename = "type")]
    pub gradient_type: GradientType,
    /// Rotation in degrees (linear gradients only)
    #[serde(default)]
    pub rotation: f64,
    /// Ordered stops
    pub color_stops: Vec<ColorStop>,
}

impl Gradient {
    /// The stock orange-to-green module gradient.
    #[must_use]
    pub fn default_module() -> Self {
        Self {
            gradient_type: GradientType::Linear,
            rotation: 0.0,
            color_stops: vec![
                ColorStop::new(0.0, "#FF8C00"),
                ColorStop::new(1.0, constants::GRADIENT_SECONDARY_COLOR),
            ],
        }
    }

    /// Two-stop gradient running from `color` to the fixed secondary color.
    #[must_use]
    pub fn seeded(color: &str, gradient_type: GradientType) -> Self {
        Self {
            gradient_type,
            rotation: 0.0,
            color_stops: vec![
                ColorStop::new(0.0, color),
                ColorStop::new(1.0, constants::GRADIENT_SECONDARY_COLOR),
            ],
        }
    }
}

/// Flat color plus optional gradient; the gradient wins when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// CSS hex color
    pub color: String,
    /// Optional gradient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

impl Fill {
    /// Flat fill.
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            gradient: None,
        }
    }
}

/// Data module options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotsOptions {
    /// Module shape
    #[serde(rename = "type")]
    pub dot_type: DotType,
    /// Module color
    #[serde(flatten)]
    pub fill: Fill,
}

/// Finder frame options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornersSquareOptions {
    /// Frame shape
    #[serde(rename = "type")]
    pub square_type: CornerSquareType,
    /// Frame color
    #[serde(flatten)]
    pub fill: Fill,
}

/// Finder centre options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornersDotOptions {
    /// Centre shape
    #[serde(rename = "type")]
    pub dot_type: CornerDotType,
    /// Centre color
    #[serde(flatten)]
    pub fill: Fill,
}

/// Background options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    /// Background color
    #[serde(flatten)]
    pub fill: Fill,
}

/// Presentation-only decoration drawn outside the encoded symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame shape
    #[serde(default)]
    pub style: FrameStyle,
    /// Caption under the symbol
    #[serde(default)]
    pub label: String,
    /// Caption and frame color
    #[serde(default = "default_label_color")]
    pub label_color: String,
}

fn default_label_color() -> String {
    "#000000".to_string()
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            style: FrameStyle::None,
            label: String::new(),
            label_color: default_label_color(),
        }
    }
}

/// Complete style configuration handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfiguration {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Quiet margin in pixels
    #[serde(default)]
    pub margin: u32,
    /// Payload shown in the settings preview
    #[serde(default)]
    pub data: String,
    /// Embedded logo (data URI or http(s) URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Error-correction level
    #[serde(default)]
    pub error_correction_level: ErrorCorrectionLevel,
    /// Data module options
    pub dots_options: DotsOptions,
    /// Finder frame options
    pub corners_square_options: CornersSquareOptions,
    /// Finder centre options
    pub corners_dot_options: CornersDotOptions,
    /// Background options
    pub background_options: BackgroundOptions,
    /// Frame decoration and label
    #[serde(default)]
    pub frame: Frame,
}

impl Default for StyleConfiguration {
    fn default() -> Self {
        Self {
            width: size::DEFAULT,
            height: size::DEFAULT,
            margin: 0,
            data: constants::DEFAULT_DATA.to_string(),
            image: None,
            error_correction_level: ErrorCorrectionLevel::H,
            dots_options: DotsOptions {
                dot_type: DotType::ExtraRounded,
                fill: Fill {
                    color: "#6b2e6e".to_string(),
                    gradient: Some(Gradient::default_module()),
                },
            },
            corners_square_options: CornersSquareOptions {
                square_type: CornerSquareType::ExtraRounded,
                fill: Fill::solid("#000000"),
            },
            corners_dot_options: CornersDotOptions {
                dot_type: CornerDotType::Dot,
                fill: Fill::solid("#000000"),
            },
            background_options: BackgroundOptions {
                fill: Fill::solid("#ffffff"),
            },
            frame: Frame::default(),
        }
    }
}

impl StyleConfiguration {
    /// Color settings of one section.
    #[must_use]
    pub const fn fill(&self, section: StyleSection) -> &Fill {
        match section {
            StyleSection::Dots => &self.dots_options.fill,
            StyleSection::CornersSquare => &self.corners_square_options.fill,
            StyleSection::CornersDot => &self.corners_dot_options.fill,
            StyleSection::Background => &self.background_options.fill,
        }
    }

    /// Mutable color settings of one section.
    pub fn fill_mut(&mut self, section: StyleSection) -> &mut Fill {
        match section {
            StyleSection::Dots => &mut self.dots_options.fill,
            StyleSection::CornersSquare => &mut self.corners_square_options.fill,
            StyleSection::CornersDot => &mut self.corners_dot_options.fill,
            StyleSection::Background => &mut self.background_options.fill,
        }
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - width and height within the accepted render size range
    /// - every color (flat, gradient stop, label) is a hex color
    /// - gradients have at least one stop, offsets within 0.0-1.0, finite rotation
    /// - the logo is a `data:image/...` URI or an http(s) URL
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(size::MIN..=size::MAX).contains(&value) {
                anyhow::bail!(
                    "Invalid {name} {value}. Must be between {} and {} pixels",
                    size::MIN,
                    size::MAX
                );
            }
        }

        for section in StyleSection::ALL {
            validate_fill(self.fill(*section))
                .with_context(|| format!("Invalid {section} color settings"))?;
        }

        RgbColor::from_hex(&self.frame.label_color).context("Invalid frame label color")?;

        if let Some(image) = &self.image {
            validate_image_source(image)?;
        }

        Ok(())
    }
}

fn validate_fill(fill: &Fill) -> Result<()> {
    RgbColor::from_hex(&fill.color)?;

    if let Some(gradient) = &fill.gradient {
        if gradient.color_stops.is_empty() {
            anyhow::bail!("Gradient must have at least one color stop");
        }
        if !gradient.rotation.is_finite() {
            anyhow::bail!("Gradient rotation must be a finite number of degrees");
        }
        for stop in &gradient.color_stops {
            if !(0.0..=1.0).contains(&stop.offset) {
                anyhow::bail!(
                    "Invalid color stop offset {}. Must be between 0 and 1",
                    stop.offset
                );
            }
            RgbColor::from_hex(&stop.color)?;
        }
    }

    Ok(())
}

fn validate_image_source(image: &str) -> Result<()> {
    if image.starts_with("data:image/") {
        return Ok(());
    }

    let parsed = url::Url::parse(image).context(format!("Invalid logo source '{image}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("Invalid logo source scheme '{other}'. Use a data URI or http(s) URL"),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Shallow partial update of the top-level configuration.
///
/// Each present field replaces the corresponding field wholesale; nested
/// records are not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylePatch {
    /// New width
    pub width: Option<u32>,
    /// New height
    pub height: Option<u32>,
    /// New margin
    pub margin: Option<u32>,
    /// New preview payload
    pub data: Option<String>,
    /// New logo; `Some(None)` removes it
    #[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    /// New error-correction level
    pub error_correction_level: Option<ErrorCorrectionLevel>,
    /// Replacement module options
    pub dots_options: Option<DotsOptions>,
    /// Replacement finder frame options
    pub corners_square_options: Option<CornersSquareOptions>,
    /// Replacement finder centre options
    pub corners_dot_options: Option<CornersDotOptions>,
    /// Replacement background options
    pub background_options: Option<BackgroundOptions>,
    /// Replacement frame
    pub frame: Option<Frame>,
}

impl StylePatch {
    /// Applies the present fields to `config`.
    pub fn apply_to(self, config: &mut StyleConfiguration) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if let Some(data) = self.data {
            config.data = data;
        }
        if let Some(image) = self.image {
            config.image = image;
        }
        if let Some(level) = self.error_correction_level {
            config.error_correction_level = level;
        }
        if let Some(dots) = self.dots_options {
            config.dots_options = dots;
        }
        if let Some(square) = self.corners_square_options {
            config.corners_square_options = square;
        }
        if let Some(dot) = self.corners_dot_options {
            config.corners_dot_options = dot;
        }
        if let Some(background) = self.background_options {
            config.background_options = background;
        }
        if let Some(frame) = self.frame {
            config.frame = frame;
        }
    }
}

/// Partial update merged into the module options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotsPatch {
    /// New module shape
    #[serde(rename = "type")]
    pub dot_type: Option<DotType>,
    /// New flat color
    pub color: Option<String>,
    /// New gradient; `Some(None)` removes it
    #[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Option<Gradient>>,
}

impl DotsPatch {
    /// Applies the present fields to the module options.
    pub fn apply_to(self, dots: &mut DotsOptions) {
        if let Some(dot_type) = self.dot_type {
            dots.dot_type = dot_type;
        }
        SectionPatch {
            color: self.color,
            gradient: self.gradient,
        }
        .apply_to(&mut dots.fill);
    }
}

/// Partial update merged into one section's colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionPatch {
    /// New flat color
    pub color: Option<String>,
    /// New gradient; `Some(None)` removes it
    #[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Option<Gradient>>,
}

impl SectionPatch {
    /// Applies the present fields to `fill`.
    pub fn apply_to(self, fill: &mut Fill) {
        if let Some(color) = self.color {
            fill.color = color;
        }
        if let Some(gradient) = self.gradient {
            fill.gradient = gradient;
        }
    }
}
