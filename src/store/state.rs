//! State held by the style store.

use serde::{Deserialize, Serialize};

use crate::models::{
    ColorMode, DownloadFormat, ErrorCorrectionLevel, GradientType, StyleConfiguration,
    StyleSection,
};

/// Color-input mode of each style section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorModes {
    /// Data modules
    #[serde(default = "default_dots_mode")]
    pub dots: ColorMode,
    /// Finder frames
    #[serde(default)]
    pub corners_square: ColorMode,
    /// Finder centres
    #[serde(default)]
    pub corners_dot: ColorMode,
    /// Background
    #[serde(default)]
    pub background: ColorMode,
}

fn default_dots_mode() -> ColorMode {
    ColorMode::Gradient
}

impl Default for ColorModes {
    fn default() -> Self {
        Self {
            dots: default_dots_mode(),
            corners_square: ColorMode::Single,
            corners_dot: ColorMode::Single,
            background: ColorMode::Single,
        }
    }
}

impl ColorModes {
    /// Modes matching the gradients present in `config`.
    #[must_use]
    pub fn from_config(config: &StyleConfiguration) -> Self {
        let mut modes = Self::default();
        for section in StyleSection::ALL {
            let mode = if config.fill(*section).gradient.is_some() {
                ColorMode::Gradient
            } else {
                ColorMode::Single
            };
            modes.set(*section, mode);
        }
        modes
    }

    /// Mode of one section.
    #[must_use]
    pub const fn get(&self, section: StyleSection) -> ColorMode {
        match section {
            StyleSection::Dots => self.dots,
            StyleSection::CornersSquare => self.corners_square,
            StyleSection::CornersDot => self.corners_dot,
            StyleSection::Background => self.background,
        }
    }

    /// Sets the mode of one section.
    pub fn set(&mut self, section: StyleSection, mode: ColorMode) {
        match section {
            StyleSection::Dots => self.dots = mode,
            StyleSection::CornersSquare => self.corners_square = mode,
            StyleSection::CornersDot => self.corners_dot = mode,
            StyleSection::Background => self.background = mode,
        }
    }
}

/// Stored form of [`ColorModes`]. Older stores kept a single mode string for
/// the modules only.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredColorModes {
    ModulesOnly(ColorMode),
    PerSection(ColorModes),
}

impl From<StoredColorModes> for ColorModes {
    fn from(stored: StoredColorModes) -> Self {
        match stored {
            StoredColorModes::ModulesOnly(dots) => Self {
                dots,
                ..Self::default()
            },
            StoredColorModes::PerSection(modes) => modes,
        }
    }
}

/// Editor preferences that live next to the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreferences {
    /// Format offered by the download dialog
    pub download_format: DownloadFormat,
    /// Color-input mode per section
    pub color_modes: ColorModes,
    /// Gradient type used when a gradient is synthesized
    pub gradient_type: GradientType,
    /// Expanded settings panel, empty when all are collapsed
    pub active_accordion: String,
    /// Error-correction level used for rendering
    pub error_correction_level: ErrorCorrectionLevel,
}

impl Default for StylePreferences {
    fn default() -> Self {
        Self {
            download_format: DownloadFormat::Png,
            color_modes: ColorModes::default(),
            gradient_type: GradientType::Radial,
            active_accordion: String::new(),
            error_correction_level: ErrorCorrectionLevel::H,
        }
    }
}

/// Everything the store holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleState {
    /// Style configuration
    pub config: StyleConfiguration,
    /// Editor preferences
    pub preferences: StylePreferences,
}
