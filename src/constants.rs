//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name, storage keys and export file names.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "LazyQR";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "lazyqr";

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "LazyQR";

/// Environment variable that overrides the storage directory.
pub const CONFIG_DIR_ENV: &str = "LAZYQR_CONFIG_DIR";

/// Logical keys under which the style store persists its state.
pub mod storage_keys {
    /// Full style configuration (JSON object).
    pub const CONFIG: &str = "qr-style-config";
    /// Color-input mode per style section.
    pub const COLOR_TYPE: &str = "qr-color-type";
    /// Gradient type preference used when a gradient is synthesized.
    pub const GRADIENT_TYPE: &str = "qr-gradient-type";
    /// Preferred download format.
    pub const DOWNLOAD_FORMAT: &str = "qr-download-format";
    /// Currently expanded settings panel.
    pub const ACCORDION_STATE: &str = "qr-accordion-state";
    /// Error-correction level preference.
    pub const ERROR_CORRECTION_LEVEL: &str = "qr-error-correction-level";
}

/// File name used when exporting the style configuration.
pub const CONFIG_EXPORT_FILENAME: &str = "qr-config.json";

/// File stem used for rendered downloads.
pub const DOWNLOAD_FILE_STEM: &str = "qr-code";

/// Render size bounds enforced at the configuration boundary (pixels).
pub mod size {
    /// Smallest accepted width/height.
    pub const MIN: u32 = 128;
    /// Largest accepted width/height.
    pub const MAX: u32 = 2048;
    /// Default width/height.
    pub const DEFAULT: u32 = 300;
}

/// Second stop used when a gradient is synthesized from a flat color.
pub const GRADIENT_SECONDARY_COLOR: &str = "#90EE90";

/// Placeholder payload stored in a fresh configuration.
pub const DEFAULT_DATA: &str = "https://brainstation-23.easy.jobs";
