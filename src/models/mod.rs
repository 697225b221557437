//! Data models for QR content and visual style.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of storage, rendering and the command-line surface.

pub mod payload;
pub mod rgb;
pub mod style;

// Re-export all model types
pub use payload::{
    CalendarPayload, ContentKind, ContentPayload, EmailPayload, LocationPayload, PhonePayload,
    TextPayload, UrlPayload, VCardPayload, WifiEncryption, WifiPayload,
};
pub use rgb::RgbColor;
pub use style::{
    BackgroundOptions, ColorMode, ColorStop, CornerDotType, CornerSquareType, CornersDotOptions,
    CornersSquareOptions, DotType, DotsOptions, DotsPatch, DownloadFormat, ErrorCorrectionLevel,
    Fill, Frame, FrameStyle, Gradient, GradientType, SectionPatch, StyleConfiguration, StylePatch,
    StyleSection,
};
