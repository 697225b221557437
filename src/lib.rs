//! LazyQR Library
//!
//! Builds the payload strings encoded into QR codes (URLs, MECARD Wi-Fi and
//! contact cards, vEvent calendar entries and more), keeps a persistent style
//! configuration for how codes are drawn, and renders styled codes to SVG or
//! raster images.

pub mod cli;
pub mod constants;
pub mod export;
pub mod formatter;
pub mod forms;
pub mod logging;
pub mod models;
pub mod render;
pub mod storage;
pub mod store;
