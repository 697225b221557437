//! Rendering orchestration.
//!
//! A [`Renderer`] drives a [`RenderEngine`]: the first [`Renderer::show`]
//! creates the engine and mounts it into a [`DisplayArea`], later calls
//! update it in place. [`Renderer::export`] temporarily resizes the engine,
//! exports a file and restores the previous size.
//!
//! [`qr::QrEngine`] is the built-in engine.

pub mod paint;
pub mod qr;
pub mod raster;
pub mod svg;
pub mod symbol;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{size, DOWNLOAD_FILE_STEM};
use crate::export::FileSaver;
use crate::models::{
    BackgroundOptions, CornersDotOptions, CornersSquareOptions, DotsOptions, DownloadFormat,
    ErrorCorrectionLevel, Fill, Frame, StyleConfiguration, StyleSection,
};

pub use qr::QrEngine;

/// Placement of an embedded logo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    /// Logo side relative to the symbol side
    pub image_size: f64,
    /// Gap between logo and surrounding modules, in pixels
    pub margin: u32,
    /// Leave modules behind the logo undrawn
    pub hide_background_dots: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            image_size: 0.4,
            margin: 0,
            hide_background_dots: true,
        }
    }
}

/// Everything an engine needs to draw one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Quiet margin in pixels
    pub margin: u32,
    /// Payload to encode
    pub data: String,
    /// Logo source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Logo placement
    pub image_options: ImageOptions,
    /// Error-correction level
    pub error_correction_level: ErrorCorrectionLevel,
    /// Module style
    pub dots_options: DotsOptions,
    /// Finder frame style
    pub corners_square_options: CornersSquareOptions,
    /// Finder centre style
    pub corners_dot_options: CornersDotOptions,
    /// Background
    pub background_options: BackgroundOptions,
    /// Frame decoration
    pub frame: Frame,
}

impl RenderRequest {
    /// Request drawing `payload` with `config`. The configuration's own `data` is ignored.
    pub fn new(payload: &str, config: &StyleConfiguration) -> Self {
        Self {
            width: config.width,
            height: config.height,
            margin: config.margin,
            data: payload.to_string(),
            image: config.image.clone(),
            image_options: ImageOptions::default(),
            error_correction_level: config.error_correction_level,
            dots_options: config.dots_options.clone(),
            corners_square_options: config.corners_square_options.clone(),
            corners_dot_options: config.corners_dot_options.clone(),
            background_options: config.background_options.clone(),
            frame: config.frame.clone(),
        }
    }

    /// Color settings of one section.
    pub const fn fill(&self, section: StyleSection) -> &Fill {
        match section {
            StyleSection::Dots => &self.dots_options.fill,
            StyleSection::CornersSquare => &self.corners_square_options.fill,
            StyleSection::CornersDot => &self.corners_dot_options.fill,
            StyleSection::Background => &self.background_options.fill,
        }
    }
}

/// Where an engine shows its current output.
pub trait DisplayArea {
    /// Replaces the displayed content with `svg`.
    fn present(&mut self, svg: &str) -> Result<()>;
}

/// Drawing backend.
pub trait RenderEngine {
    /// Builds an engine for `request`.
    fn create(request: &RenderRequest) -> Result<Self>
    where
        Self: Sized;

    /// Attaches the engine's output to `display` and draws into it.
    fn mount(&mut self, display: Box<dyn DisplayArea>) -> Result<()>;

    /// Redraws with a new request, keeping the same engine instance.
    fn update(&mut self, request: &RenderRequest) -> Result<()>;

    /// Produces a file in `format` and hands it to `saver`.
    fn export(
        &mut self,
        format: DownloadFormat,
        filename: &str,
        saver: &dyn FileSaver,
    ) -> Result<PathBuf>;

    /// Current output `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Changes the output size.
    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()>;
}

/// Owns the engine and the display it draws into.
pub struct Renderer<E: RenderEngine> {
    engine: Option<E>,
    display: Option<Box<dyn DisplayArea>>,
}

impl<E: RenderEngine> Default for Renderer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RenderEngine> Renderer<E> {
    /// Renderer without a display; output is only reachable through export.
    pub fn new() -> Self {
        Self {
            engine: None,
            display: None,
        }
    }

    /// Renderer that mounts into `display` on first show.
    pub fn with_display(display: Box<dyn DisplayArea>) -> Self {
        Self {
            engine: None,
            display: Some(display),
        }
    }

    /// The engine, once something has been shown.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Draws `payload` with `config`.
    ///
    /// Failures are logged and leave the previous output in place; returns
    /// whether the output is now current.
    pub fn show(&mut self, payload: &str, config: &StyleConfiguration) -> bool {
        let request = RenderRequest::new(payload, config);

        if let Some(engine) = self.engine.as_mut() {
            return match engine.update(&request) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to update QR code: {:#}", e);
                    false
                }
            };
        }

        let mut engine = match E::create(&request) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::warn!("Failed to create QR code: {:#}", e);
                return false;
            }
        };

        let mounted = match self.display.take() {
            Some(display) => match engine.mount(display) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to display QR code: {:#}", e);
                    false
                }
            },
            None => true,
        };

        self.engine = Some(engine);
        mounted
    }

    /// Exports the current output as `qr-code.<ext>`, optionally at `size` x `size` pixels.
    ///
    /// The previous dimensions are restored after a successful export. When
    /// the export itself fails the override stays in effect.
    pub fn export(
        &mut self,
        format: DownloadFormat,
        size: Option<u32>,
        saver: &dyn FileSaver,
    ) -> Result<PathBuf> {
        let engine = self
            .engine
            .as_mut()
            .context("Nothing to export: no QR code has been rendered")?;

        if let Some(side) = size {
            if !(size::MIN..=size::MAX).contains(&side) {
                anyhow::bail!(
                    "Invalid export size {side}. Must be between {} and {} pixels",
                    size::MIN,
                    size::MAX
                );
            }
        }

        let filename = format!("{}.{}", DOWNLOAD_FILE_STEM, format.extension());
        let (width, height) = engine.dimensions();

        if let Some(side) = size {
            engine.set_dimensions(side, side)?;
        }

        let path = engine.export(format, &filename, saver).map_err(|e| {
            tracing::warn!("Export failed: {:#}", e);
            e
        })?;

        if size.is_some() {
            engine.set_dimensions(width, height)?;
        }

        tracing::info!("Exported {} to {}", format, path.display());
        Ok(path)
    }
}

/// Display area that keeps the latest SVG in a file.
#[derive(Debug, Clone)]
pub struct FilePreview {
    path: PathBuf,
}

impl FilePreview {
    /// Preview written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DisplayArea for FilePreview {
    fn present(&mut self, svg: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!(
                "Failed to create preview directory: {}",
                parent.display()
            ))?;
        }
        fs::write(&self.path, svg)
            .context(format!("Failed to write preview: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Calls {
        created: usize,
        mounted: usize,
        updates: Vec<String>,
        exports: Vec<(DownloadFormat, String, (u32, u32))>,
        sizes: Vec<(u32, u32)>,
    }

    thread_local! {
        static CALLS: Rc<RefCell<Calls>> = Rc::new(RefCell::new(Calls::default()));
    }

    fn calls() -> Rc<RefCell<Calls>> {
        CALLS.with(Rc::clone)
    }

    /// Engine that records calls; payloads starting with "fail" make it fail.
    struct RecordingEngine {
        size: (u32, u32),
        fail_export: bool,
    }

    impl RenderEngine for RecordingEngine {
        fn create(request: &RenderRequest) -> Result<Self> {
            if request.data.starts_with("fail") {
                anyhow::bail!("cannot create");
            }
            calls().borrow_mut().created += 1;
            Ok(Self {
                size: (request.width, request.height),
                fail_export: false,
            })
        }

        fn mount(&mut self, mut display: Box<dyn DisplayArea>) -> Result<()> {
            calls().borrow_mut().mounted += 1;
            display.present("<svg/>")
        }

        fn update(&mut self, request: &RenderRequest) -> Result<()> {
            if request.data.starts_with("fail") {
                anyhow::bail!("cannot update");
            }
            self.fail_export = request.data == "export-fails";
            calls().borrow_mut().updates.push(request.data.clone());
            Ok(())
        }

        fn export(
            &mut self,
            format: DownloadFormat,
            filename: &str,
            saver: &dyn FileSaver,
        ) -> Result<PathBuf> {
            if self.fail_export {
                anyhow::bail!("disk full");
            }
            calls()
                .borrow_mut()
                .exports
                .push((format, filename.to_string(), self.size));
            saver.save(filename, b"data")
        }

        fn dimensions(&self) -> (u32, u32) {
            self.size
        }

        fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
            self.size = (width, height);
            calls().borrow_mut().sizes.push((width, height));
            Ok(())
        }
    }

    struct NullSaver;

    impl FileSaver for NullSaver {
        fn save(&self, filename: &str, _bytes: &[u8]) -> Result<PathBuf> {
            Ok(PathBuf::from(filename))
        }
    }

    #[test]
    fn test_request_carries_config_and_payload() {
        let config = StyleConfiguration::default();
        let request = RenderRequest::new("tel:123", &config);
        assert_eq!(request.data, "tel:123");
        assert_eq!(request.width, 300);
        assert_eq!(request.image_options, ImageOptions::default());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["imageOptions"]["imageSize"], 0.4);
        assert_eq!(json["imageOptions"]["hideBackgroundDots"], true);
        assert_eq!(json["dotsOptions"]["type"], "extra-rounded");
    }

    #[test]
    fn test_show_creates_once_then_updates() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let preview = FilePreview::new(temp_dir.path().join("preview.svg"));
        let mut renderer: Renderer<RecordingEngine> = Renderer::with_display(Box::new(preview));
        let config = StyleConfiguration::default();

        assert!(renderer.show("one", &config));
        assert!(renderer.show("two", &config));
        assert!(renderer.show("three", &config));

        let calls = calls();
        let calls = calls.borrow();
        assert_eq!(calls.created, 1);
        assert_eq!(calls.mounted, 1);
        assert_eq!(calls.updates, vec!["two", "three"]);
        assert!(temp_dir.path().join("preview.svg").exists());
    }

    #[test]
    fn test_show_failure_is_not_fatal() {
        let mut renderer: Renderer<RecordingEngine> = Renderer::new();
        let config = StyleConfiguration::default();

        assert!(!renderer.show("fail-create", &config));
        assert!(renderer.engine().is_none());

        assert!(renderer.show("ok", &config));
        assert!(!renderer.show("fail-update", &config));
        assert!(renderer.engine().is_some());
    }

    #[test]
    fn test_export_without_render_is_an_error() {
        let mut renderer: Renderer<RecordingEngine> = Renderer::new();
        assert!(renderer.export(DownloadFormat::Png, None, &NullSaver).is_err());
    }

    #[test]
    fn test_export_overrides_then_restores_size() {
        let mut renderer: Renderer<RecordingEngine> = Renderer::new();
        renderer.show("hello", &StyleConfiguration::default());

        let path = renderer
            .export(DownloadFormat::Webp, Some(1024), &NullSaver)
            .unwrap();
        assert_eq!(path, PathBuf::from("qr-code.webp"));

        let calls = calls();
        let calls = calls.borrow();
        assert_eq!(
            calls.exports,
            vec![(DownloadFormat::Webp, "qr-code.webp".to_string(), (1024, 1024))]
        );
        assert_eq!(calls.sizes, vec![(1024, 1024), (300, 300)]);
        assert_eq!(renderer.engine().unwrap().dimensions(), (300, 300));
    }

    #[test]
    fn test_failed_export_keeps_override_size() {
        let mut renderer: Renderer<RecordingEngine> = Renderer::new();
        let config = StyleConfiguration::default();
        renderer.show("hello", &config);
        renderer.show("export-fails", &config);

        assert!(renderer
            .export(DownloadFormat::Png, Some(512), &NullSaver)
            .is_err());
        assert_eq!(renderer.engine().unwrap().dimensions(), (512, 512));
    }

    #[test]
    fn test_export_rejects_out_of_range_size() {
        let mut renderer: Renderer<RecordingEngine> = Renderer::new();
        renderer.show("hello", &StyleConfiguration::default());
        assert!(renderer
            .export(DownloadFormat::Png, Some(4096), &NullSaver)
            .is_err());
        assert_eq!(renderer.engine().unwrap().dimensions(), (300, 300));
    }

    #[test]
    fn test_file_preview_writes_svg() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut preview = FilePreview::new(temp_dir.path().join("nested/qr.svg"));
        preview.present("<svg/>").unwrap();
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("nested/qr.svg")).unwrap(),
            "<svg/>"
        );
    }
}
