//! Built-in rendering engine.

use anyhow::Result;
use std::path::PathBuf;

use super::symbol::{Layout, Symbol};
use super::{raster, svg, DisplayArea, RenderEngine, RenderRequest};
use crate::export::FileSaver;
use crate::models::DownloadFormat;

/// Engine that encodes with the `qrcode` crate and paints SVG or raster output.
pub struct QrEngine {
    request: RenderRequest,
    symbol: Symbol,
    display: Option<Box<dyn DisplayArea>>,
}

impl QrEngine {
    /// Current request.
    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    /// Encoded module grid.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Current output as an SVG document.
    pub fn to_svg(&self) -> Result<String> {
        svg::render(&self.request, &self.symbol)
    }

    /// Current output encoded in `format`.
    pub fn render(&self, format: DownloadFormat) -> Result<Vec<u8>> {
        match format {
            DownloadFormat::Svg => Ok(self.to_svg()?.into_bytes()),
            _ => raster::render(&self.to_svg()?, format),
        }
    }

    fn redraw(&mut self) -> Result<()> {
        if self.display.is_none() {
            return Ok(());
        }
        let svg = self.to_svg()?;
        if let Some(display) = self.display.as_mut() {
            display.present(&svg)?;
        }
        Ok(())
    }
}

impl RenderEngine for QrEngine {
    fn create(request: &RenderRequest) -> Result<Self> {
        let symbol = Symbol::encode(&request.data, request.error_correction_level)?;
        Layout::fit(request.width, request.height, request.margin, &symbol)?;
        tracing::debug!(
            "Encoded {} bytes into {}x{} modules",
            request.data.len(),
            symbol.size(),
            symbol.size()
        );
        Ok(Self {
            request: request.clone(),
            symbol,
            display: None,
        })
    }

    fn mount(&mut self, display: Box<dyn DisplayArea>) -> Result<()> {
        self.display = Some(display);
        self.redraw()
    }

    fn update(&mut self, request: &RenderRequest) -> Result<()> {
        if request.data != self.request.data
            || request.error_correction_level != self.request.error_correction_level
        {
            let symbol = Symbol::encode(&request.data, request.error_correction_level)?;
            Layout::fit(request.width, request.height, request.margin, &symbol)?;
            self.symbol = symbol;
        } else {
            Layout::fit(request.width, request.height, request.margin, &self.symbol)?;
        }
        self.request = request.clone();
        self.redraw()
    }

    fn export(
        &mut self,
        format: DownloadFormat,
        filename: &str,
        saver: &dyn FileSaver,
    ) -> Result<PathBuf> {
        let bytes = self.render(format)?;
        saver.save(filename, &bytes)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.request.width, self.request.height)
    }

    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
        Layout::fit(width, height, self.request.margin, &self.symbol)?;
        self.request.width = width;
        self.request.height = height;
        self.redraw()
    }
}
