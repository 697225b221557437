//! Encoded QR module grid and the regions the painters treat specially.

use anyhow::{bail, Context, Result};
use qrcode::{EcLevel, QrCode};

use crate::models::ErrorCorrectionLevel;

/// Side of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

/// Which kind of module sits at a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleRole {
    /// Ordinary data or timing module
    Data,
    /// Outer 7x7 ring of a finder pattern
    FinderFrame,
    /// Inner 3x3 block of a finder pattern
    FinderCenter,
}

/// Square grid of dark/light modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    size: usize,
    dark: Vec<bool>,
}

impl From<ErrorCorrectionLevel> for EcLevel {
    fn from(level: ErrorCorrectionLevel) -> Self {
        match level {
            ErrorCorrectionLevel::L => EcLevel::L,
            ErrorCorrectionLevel::M => EcLevel::M,
            ErrorCorrectionLevel::Q => EcLevel::Q,
            ErrorCorrectionLevel::H => EcLevel::H,
        }
    }
}

impl Symbol {
    /// Encodes `data` at the given error-correction level.
    pub fn encode(data: &str, level: ErrorCorrectionLevel) -> Result<Self> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), level.into())
            .context(format!(
                "Failed to encode {} bytes at error correction level {}",
                data.len(),
                level
            ))?;

        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();

        Ok(Self {
            size: code.width(),
            dark,
        })
    }

    /// Modules per side.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// True when the module at column `x`, row `y` is dark. Out of range is light.
    pub fn is_dark(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        x < self.size && y < self.size && self.dark[y * self.size + x]
    }

    /// Top-left corners of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.size - FINDER_SIZE;
        [(0, 0), (far, 0), (0, far)]
    }

    /// Role of the module at `(x, y)`.
    pub fn role(&self, x: usize, y: usize) -> ModuleRole {
        for (fx, fy) in self.finder_origins() {
            if (fx..fx + FINDER_SIZE).contains(&x) && (fy..fy + FINDER_SIZE).contains(&y) {
                let (dx, dy) = (x - fx, y - fy);
                return if (2..5).contains(&dx) && (2..5).contains(&dy) {
                    ModuleRole::FinderCenter
                } else {
                    ModuleRole::FinderFrame
                };
            }
        }
        ModuleRole::Data
    }

    /// Centred square of modules reserved for a logo covering `fraction` of the symbol.
    ///
    /// Returns `(start, len)` in modules; the box has the parity of the symbol so
    /// it sits exactly in the middle.
    pub fn logo_box(&self, fraction: f64) -> Option<(usize, usize)> {
        let mut len = (self.size as f64 * fraction.clamp(0.0, 1.0)).floor() as usize;
        if len == 0 {
            return None;
        }
        if len % 2 != self.size % 2 {
            len -= 1;
        }
        if len == 0 {
            return None;
        }
        Some(((self.size - len) / 2, len))
    }
}

/// Pixel placement of a symbol inside a `width` x `height` output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Output width
    pub width: u32,
    /// Output height
    pub height: u32,
    /// Module side in pixels
    pub module: f64,
    /// Left edge of the module grid
    pub origin_x: f64,
    /// Top edge of the module grid
    pub origin_y: f64,
    /// Modules per side
    pub count: usize,
}

impl Layout {
    /// Fits `symbol` into the output, centred, leaving `margin` pixels on the short side.
    ///
    /// Modules are whole pixels. Fails when the grid would need less than
    /// one pixel per module.
    pub fn fit(width: u32, height: u32, margin: u32, symbol: &Symbol) -> Result<Self> {
        let count = symbol.size();
        let available = width.min(height).saturating_sub(margin.saturating_mul(2));
        if (available as usize) < count {
            bail!(
                "{count}x{count} modules do not fit in {width}x{height} with a {margin}px margin"
            );
        }
        let module = (f64::from(available) / count as f64).floor();
        let side = module * count as f64;

        Ok(Self {
            width,
            height,
            module,
            origin_x: (f64::from(width) - side) / 2.0,
            origin_y: (f64::from(height) - side) / 2.0,
            count,
        })
    }

    /// Side of the module grid in pixels.
    pub fn side(&self) -> f64 {
        self.module * self.count as f64
    }

    /// Pixel position of module `(x, y)`'s top-left corner.
    pub fn module_origin(&self, x: usize, y: usize) -> (f64, f64) {
        (
            self.origin_x + x as f64 * self.module,
            self.origin_y + y as f64 * self.module,
        )
    }
}
