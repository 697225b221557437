//! Raster output for png, jpeg and webp.
//!
//! The SVG document is rasterized with resvg and encoded with `image`, so
//! raster files show the same shapes, gradients, logo and frame as SVG.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::{Arc, LazyLock};
use tiny_skia::{Color, Pixmap, Transform};
use usvg::{fontdb, Options, Tree};

use crate::models::DownloadFormat;

/// System fonts for frame labels, loaded once.
static FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();
    tracing::debug!("Loaded {} font faces", fonts.len());
    Arc::new(fonts)
});

/// Rasterizes `svg` and encodes it in `format`.
pub fn render(svg: &str, format: DownloadFormat) -> Result<Vec<u8>> {
    let image_format = match format {
        DownloadFormat::Png => ImageFormat::Png,
        DownloadFormat::Jpeg => ImageFormat::Jpeg,
        DownloadFormat::Webp => ImageFormat::WebP,
        DownloadFormat::Svg => anyhow::bail!("SVG is not a raster format"),
    };

    // JPEG has no alpha channel; transparent areas become white.
    let image = match format {
        DownloadFormat::Jpeg => {
            let canvas = rasterize(svg, Some(Color::WHITE))?;
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(rasterize(svg, None)?),
    };

    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image_format)
        .context(format!("Failed to encode {format} image"))?;

    Ok(bytes.into_inner())
}

/// Draws `svg` at its own size onto an RGBA canvas, over `backdrop` when given.
pub fn rasterize(svg: &str, backdrop: Option<Color>) -> Result<RgbaImage> {
    let options = Options {
        fontdb: Arc::clone(&FONTS),
        ..Options::default()
    };
    let tree = Tree::from_str(svg, &options).context("Failed to parse SVG")?;

    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height()).context(format!(
        "Failed to create a {}x{} canvas",
        size.width(),
        size.height()
    ))?;
    if let Some(color) = backdrop {
        pixmap.fill(color);
    }
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha.
    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();

    RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixels)
        .context("Rasterized pixel buffer has the wrong length")
}
