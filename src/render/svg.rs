//! SVG painter: module shapes, finder styles, gradients, logo and frame.

use anyhow::{Context, Result};
use std::fmt::Write as _;

use super::paint::{linear_endpoints, radial_radius, PaintBox};
use super::symbol::{Layout, ModuleRole, Symbol, FINDER_SIZE};
use super::RenderRequest;
use crate::models::{
    CornerDotType, CornerSquareType, DotType, Fill, FrameStyle, GradientType, RgbColor,
    StyleSection,
};

/// Padding between the output and a frame border, in pixels.
const FRAME_PADDING: f64 = 16.0;
/// Height reserved below the frame for the label.
const LABEL_BAND: f64 = 40.0;
const LABEL_HEIGHT: f64 = 26.0;
const LABEL_FONT_SIZE: f64 = 14.0;

/// Renders the request as a standalone SVG document.
pub fn render(request: &RenderRequest, symbol: &Symbol) -> Result<String> {
    let layout = Layout::fit(request.width, request.height, request.margin, symbol)?;
    let frame = FrameGeometry::new(request);
    let (dx, dy) = frame.content_offset;

    let mut defs = String::new();
    let mut body = String::new();

    let content = (f64::from(request.width), f64::from(request.height));
    let background_area = PaintBox {
        x: dx,
        y: dy,
        side: content.0.max(content.1),
    };
    let symbol_area = PaintBox {
        x: dx + layout.origin_x,
        y: dy + layout.origin_y,
        side: layout.side(),
    };

    let background = fill_ref(
        request.fill(StyleSection::Background),
        "background-color",
        background_area,
        &mut defs,
    )?;
    let dots = fill_ref(
        request.fill(StyleSection::Dots),
        "dot-color",
        symbol_area,
        &mut defs,
    )?;
    let corners_square = fill_ref(
        request.fill(StyleSection::CornersSquare),
        "corners-square-color",
        symbol_area,
        &mut defs,
    )?;
    let corners_dot = fill_ref(
        request.fill(StyleSection::CornersDot),
        "corners-dot-color",
        symbol_area,
        &mut defs,
    )?;

    frame.write_backdrop(request, &mut body)?;

    writeln!(
        body,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        num(dx),
        num(dy),
        num(content.0),
        num(content.1),
        background
    )?;

    let hidden = logo_cutout(request, symbol);
    let is_hidden = |x: usize, y: usize| {
        hidden.is_some_and(|(start, len)| {
            (start..start + len).contains(&x) && (start..start + len).contains(&y)
        })
    };

    // Data modules, plus finder centres when those are drawn as plain modules.
    let centres_as_data = request.corners_dot_options.dot_type == CornerDotType::None;
    let mut dot_path = String::new();
    for y in 0..symbol.size() {
        for x in 0..symbol.size() {
            if !symbol.is_dark(x as isize, y as isize) || is_hidden(x, y) {
                continue;
            }
            let role = symbol.role(x, y);
            if role == ModuleRole::Data || (centres_as_data && role == ModuleRole::FinderCenter) {
                let (px, py) = layout.module_origin(x, y);
                let radii = corner_radii(
                    request.dots_options.dot_type,
                    layout.module,
                    neighbours(symbol, x, y),
                );
                rect_path(
                    &mut dot_path,
                    dx + px,
                    dy + py,
                    layout.module,
                    layout.module,
                    radii,
                );
            }
        }
    }
    if !dot_path.is_empty() {
        writeln!(body, r#"<path fill="{dots}" d="{dot_path}"/>"#)?;
    }

    let mut square_path = String::new();
    let mut centre_path = String::new();
    for (fx, fy) in symbol.finder_origins() {
        let (px, py) = layout.module_origin(fx, fy);
        let (px, py) = (dx + px, dy + py);
        let s = layout.module;
        finder_frame_path(
            &mut square_path,
            request.corners_square_options.square_type,
            px,
            py,
            s,
        );
        if !centres_as_data {
            finder_centre_path(
                &mut centre_path,
                request.corners_dot_options.dot_type,
                px + 2.0 * s,
                py + 2.0 * s,
                s,
            );
        }
    }
    writeln!(
        body,
        r#"<path fill="{corners_square}" fill-rule="evenodd" d="{square_path}"/>"#
    )?;
    if !centre_path.is_empty() {
        writeln!(body, r#"<path fill="{corners_dot}" d="{centre_path}"/>"#)?;
    }

    if let (Some(image), Some((start, len))) = (&request.image, logo_area(request, symbol)) {
        let (px, py) = layout.module_origin(start, start);
        let inset = f64::from(request.image_options.margin);
        let side = (len as f64 * layout.module - 2.0 * inset).max(0.0);
        writeln!(
            body,
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet"/>"#,
            escape_xml(image),
            num(dx + px + inset),
            num(dy + py + inset),
            num(side),
            num(side)
        )?;
    }

    frame.write_decoration(request, &mut body)?;

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(frame.canvas.0),
        h = num(frame.canvas.1)
    )?;
    if !defs.is_empty() {
        writeln!(svg, "<defs>\n{defs}</defs>")?;
    }
    svg.push_str(&body);
    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Logo box in modules, when a logo is set.
fn logo_area(request: &RenderRequest, symbol: &Symbol) -> Option<(usize, usize)> {
    request
        .image
        .as_ref()
        .and_then(|_| symbol.logo_box(request.image_options.image_size))
}

/// Modules left undrawn behind the logo.
fn logo_cutout(request: &RenderRequest, symbol: &Symbol) -> Option<(usize, usize)> {
    if request.image_options.hide_background_dots {
        logo_area(request, symbol)
    } else {
        None
    }
}

/// Placement of the frame decoration around the content.
struct FrameGeometry {
    canvas: (f64, f64),
    content_offset: (f64, f64),
    /// Border box: x, y, width, height
    border: Option<(f64, f64, f64, f64)>,
    label_center: Option<(f64, f64)>,
}

impl FrameGeometry {
    fn new(request: &RenderRequest) -> Self {
        let (w, h) = (f64::from(request.width), f64::from(request.height));
        let has_label = !request.frame.label.trim().is_empty();

        match request.frame.style {
            FrameStyle::None => Self {
                canvas: (w, h),
                content_offset: (0.0, 0.0),
                border: None,
                label_center: None,
            },
            FrameStyle::Square => {
                let bw = w + 2.0 * FRAME_PADDING;
                let bh = h + 2.0 * FRAME_PADDING;
                let band = if has_label { LABEL_BAND } else { 0.0 };
                Self {
                    canvas: (bw + 2.0, bh + 2.0 + band),
                    content_offset: (1.0 + FRAME_PADDING, 1.0 + FRAME_PADDING),
                    border: Some((1.0, 1.0, bw, bh)),
                    label_center: has_label.then_some(((bw + 2.0) / 2.0, bh + 2.0 + band / 2.0)),
                }
            }
            FrameStyle::Circle => {
                let diameter = w.hypot(h).ceil() + 2.0 * FRAME_PADDING;
                let band = if has_label { LABEL_BAND } else { 0.0 };
                Self {
                    canvas: (diameter + 2.0, diameter + 2.0 + band),
                    content_offset: (1.0 + (diameter - w) / 2.0, 1.0 + (diameter - h) / 2.0),
                    border: Some((1.0, 1.0, diameter, diameter)),
                    label_center: has_label
                        .then_some(((diameter + 2.0) / 2.0, diameter + 2.0 + band / 2.0)),
                }
            }
        }
    }

    /// Frame background, drawn below everything else.
    fn write_backdrop(&self, request: &RenderRequest, out: &mut String) -> Result<()> {
        let Some((x, y, w, h)) = self.border else {
            return Ok(());
        };
        let background = solid_hex(&request.background_options.fill.color)?;
        match request.frame.style {
            FrameStyle::Circle => writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{background}"/>"#,
                num(x + w / 2.0),
                num(y + h / 2.0),
                num(w / 2.0)
            )?,
            _ => writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="{background}"/>"#,
                num(x),
                num(y),
                num(w),
                num(h)
            )?,
        }
        Ok(())
    }

    /// Frame border and label, drawn on top.
    fn write_decoration(&self, request: &RenderRequest, out: &mut String) -> Result<()> {
        let Some((x, y, w, h)) = self.border else {
            return Ok(());
        };
        let stroke = solid_hex(&request.dots_options.fill.color)?;
        match request.frame.style {
            FrameStyle::Circle => writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
                num(x + w / 2.0),
                num(y + h / 2.0),
                num(w / 2.0)
            )?,
            _ => writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
                num(x),
                num(y),
                num(w),
                num(h)
            )?,
        }

        if let Some((cx, cy)) = self.label_center {
            let label = request.frame.label.trim();
            let color = solid_hex(&request.frame.label_color)?;
            let background = solid_hex(&request.background_options.fill.color)?;
            let width = label.chars().count() as f64 * LABEL_FONT_SIZE * 0.6 + 32.0;
            let radius = if request.frame.style == FrameStyle::Circle {
                LABEL_HEIGHT / 2.0
            } else {
                4.0
            };
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{background}" stroke="{color}" stroke-width="2"/>"#,
                num(cx - width / 2.0),
                num(cy - LABEL_HEIGHT / 2.0),
                num(width),
                num(LABEL_HEIGHT),
                num(radius)
            )?;
            writeln!(
                out,
                r#"<text x="{}" y="{}" fill="{color}" font-family="sans-serif" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                num(cx),
                num(cy),
                num(LABEL_FONT_SIZE),
                escape_xml(label)
            )?;
        }
        Ok(())
    }
}

/// Fill attribute value for `fill`, adding a gradient definition to `defs` when needed.
fn fill_ref(fill: &Fill, id: &str, area: PaintBox, defs: &mut String) -> Result<String> {
    let Some(gradient) = &fill.gradient else {
        return solid_hex(&fill.color);
    };

    match gradient.gradient_type {
        GradientType::Linear => {
            let ((x1, y1), (x2, y2)) = linear_endpoints(gradient.rotation, area);
            writeln!(
                defs,
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                num(x1),
                num(y1),
                num(x2),
                num(y2)
            )?;
        }
        GradientType::Radial => {
            writeln!(
                defs,
                r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">"#,
                num(area.x + area.side / 2.0),
                num(area.y + area.side / 2.0),
                num(radial_radius(area))
            )?;
        }
    }

    for stop in &gradient.color_stops {
        writeln!(
            defs,
            r#"<stop offset="{}" stop-color="{}"/>"#,
            num(stop.offset),
            solid_hex(&stop.color)?
        )?;
    }

    defs.push_str(match gradient.gradient_type {
        GradientType::Linear => "</linearGradient>\n",
        GradientType::Radial => "</radialGradient>\n",
    });

    Ok(format!("url(#{id})"))
}

fn solid_hex(color: &str) -> Result<String> {
    Ok(RgbColor::from_hex(color)
        .context(format!("Invalid color '{color}'"))?
        .to_hex())
}

/// Dark neighbours as `[left, top, right, bottom]`.
fn neighbours(symbol: &Symbol, x: usize, y: usize) -> [bool; 4] {
    let (x, y) = (x as isize, y as isize);
    [
        symbol.is_dark(x - 1, y),
        symbol.is_dark(x, y - 1),
        symbol.is_dark(x + 1, y),
        symbol.is_dark(x, y + 1),
    ]
}

/// Corner radii `[top-left, top-right, bottom-right, bottom-left]` for a module.
///
/// Connected shapes only round corners whose two adjacent sides are free.
fn corner_radii(dot_type: DotType, s: f64, [left, top, right, bottom]: [bool; 4]) -> [f64; 4] {
    let free = [!left && !top, !top && !right, !right && !bottom, !bottom && !left];
    let round = |corner: usize, r: f64| if free[corner] { r } else { 0.0 };

    match dot_type {
        DotType::Square => [0.0; 4],
        DotType::Dots => [s / 2.0; 4],
        DotType::Rounded => [0, 1, 2, 3].map(|c| round(c, s * 0.3)),
        DotType::ExtraRounded => [0, 1, 2, 3].map(|c| round(c, s / 2.0)),
        DotType::Classy => [round(0, s / 2.0), 0.0, round(2, s / 2.0), 0.0],
        DotType::ClassyRounded => [
            round(0, s / 2.0),
            round(1, s * 0.25),
            round(2, s / 2.0),
            round(3, s * 0.25),
        ],
    }
}

/// Appends a rectangle with per-corner radii `[tl, tr, br, bl]` as a closed subpath.
fn rect_path(out: &mut String, x: f64, y: f64, w: f64, h: f64, radii: [f64; 4]) {
    let [tl, tr, br, bl] = radii;
    let _ = write!(out, "M{} {}H{}", num(x + tl), num(y), num(x + w - tr));
    if tr > 0.0 {
        let _ = write!(out, "A{r} {r} 0 0 1 {} {}", num(x + w), num(y + tr), r = num(tr));
    }
    let _ = write!(out, "V{}", num(y + h - br));
    if br > 0.0 {
        let _ = write!(out, "A{r} {r} 0 0 1 {} {}", num(x + w - br), num(y + h), r = num(br));
    }
    let _ = write!(out, "H{}", num(x + bl));
    if bl > 0.0 {
        let _ = write!(out, "A{r} {r} 0 0 1 {} {}", num(x), num(y + h - bl), r = num(bl));
    }
    let _ = write!(out, "V{}", num(y + tl));
    if tl > 0.0 {
        let _ = write!(out, "A{r} {r} 0 0 1 {} {}", num(x + tl), num(y), r = num(tl));
    }
    out.push('Z');
}

/// Appends a circle as a closed subpath.
fn circle_path(out: &mut String, cx: f64, cy: f64, r: f64) {
    let _ = write!(
        out,
        "M{} {}a{r} {r} 0 1 0 {d} 0a{r} {r} 0 1 0 -{d} 0Z",
        num(cx - r),
        num(cy),
        r = num(r),
        d = num(2.0 * r)
    );
}

/// Outer 7x7 ring of a finder pattern; drawn with the even-odd rule.
fn finder_frame_path(out: &mut String, shape: CornerSquareType, x: f64, y: f64, s: f64) {
    let outer = FINDER_SIZE as f64 * s;
    let inner = outer - 2.0 * s;
    match shape {
        CornerSquareType::Square => {
            rect_path(out, x, y, outer, outer, [0.0; 4]);
            rect_path(out, x + s, y + s, inner, inner, [0.0; 4]);
        }
        CornerSquareType::ExtraRounded => {
            rect_path(out, x, y, outer, outer, [2.5 * s; 4]);
            rect_path(out, x + s, y + s, inner, inner, [1.5 * s; 4]);
        }
        CornerSquareType::Dot => {
            let (cx, cy) = (x + outer / 2.0, y + outer / 2.0);
            circle_path(out, cx, cy, outer / 2.0);
            circle_path(out, cx, cy, inner / 2.0);
        }
    }
}

/// Inner 3x3 block of a finder pattern.
fn finder_centre_path(out: &mut String, shape: CornerDotType, x: f64, y: f64, s: f64) {
    let side = 3.0 * s;
    match shape {
        CornerDotType::Square => rect_path(out, x, y, side, side, [0.0; 4]),
        CornerDotType::Dot => circle_path(out, x + side / 2.0, y + side / 2.0, side / 2.0),
        CornerDotType::None => {}
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract().abs() < f64::EPSILON {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_string()
    }
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
