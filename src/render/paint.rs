//! Gradient geometry for the SVG painter.

/// Square region a gradient spans, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Side length
    pub side: f64,
}

impl PaintBox {
    /// Centre point.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.side / 2.0, self.y + self.side / 2.0)
    }
}

/// Start and end points of a linear gradient rotated by `rotation` degrees.
///
/// The line passes through the box centre and is long enough for the
/// gradient to reach every corner.
pub fn linear_endpoints(rotation: f64, area: PaintBox) -> ((f64, f64), (f64, f64)) {
    let (sin, cos) = rotation.to_radians().sin_cos();
    let half = area.side / 2.0 * (cos.abs() + sin.abs());
    let (cx, cy) = area.center();
    (
        (cx - cos * half, cy - sin * half),
        (cx + cos * half, cy + sin * half),
    )
}

/// Radius of a radial gradient over `area`.
pub fn radial_radius(area: PaintBox) -> f64 {
    area.side / 2.0
}
