#![forbid(unsafe_code)]

//! Color type and interpolation for outline rendering.

use serde::Serialize;

/// RGB color (opaque); alpha is carried separately by the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[inline]
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

/// Linear per-channel interpolation between two colors.
///
/// `t` is clamped to `[0, 1]`; every channel lands on an integer within
/// the closed interval spanned by the endpoints.
#[must_use]
pub fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    Rgb::new(
        lerp_u8(a.r, b.r, t),
        lerp_u8(a.g, b.g, t),
        lerp_u8(a.b, b.b, t),
    )
}
