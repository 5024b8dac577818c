//! RGBA8 render color.

/// An 8-bit-per-channel RGBA color passed to draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const DARKGRAY: Self = Self::rgb(80, 80, 80);
    pub const DARKGREEN: Self = Self::rgb(0, 117, 44);
    pub const GOLD: Self = Self::rgb(255, 203, 0);
    pub const RED: Self = Self::rgb(230, 41, 55);
    pub const GREEN: Self = Self::rgb(0, 228, 48);
    pub const BLUE: Self = Self::rgb(0, 121, 241);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Builds an opaque color from hue (degrees), saturation and value in `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let channel = |offset: f32| -> u8 {
            let k = (offset + hue / 60.0).rem_euclid(6.0);
            let k = k.min(4.0 - k).clamp(0.0, 1.0);
            ((value - value * saturation * k) * 255.0).round() as u8
        };
        Self::rgb(channel(5.0), channel(3.0), channel(1.0))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
