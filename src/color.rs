use bytemuck::{Pod, Zeroable};

/// Packed 32-bit pixel value, `0xAARRGGBB`.
///
/// On little-endian targets the in-memory byte order is B, G, R, A, which is
/// exactly what the backend's BGRA upload texture expects, so a `&[Color]`
/// buffer can be bulk-copied to the GPU without conversion.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Color {
    dword: u32,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const AZURE: Color = Color::new(0, 127, 255);

    /// Create an opaque color from 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::with_alpha(r, g, b, 0xFF)
    }

    /// Create a color from 8-bit channels including alpha.
    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            dword: ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32),
        }
    }

    /// Reinterpret a raw packed value. Any `u32` is a valid color.
    pub const fn from_packed(dword: u32) -> Self {
        Self { dword }
    }

    pub const fn packed(self) -> u32 {
        self.dword
    }

    pub const fn r(self) -> u8 {
        ((self.dword >> 16) & 0xFF) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.dword >> 8) & 0xFF) as u8
    }

    pub const fn b(self) -> u8 {
        (self.dword & 0xFF) as u8
    }

    pub const fn a(self) -> u8 {
        ((self.dword >> 24) & 0xFF) as u8
    }
}

impl From<u32> for Color {
    fn from(dword: u32) -> Self {
        Self::from_packed(dword)
    }
}
