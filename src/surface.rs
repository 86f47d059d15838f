use crate::color::Color;
use crate::error::SurfaceError;

/// CPU-side framebuffer: a contiguous row-major buffer of packed pixels.
///
/// Dimensions are fixed at construction. The buffer length is always exactly
/// `width * height` and rows carry no padding, so `raw_bytes()` together with
/// `row_pitch()` describe the whole buffer for a single bulk GPU upload.
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Surface {
    /// Allocate a framebuffer initialized to opaque black.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimension { width, height });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
        })
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Write one pixel. Out-of-range coordinates are rejected in every build
    /// profile; the buffer is never clamped or silently ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<(), SurfaceError> {
        let idx = self.index(x, y)?;
        self.pixels[idx] = color;
        Ok(())
    }

    /// Read one pixel, with the same bounds policy as `put_pixel`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Color, SurfaceError> {
        let idx = self.index(x, y)?;
        Ok(self.pixels[idx])
    }

    /// Read-only view of the whole buffer for GPU upload.
    ///
    /// The view is valid only as long as the surface; it must not outlive an
    /// `end_frame` call that reads it.
    pub fn raw_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Byte stride of one row: `width * size_of::<Color>()`, no padding.
    pub fn row_pitch(&self) -> u32 {
        self.width * std::mem::size_of::<Color>() as u32
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, SurfaceError> {
        if x >= self.width || y >= self.height {
            return Err(SurfaceError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }
}
