use std::convert::Infallible;

use winit::dpi::PhysicalSize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Minimised windows report a zero dimension; nothing should be drawn then.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn rgba_len(self) -> usize {
        self.pixel_count().saturating_mul(4)
    }

    /// Width over height, or 1.0 for an empty surface.
    pub fn aspect_ratio(self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl From<PhysicalSize<u32>> for SurfaceSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// A resizable RGBA surface with a matching depth buffer.
///
/// Rendering writes through `buffers_mut()`; presentation shows the colour half somewhere (a
/// window, or nowhere at all for headless runs).
pub trait Surface {
    type Error;

    fn size(&self) -> SurfaceSize;
    fn buffers_mut(&mut self) -> (&mut [u8], &mut [f32]);

    fn resize(&mut self, size: SurfaceSize) -> Result<(), Self::Error>;
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// In-memory colour + depth target for headless rendering and tests.
#[derive(Debug, Clone)]
pub struct OffscreenSurface {
    size: SurfaceSize,
    color: Vec<u8>,
    depth: Vec<f32>,
}

impl OffscreenSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            color: vec![0u8; size.rgba_len()],
            depth: vec![f32::INFINITY; size.pixel_count()],
        }
    }

    pub fn frame(&self) -> &[u8] {
        &self.color
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = self.color.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl Surface for OffscreenSurface {
    type Error = Infallible;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn buffers_mut(&mut self) -> (&mut [u8], &mut [f32]) {
        (&mut self.color, &mut self.depth)
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), Self::Error> {
        self.size = size;
        self.color.resize(size.rgba_len(), 0u8);
        self.depth.resize(size.pixel_count(), f32::INFINITY);
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
