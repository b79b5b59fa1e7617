use crate::graphics::{CpuRenderer, DrawList, GpuRenderer3d, Renderer3d};
use crate::surface::SurfaceSize;

use pixels::Pixels;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    Cpu,
    #[default]
    Gpu,
}

impl RenderBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cpu" | "software" => Some(Self::Cpu),
            "gpu" | "wgpu" => Some(Self::Gpu),
            _ => None,
        }
    }
}

pub fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .and_then(|v| match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Windowed renderer built on `pixels`, with a CPU or GPU 3D backend.
///
/// In GPU mode the pixel buffer is kept at 1x1 and the frame is drawn straight into the surface
/// texture; in CPU mode the rasterizer writes the pixel buffer, which `pixels` then scales up.
pub struct PixelsRenderer3d {
    pixels: Pixels,
    size: SurfaceSize,
    backend: RenderBackend,
    gpu: Option<GpuRenderer3d>,
    depth: Vec<f32>,
}

impl PixelsRenderer3d {
    pub fn new(
        mut pixels: Pixels,
        size: SurfaceSize,
        backend: RenderBackend,
    ) -> Result<Self, pixels::Error> {
        let gpu = match backend {
            RenderBackend::Cpu => {
                pixels.resize_buffer(size.width.max(1), size.height.max(1))?;
                None
            }
            RenderBackend::Gpu => {
                pixels.resize_buffer(1, 1)?;
                Some(GpuRenderer3d::new(
                    &pixels.context().device,
                    pixels.surface_texture_format(),
                ))
            }
        };
        log::info!("renderer backend: {backend:?}");

        Ok(Self {
            pixels,
            size,
            backend,
            gpu,
            depth: vec![f32::INFINITY; size.pixel_count()],
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn backend(&self) -> RenderBackend {
        self.backend
    }

    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), pixels::Error> {
        if size.is_empty() {
            self.size = size;
            return Ok(());
        }

        self.size = size;
        self.pixels.resize_surface(size.width, size.height)?;

        match self.backend {
            RenderBackend::Cpu => {
                self.pixels.resize_buffer(size.width, size.height)?;
                self.depth.resize(size.pixel_count(), f32::INFINITY);
            }
            RenderBackend::Gpu => {
                // Keep the buffer tiny to avoid full-frame uploads.
                self.pixels.resize_buffer(1, 1)?;
            }
        }

        Ok(())
    }

    pub fn draw(&mut self, list: &DrawList) {
        if self.size.is_empty() {
            return;
        }
        match (self.backend, self.gpu.as_mut()) {
            (RenderBackend::Gpu, Some(gpu)) => {
                gpu.begin_frame(self.size);
                gpu.submit(list);
            }
            _ => {
                let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), &mut self.depth, self.size);
                cpu.begin_frame(self.size);
                cpu.submit(list);
            }
        }
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        let Some(mut gpu) = self.gpu.take() else {
            return self.pixels.render();
        };
        let res = self.pixels.render_with(|encoder, render_target, ctx| {
            gpu.render(encoder, render_target, ctx);
            Ok(())
        });
        self.gpu = Some(gpu);
        res
    }
}
