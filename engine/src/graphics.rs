use std::ops::Range;

use pixels::{PixelsContext, wgpu};

use crate::surface::SurfaceSize;

/// Linear RGBA, each channel in `0.0..=1.0`.
pub type Rgba = [f32; 4];

pub const DEFAULT_CLEAR_COLOR: Rgba = [0.0, 0.0, 0.0, 1.0];

// Vertices with `w` at or below this are behind (or on) the eye plane and get dropped.
const CLIP_EPSILON: f32 = 1e-5;

/// A vertex already transformed to clip space.
///
/// Depth follows the OpenGL convention: the visible range is `-w..=w`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 4],
    pub color: Rgba,
}

impl Vertex3d {
    pub const fn new(position: [f32; 4], color: Rgba) -> Self {
        Self { position, color }
    }
}

/// Triangles and lines drawn against one depth buffer.
#[derive(Debug, Default, Clone)]
pub struct Pass {
    triangles: Vec<Vertex3d>,
    lines: Vec<Vertex3d>,
}

impl Pass {
    pub fn push_triangle(&mut self, a: Vertex3d, b: Vertex3d, c: Vertex3d) {
        self.triangles.extend_from_slice(&[a, b, c]);
    }

    pub fn push_line(&mut self, a: Vertex3d, b: Vertex3d) {
        self.lines.extend_from_slice(&[a, b]);
    }

    /// Flat list, three vertices per triangle.
    pub fn triangles(&self) -> &[Vertex3d] {
        &self.triangles
    }

    /// Flat list, two vertices per line.
    pub fn lines(&self) -> &[Vertex3d] {
        &self.lines
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn line_count(&self) -> usize {
        self.lines.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }
}

/// Everything needed to draw one frame.
///
/// The world pass is drawn over the clear colour; the overlay pass is drawn afterwards with the
/// depth buffer cleared, so it always sits on top of the world.
#[derive(Debug, Clone)]
pub struct DrawList {
    pub clear_color: Rgba,
    pub world: Pass,
    pub overlay: Pass,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new(DEFAULT_CLEAR_COLOR)
    }
}

impl DrawList {
    pub fn new(clear_color: Rgba) -> Self {
        Self {
            clear_color,
            world: Pass::default(),
            overlay: Pass::default(),
        }
    }

    /// Empties both passes but keeps their allocations.
    pub fn reset(&mut self, clear_color: Rgba) {
        self.clear_color = clear_color;
        self.world.clear();
        self.overlay.clear();
    }
}

/// Backend-agnostic 3D drawing interface.
///
/// Game code builds a [`DrawList`] and hands it over; it must not care whether pixels are produced
/// by the CPU rasterizer or the GPU.
pub trait Renderer3d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;
    fn submit(&mut self, list: &DrawList);
}

#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    color: Rgba,
}

fn to_screen(v: &Vertex3d, size: SurfaceSize) -> Option<ScreenVertex> {
    let [x, y, z, w] = v.position;
    if w <= CLIP_EPSILON {
        return None;
    }
    let inv_w = 1.0 / w;
    Some(ScreenVertex {
        x: (x * inv_w + 1.0) * 0.5 * size.width as f32,
        y: (1.0 - y * inv_w) * 0.5 * size.height as f32,
        z: z * inv_w,
        color: v.color,
    })
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

pub fn rgba_to_u8(c: Rgba) -> [u8; 4] {
    [
        channel_to_u8(c[0]),
        channel_to_u8(c[1]),
        channel_to_u8(c[2]),
        channel_to_u8(c[3]),
    ]
}

/// CPU rasterizer writing into an RGBA frame with a float depth buffer.
///
/// Triangles use edge functions over their bounding box and write depth; lines use Bresenham,
/// are depth tested but never write depth. Both blend by source alpha. No face culling.
pub struct CpuRenderer<'a> {
    color: &'a mut [u8],
    depth: &'a mut [f32],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(color: &'a mut [u8], depth: &'a mut [f32], size: SurfaceSize) -> Self {
        Self { color, depth, size }
    }

    fn buffers_fit(&self) -> bool {
        !self.size.is_empty()
            && self.color.len() >= self.size.rgba_len()
            && self.depth.len() >= self.size.pixel_count()
    }

    fn clear_color(&mut self, color: Rgba) {
        let px = rgba_to_u8([color[0], color[1], color[2], 1.0]);
        for chunk in self.color[..self.size.rgba_len()].chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    fn clear_depth(&mut self) {
        self.depth[..self.size.pixel_count()].fill(f32::INFINITY);
    }

    fn blend_pixel(&mut self, idx: usize, src: Rgba) {
        let a = src[3].clamp(0.0, 1.0);
        let inv = 1.0 - a;
        let px = &mut self.color[idx * 4..idx * 4 + 4];
        for ch in 0..3 {
            let dst = px[ch] as f32 / 255.0;
            px[ch] = channel_to_u8(src[ch] * a + dst * inv);
        }
        px[3] = 255;
    }

    fn draw_pass(&mut self, pass: &Pass) {
        for tri in pass.triangles().chunks_exact(3) {
            self.fill_triangle(&tri[0], &tri[1], &tri[2]);
        }
        for line in pass.lines().chunks_exact(2) {
            self.draw_line(&line[0], &line[1]);
        }
    }

    fn fill_triangle(&mut self, v0: &Vertex3d, v1: &Vertex3d, v2: &Vertex3d) {
        let (Some(a), Some(b), Some(c)) = (
            to_screen(v0, self.size),
            to_screen(v1, self.size),
            to_screen(v2, self.size),
        ) else {
            return;
        };

        let area = edge(&a, &b, c.x, c.y);
        if !area.is_finite() || area.abs() < f32::EPSILON {
            return;
        }

        let max_px_x = self.size.width as f32 - 1.0;
        let max_px_y = self.size.height as f32 - 1.0;
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
        let max_x = a.x.max(b.x).max(c.x).ceil().min(max_px_x);
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0);
        let max_y = a.y.max(b.y).max(c.y).ceil().min(max_px_y);
        if !(min_x <= max_x && min_y <= max_y) {
            return;
        }

        let width = self.size.width as usize;
        for y in min_y as u32..=max_y as u32 {
            let py = y as f32 + 0.5;
            for x in min_x as u32..=max_x as u32 {
                let px = x as f32 + 0.5;

                // Dividing by the signed area makes inside-weights positive for either winding.
                let w0 = edge(&b, &c, px, py) / area;
                let w1 = edge(&c, &a, px, py) / area;
                let w2 = edge(&a, &b, px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = a.z * w0 + b.z * w1 + c.z * w2;
                if !(-1.0..=1.0).contains(&z) {
                    continue;
                }

                let idx = y as usize * width + x as usize;
                if z >= self.depth[idx] {
                    continue;
                }
                self.depth[idx] = z;

                let mut color = [0.0f32; 4];
                for (ch, out) in color.iter_mut().enumerate() {
                    *out = a.color[ch] * w0 + b.color[ch] * w1 + c.color[ch] * w2;
                }
                self.blend_pixel(idx, color);
            }
        }
    }

    fn draw_line(&mut self, v0: &Vertex3d, v1: &Vertex3d) {
        let (Some(a), Some(b)) = (to_screen(v0, self.size), to_screen(v1, self.size)) else {
            return;
        };
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            return;
        }

        let (mut x0, mut y0) = (a.x.floor() as i64, a.y.floor() as i64);
        let (x1, y1) = (b.x.floor() as i64, b.y.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0f32;
        let width = self.size.width as i64;
        let height = self.size.height as i64;

        loop {
            if x0 >= 0 && x0 < width && y0 >= 0 && y0 < height {
                let t = (step / steps).min(1.0);
                let z = a.z + (b.z - a.z) * t;
                let idx = (y0 * width + x0) as usize;
                if (-1.0..=1.0).contains(&z) && z <= self.depth[idx] {
                    self.blend_pixel(idx, lerp_color(a.color, b.color, t));
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1.0;
        }
    }
}

impl Renderer3d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn submit(&mut self, list: &DrawList) {
        if !self.buffers_fit() {
            return;
        }
        self.clear_color(list.clear_color);
        self.clear_depth();
        self.draw_pass(&list.world);
        self.clear_depth();
        self.draw_pass(&list.overlay);
    }
}

const SHADER: &str = r#"
struct VsIn {
  @location(0) position: vec4<f32>,
  @location(1) color: vec4<f32>,
};

struct VsOut {
  @builtin(position) position: vec4<f32>,
  @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(input: VsIn) -> VsOut {
  let p = input.position;

  var out: VsOut;
  // Clip depth -w..w remapped to 0..w.
  out.position = vec4<f32>(p.x, p.y, (p.z + p.w) * 0.5, p.w);
  out.color = input.color;
  return out;
}

@fragment
fn fs_main(input: VsOut) -> @location(0) vec4<f32> {
  return input.color;
}
"#;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;

struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: SurfaceSize,
}

#[derive(Debug, Default, Clone)]
struct PassRanges {
    triangles: Range<u32>,
    lines: Range<u32>,
}

/// GPU renderer that uploads a [`DrawList`] and draws it via `pixels.render_with(...)`.
pub struct GpuRenderer3d {
    size: SurfaceSize,
    clear_color: Rgba,

    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    depth: Option<DepthTarget>,

    vertex_buf: wgpu::Buffer,
    vertex_capacity: usize,
    vertices: Vec<Vertex3d>,
    world: PassRanges,
    overlay: PassRanges,
}

impl GpuRenderer3d {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gfx3d_shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gfx3d_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let triangle_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            true,
            wgpu::CompareFunction::Less,
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::LineList,
            false,
            wgpu::CompareFunction::LessEqual,
        );

        let vertex_buf = create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY);

        Self {
            size: SurfaceSize::new(1, 1),
            clear_color: DEFAULT_CLEAR_COLOR,
            triangle_pipeline,
            line_pipeline,
            depth: None,
            vertex_buf,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertices: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
            world: PassRanges::default(),
            overlay: PassRanges::default(),
        }
    }

    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        render_target: &wgpu::TextureView,
        ctx: &PixelsContext,
    ) {
        let size = SurfaceSize::new(self.size.width.max(1), self.size.height.max(1));
        self.ensure_depth_target(&ctx.device, size);
        self.ensure_vertex_capacity(&ctx.device, self.vertices.len());

        if !self.vertices.is_empty() {
            ctx.queue
                .write_buffer(&self.vertex_buf, 0, bytemuck::cast_slice(&self.vertices));
        }

        let Some(depth) = self.depth.as_ref() else {
            return;
        };

        let [r, g, b, _] = self.clear_color;
        let clear = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gfx3d_world_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: render_target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(depth_attachment(&depth.view)),
            });
            self.draw_ranges(&mut pass, &self.world);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gfx3d_overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: render_target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(depth_attachment(&depth.view)),
            });
            self.draw_ranges(&mut pass, &self.overlay);
        }
    }

    fn draw_ranges<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>, ranges: &PassRanges) {
        pass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        if !ranges.triangles.is_empty() {
            pass.set_pipeline(&self.triangle_pipeline);
            pass.draw(ranges.triangles.clone(), 0..1);
        }
        if !ranges.lines.is_empty() {
            pass.set_pipeline(&self.line_pipeline);
            pass.draw(ranges.lines.clone(), 0..1);
        }
    }

    fn ensure_depth_target(&mut self, device: &wgpu::Device, size: SurfaceSize) {
        if self.depth.as_ref().is_some_and(|d| d.size == size) {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gfx3d_depth"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some(DepthTarget {
            _texture: texture,
            view,
            size,
        });
    }

    fn ensure_vertex_capacity(&mut self, device: &wgpu::Device, needed: usize) {
        if needed <= self.vertex_capacity {
            return;
        }

        let mut cap = self.vertex_capacity.max(1);
        while cap < needed {
            cap = cap.saturating_mul(2);
        }

        self.vertex_buf = create_vertex_buffer(device, cap);
        self.vertex_capacity = cap;
    }

    fn append(&mut self, vertices: &[Vertex3d]) -> Range<u32> {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        start..self.vertices.len() as u32
    }
}

fn depth_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: true,
        }),
        stencil_ops: None,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("gfx3d_vertices"),
        size: (capacity * std::mem::size_of::<Vertex3d>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("gfx3d_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex3d>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x4, // position
                    1 => Float32x4  // color
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

impl Renderer3d for GpuRenderer3d {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
        self.vertices.clear();
        self.world = PassRanges::default();
        self.overlay = PassRanges::default();
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn submit(&mut self, list: &DrawList) {
        self.clear_color = list.clear_color;
        self.world = PassRanges {
            triangles: self.append(list.world.triangles()),
            lines: self.append(list.world.lines()),
        };
        self.overlay = PassRanges {
            triangles: self.append(list.overlay.triangles()),
            lines: self.append(list.overlay.lines()),
        };
    }
}
