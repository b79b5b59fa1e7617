use std::f32::consts::FRAC_PI_4;

use cgmath::{Matrix4, Point3, Rad, Vector3, Vector4, perspective};
use engine::graphics::{DrawList, Pass, Rgba, Vertex3d};
use engine::surface::SurfaceSize;

use crate::camera::CameraOrbit;
use crate::glyphs::{self, DIGIT_ADVANCE};
use crate::grid::{GridDims, Vec3i};
use crate::snake::Snake;

pub const BACKGROUND: Rgba = [0.05, 0.10, 0.15, 1.0];
pub const FOOD_COLOR: [f32; 3] = [0.8, 0.1, 0.1];
pub const SNAKE_COLOR: [f32; 3] = [0.9, 1.0, 0.0];
pub const BORDER_COLOR: Rgba = [0.8, 0.2, 0.2, 0.4];
const HEADING_ALPHA: f32 = 0.1;

const AXIS_X_COLOR: Rgba = [1.0, 0.0, 0.0, 1.0];
const AXIS_Y_COLOR: Rgba = [0.0, 0.0, 1.0, 1.0];
const AXIS_Z_COLOR: Rgba = [0.0, 1.0, 0.0, 1.0];

pub const CUBE_SIZE: f32 = 0.8;
const CUBE_HALF: f32 = CUBE_SIZE * 0.5;

const FOV_Y: f32 = FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

const TEXT_EYE: [f32; 3] = [0.0, -10.0, 40.0];
const TITLE: &str = "SNAKE3D";
const TITLE_OFFSET: [f32; 2] = [0.0, 0.8];
const TITLE_ORIGIN: [f32; 2] = [-12.5, -2.0];
const LENGTH_OFFSET: [f32; 2] = [-0.9, -0.9];
const BEST_OFFSET: [f32; 2] = [0.8, -0.9];

// Brightness per cube face, as (top, bottom, front, back, right, left).
const FACE_SHADE: [f32; 6] = [0.9, 0.4, 0.85, 0.45, 0.8, 0.5];

fn shade(c: [f32; 3], k: f32) -> Rgba {
    [c[0] * k, c[1] * k, c[2] * k, 1.0]
}

fn to_clip(m: &Matrix4<f32>, p: [f32; 3]) -> [f32; 4] {
    let v = m * Vector4::new(p[0], p[1], p[2], 1.0);
    [v.x, v.y, v.z, v.w]
}

/// An axis-aligned cube of edge [`CUBE_SIZE`] centred on `center`, six shaded faces.
pub fn push_cube(pass: &mut Pass, mvp: &Matrix4<f32>, center: [f32; 3], color: [f32; 3]) {
    let [cx, cy, cz] = center;
    let h = CUBE_HALF;
    let corner = |dx: f32, dy: f32, dz: f32| to_clip(mvp, [cx + dx * h, cy + dy * h, cz + dz * h]);

    let t0 = corner(-1.0, 1.0, -1.0);
    let t1 = corner(1.0, 1.0, -1.0);
    let t2 = corner(1.0, 1.0, 1.0);
    let t3 = corner(-1.0, 1.0, 1.0);
    let b0 = corner(-1.0, -1.0, -1.0);
    let b1 = corner(1.0, -1.0, -1.0);
    let b2 = corner(1.0, -1.0, 1.0);
    let b3 = corner(-1.0, -1.0, 1.0);

    let faces = [
        [t0, t1, t2, t3],
        [b2, b1, b0, b3],
        [t3, t2, b2, b3],
        [b1, t1, t0, b0],
        [t2, t1, b1, b2],
        [b0, t0, t3, b3],
    ];
    for (quad, k) in faces.iter().zip(FACE_SHADE) {
        let c = shade(color, k);
        let v = |p: [f32; 4]| Vertex3d::new(p, c);
        pass.push_triangle(v(quad[0]), v(quad[1]), v(quad[2]));
        pass.push_triangle(v(quad[2]), v(quad[3]), v(quad[0]));
    }
}

fn push_line(pass: &mut Pass, mvp: &Matrix4<f32>, a: [f32; 3], b: [f32; 3], color: Rgba) {
    pass.push_line(
        Vertex3d::new(to_clip(mvp, a), color),
        Vertex3d::new(to_clip(mvp, b), color),
    );
}

/// Per-frame transforms: one projection shared by the world and the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    world_vp: Matrix4<f32>,
    model: Matrix4<f32>,
    text_vp: Matrix4<f32>,
    dims: GridDims,
}

impl RenderFrame {
    pub fn new(size: SurfaceSize, camera: &CameraOrbit, dims: GridDims) -> Self {
        let projection = perspective(Rad(FOV_Y), size.aspect_ratio(), Z_NEAR, Z_FAR);
        let world_vp = projection * camera.view_matrix();
        let model = Matrix4::from_translation(Vector3::new(
            dims.width as f32 * -0.5,
            dims.height as f32 * -0.5,
            dims.depth as f32 * -0.5,
        ));
        let text_view = Matrix4::look_at_rh(
            Point3::new(TEXT_EYE[0], TEXT_EYE[1], TEXT_EYE[2]),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        Self {
            world_vp,
            model,
            text_vp: projection * text_view,
            dims,
        }
    }

    /// World transform for grid-space coordinates.
    pub fn world_mvp(&self) -> Matrix4<f32> {
        self.world_vp * self.model
    }

    /// HUD transform, shifted by `offset` in normalized device coordinates.
    pub fn text_mvp(&self, offset: [f32; 2]) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(offset[0], offset[1], 0.0)) * self.text_vp
    }

    pub fn build(&self, snake: &Snake, food: Vec3i, show_axes: bool, list: &mut DrawList) {
        list.reset(BACKGROUND);
        let mvp = self.world_mvp();

        push_cube(&mut list.world, &mvp, cell_center(food), FOOD_COLOR);
        for segment in snake.segments() {
            push_cube(&mut list.world, &mvp, cell_center(segment), SNAKE_COLOR);
        }

        self.push_border(&mut list.world, &mvp);
        self.push_heading_lines(&mut list.world, &mvp, snake.head());
        if show_axes {
            self.push_axes(&mut list.world);
        }

        self.push_hud(&mut list.overlay, snake.length(), snake.best_length());
    }

    fn push_border(&self, pass: &mut Pass, mvp: &Matrix4<f32>) {
        let (w, h, d) = (
            self.dims.width as f32,
            self.dims.height as f32,
            self.dims.depth as f32,
        );
        for y in [0.0, h] {
            let ring = [[0.0, y, 0.0], [w, y, 0.0], [w, y, d], [0.0, y, d]];
            for i in 0..4 {
                push_line(pass, mvp, ring[i], ring[(i + 1) % 4], BORDER_COLOR);
            }
        }
    }

    /// Four lines along each axis through the head cube's edges, spanning the whole grid.
    fn push_heading_lines(&self, pass: &mut Pass, mvp: &Matrix4<f32>, head: Vec3i) {
        let color = [SNAKE_COLOR[0], SNAKE_COLOR[1], SNAKE_COLOR[2], HEADING_ALPHA];
        let [hx, hy, hz] = cell_center(head);
        let (w, h, d) = (
            self.dims.width as f32,
            self.dims.height as f32,
            self.dims.depth as f32,
        );
        let e = CUBE_HALF;

        for (a, b) in [(-e, -e), (-e, e), (e, -e), (e, e)] {
            push_line(pass, mvp, [0.0, hy + a, hz + b], [w, hy + a, hz + b], color);
            push_line(pass, mvp, [hx + a, 0.0, hz + b], [hx + a, h, hz + b], color);
            push_line(pass, mvp, [hx + a, hy + b, 0.0], [hx + a, hy + b, d], color);
        }
    }

    fn push_axes(&self, pass: &mut Pass) {
        let o = [0.0, 0.0, 0.0];
        push_line(pass, &self.world_vp, o, [1.0, 0.0, 0.0], AXIS_X_COLOR);
        push_line(pass, &self.world_vp, o, [0.0, 1.0, 0.0], AXIS_Y_COLOR);
        push_line(pass, &self.world_vp, o, [0.0, 0.0, 1.0], AXIS_Z_COLOR);
    }

    fn push_hud(&self, pass: &mut Pass, length: usize, best_length: usize) {
        let title_mvp = self.text_mvp(TITLE_OFFSET);
        for (x, glyph) in glyphs::layout_text(TITLE) {
            push_glyph(pass, &title_mvp, &glyph, [x as f32 + TITLE_ORIGIN[0], TITLE_ORIGIN[1]]);
        }

        let length_mvp = self.text_mvp(LENGTH_OFFSET);
        for (i, d) in glyphs::decimal_digits(length).into_iter().enumerate() {
            if let Some(glyph) = glyphs::digit(d) {
                push_glyph(pass, &length_mvp, &glyph, [(i as i32 * DIGIT_ADVANCE) as f32, 0.0]);
            }
        }

        // Right-aligned: the last digit starts at x = 0.
        let best_mvp = self.text_mvp(BEST_OFFSET);
        let best = glyphs::decimal_digits(best_length);
        let n = best.len() as i32;
        for (i, d) in best.into_iter().enumerate() {
            if let Some(glyph) = glyphs::digit(d) {
                let x = (i as i32 - n + 1) * DIGIT_ADVANCE;
                push_glyph(pass, &best_mvp, &glyph, [x as f32, 0.0]);
            }
        }
    }
}

fn push_glyph(pass: &mut Pass, mvp: &Matrix4<f32>, glyph: &glyphs::Glyph, origin: [f32; 2]) {
    for (col, row) in glyph.cells() {
        let center = [origin[0] + col as f32, origin[1] + row as f32, 0.0];
        push_cube(pass, mvp, center, SNAKE_COLOR);
    }
}

/// Cubes sit at `cell + 0.4`, so a cell's cube spans `cell..cell + 0.8`.
pub fn cell_center(cell: Vec3i) -> [f32; 3] {
    let [x, y, z] = cell.to_f32();
    [x + CUBE_HALF, y + CUBE_HALF, z + CUBE_HALF]
}
