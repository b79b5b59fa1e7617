use cgmath::Vector4;
use engine::graphics::{CpuRenderer, DrawList, Renderer3d, rgba_to_u8};
use engine::surface::{OffscreenSurface, Surface, SurfaceSize};
use snake3d::camera::CameraOrbit;
use snake3d::field::Field;
use snake3d::glyphs;
use snake3d::grid::{GridDims, Vec3i};
use snake3d::rng::RandomSource;
use snake3d::scene::{BACKGROUND, RenderFrame, cell_center};
use snake3d::snake::Snake;

const TRIANGLES_PER_CUBE: usize = 12;

struct FixedRng(Vec<u32>, usize);

impl RandomSource for FixedRng {
    fn next_u32(&mut self) -> u32 {
        let v = self.0[self.1 % self.0.len()];
        self.1 += 1;
        v
    }
}

fn glyph_cells(text: &str) -> usize {
    glyphs::layout_text(text)
        .iter()
        .map(|(_, g)| g.cells().count())
        .sum()
}

fn build(snake: &Snake, food: Vec3i, show_axes: bool, size: SurfaceSize) -> DrawList {
    let frame = RenderFrame::new(size, &CameraOrbit::default(), GridDims::STANDARD);
    let mut list = DrawList::default();
    frame.build(snake, food, show_axes, &mut list);
    list
}

#[test]
fn world_pass_has_food_and_every_segment() {
    let dims = GridDims::STANDARD;
    let mut snake = Snake::new(dims);
    let mut field = Field::new(dims, FixedRng(vec![1, 2, 0, 7, 7, 7], 0));
    snake.update(&mut field);
    assert_eq!(snake.length(), 2);

    let list = build(&snake, field.food(), false, SurfaceSize::new(940, 520));
    assert_eq!(list.clear_color, BACKGROUND);
    assert_eq!(list.world.triangle_count(), TRIANGLES_PER_CUBE * 3);
    // Border rectangles plus four heading lines per axis.
    assert_eq!(list.world.line_count(), 8 + 12);
}

#[test]
fn debug_axes_add_three_lines() {
    let snake = Snake::new(GridDims::STANDARD);
    let list = build(&snake, Vec3i::new(5, 5, 5), true, SurfaceSize::new(940, 520));
    assert_eq!(list.world.line_count(), 8 + 12 + 3);
}

#[test]
fn hud_draws_title_and_both_counters() {
    let snake = Snake::new(GridDims::STANDARD);
    let list = build(&snake, Vec3i::new(5, 5, 5), false, SurfaceSize::new(940, 520));

    let cells = glyph_cells("SNAKE3D") + 2 * glyph_cells("1");
    assert_eq!(list.overlay.triangle_count(), TRIANGLES_PER_CUBE * cells);
    assert_eq!(list.overlay.line_count(), 0);
}

#[test]
fn software_render_shows_food_over_background() {
    let dims = GridDims::STANDARD;
    let size = SurfaceSize::new(320, 240);
    let food = Vec3i::new(6, 6, 6);
    let snake = Snake::new(dims);
    let list = build(&snake, food, false, size);

    let mut surface = OffscreenSurface::new(size);
    let (color, depth) = surface.buffers_mut();
    let mut gfx = CpuRenderer::new(color, depth, size);
    gfx.begin_frame(size);
    gfx.submit(&list);

    assert_eq!(surface.pixel(0, 0), Some(rgba_to_u8(BACKGROUND)));

    let frame = RenderFrame::new(size, &CameraOrbit::default(), dims);
    let [x, y, z] = cell_center(food);
    let clip = frame.world_mvp() * Vector4::new(x, y, z, 1.0);
    let sx = ((clip.x / clip.w + 1.0) * 0.5 * size.width as f32) as u32;
    let sy = ((1.0 - clip.y / clip.w) * 0.5 * size.height as f32) as u32;

    let px = surface.pixel(sx, sy).expect("food projects inside the surface");
    assert!(px[0] > px[1] + 20 && px[0] > px[2] + 20, "expected a red pixel, got {px:?}");
}
