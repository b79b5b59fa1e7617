use engine::graphics::{CpuRenderer, DrawList, Pass, Renderer3d, Rgba, Vertex3d};
use engine::surface::{OffscreenSurface, Surface, SurfaceSize};

const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
const GREEN: Rgba = [0.0, 1.0, 0.0, 1.0];
const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];
const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

fn v(x: f32, y: f32, z: f32, color: Rgba) -> Vertex3d {
    Vertex3d::new([x, y, z, 1.0], color)
}

fn fullscreen_quad(pass: &mut Pass, z: f32, color: Rgba) {
    pass.push_triangle(v(-1.0, -1.0, z, color), v(1.0, -1.0, z, color), v(1.0, 1.0, z, color));
    // Opposite winding on purpose: nothing is culled.
    pass.push_triangle(v(-1.0, -1.0, z, color), v(-1.0, 1.0, z, color), v(1.0, 1.0, z, color));
}

fn render(size: SurfaceSize, list: &DrawList) -> OffscreenSurface {
    let mut surface = OffscreenSurface::new(size);
    let (color, depth) = surface.buffers_mut();
    let mut gfx = CpuRenderer::new(color, depth, size);
    gfx.begin_frame(size);
    gfx.submit(list);
    surface
}

#[test]
fn clear_color_fills_every_pixel() {
    let list = DrawList::new([0.05, 0.10, 0.15, 1.0]);
    let surface = render(SurfaceSize::new(4, 3), &list);
    for px in surface.frame().chunks_exact(4) {
        assert_eq!(px, &[13, 26, 38, 255]);
    }
}

#[test]
fn fullscreen_quad_covers_all_pixels_regardless_of_winding() {
    let mut list = DrawList::new(BLACK);
    fullscreen_quad(&mut list.world, 0.0, RED);
    let surface = render(SurfaceSize::new(8, 8), &list);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(surface.pixel(x, y), Some([255, 0, 0, 255]), "pixel {x},{y}");
        }
    }
}

#[test]
fn nearer_triangle_wins_in_either_draw_order() {
    for near_first in [false, true] {
        let mut list = DrawList::new(BLACK);
        if near_first {
            fullscreen_quad(&mut list.world, -0.5, GREEN);
            fullscreen_quad(&mut list.world, 0.5, RED);
        } else {
            fullscreen_quad(&mut list.world, 0.5, RED);
            fullscreen_quad(&mut list.world, -0.5, GREEN);
        }
        let surface = render(SurfaceSize::new(8, 8), &list);
        assert_eq!(surface.pixel(4, 4), Some([0, 255, 0, 255]));
    }
}

#[test]
fn overlay_draws_on_top_of_nearer_world_geometry() {
    let mut list = DrawList::new(BLACK);
    fullscreen_quad(&mut list.world, -0.9, GREEN);
    fullscreen_quad(&mut list.overlay, 0.9, BLUE);
    let surface = render(SurfaceSize::new(8, 8), &list);
    assert_eq!(surface.pixel(2, 6), Some([0, 0, 255, 255]));
}

#[test]
fn geometry_outside_depth_range_is_discarded() {
    let mut list = DrawList::new(BLACK);
    fullscreen_quad(&mut list.world, 1.5, RED);
    let surface = render(SurfaceSize::new(4, 4), &list);
    assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn triangles_behind_the_eye_are_skipped() {
    let mut list = DrawList::new(BLACK);
    let behind = |x: f32, y: f32| Vertex3d::new([x, y, 0.0, -1.0], RED);
    list.world
        .push_triangle(behind(-1.0, -1.0), behind(1.0, -1.0), behind(1.0, 1.0));
    let surface = render(SurfaceSize::new(4, 4), &list);
    assert!(surface.frame().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn lines_blend_by_alpha() {
    let mut list = DrawList::new(BLACK);
    let half_white = [1.0, 1.0, 1.0, 0.5];
    list.world
        .push_line(v(-1.0, 0.0, 0.0, half_white), v(1.0, 0.0, 0.0, half_white));
    let surface = render(SurfaceSize::new(8, 8), &list);
    assert_eq!(surface.pixel(3, 4), Some([128, 128, 128, 255]));
    assert_eq!(surface.pixel(3, 2), Some([0, 0, 0, 255]));
}

#[test]
fn lines_are_hidden_behind_nearer_triangles() {
    let mut list = DrawList::new(BLACK);
    fullscreen_quad(&mut list.world, -0.5, GREEN);
    list.world
        .push_line(v(-1.0, 0.0, 0.5, RED), v(1.0, 0.0, 0.5, RED));
    let surface = render(SurfaceSize::new(8, 8), &list);
    assert_eq!(surface.pixel(3, 4), Some([0, 255, 0, 255]));
}

#[test]
fn mismatched_buffers_leave_frame_untouched() {
    let size = SurfaceSize::new(4, 4);
    let mut color = vec![7u8; 8];
    let mut depth = vec![0.0f32; 16];
    let mut list = DrawList::new(BLACK);
    fullscreen_quad(&mut list.world, 0.0, RED);

    let mut gfx = CpuRenderer::new(&mut color, &mut depth, size);
    gfx.submit(&list);
    assert!(color.iter().all(|b| *b == 7));
}
