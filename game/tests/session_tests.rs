use std::f32::consts::FRAC_PI_4;

use engine::graphics::DrawList;
use engine::surface::SurfaceSize;
use engine::{Event, GameApp};
use snake3d::SnakeSession;
use snake3d::field::Field;
use snake3d::grid::{Direction, GridDims, TICK_PERIOD, Vec3i};
use snake3d::rng::XorShiftRng;
use snake3d::scene::BACKGROUND;
use snake3d::settings::ControlSettings;
use winit::event::{ElementState, ModifiersState, MouseButton, VirtualKeyCode};

fn session() -> SnakeSession {
    SnakeSession::with_field(
        Field::new(GridDims::STANDARD, XorShiftRng::new(42)),
        ControlSettings::default(),
    )
}

fn key(code: VirtualKeyCode, state: ElementState) -> Event {
    Event::Key {
        key: Some(code),
        scancode: 0,
        state,
        modifiers: ModifiersState::empty(),
    }
}

fn left_button(state: ElementState) -> Event {
    Event::MouseButton {
        button: MouseButton::Left,
        state,
        modifiers: ModifiersState::empty(),
    }
}

#[test]
fn ticks_at_the_fixed_period() {
    assert_eq!(session().tick_period(), TICK_PERIOD);
}

#[test]
fn keys_are_remapped_by_camera_view() {
    let mut game = session();
    // Default azimuth looks from +X, so forward is -X.
    game.handle_event(&key(VirtualKeyCode::W, ElementState::Pressed));
    assert_eq!(game.snake().requested_heading(), Direction::NegX);

    game.camera_mut().set_azimuth(FRAC_PI_4 * 2.0);
    game.handle_event(&key(VirtualKeyCode::Right, ElementState::Pressed));
    assert_eq!(game.snake().requested_heading(), Direction::PosX);

    game.handle_event(&key(VirtualKeyCode::LShift, ElementState::Pressed));
    assert_eq!(game.snake().requested_heading(), Direction::NegY);
}

#[test]
fn key_releases_are_ignored() {
    let mut game = session();
    game.handle_event(&key(VirtualKeyCode::A, ElementState::Released));
    assert_eq!(game.snake().requested_heading(), Direction::PosY);
}

#[test]
fn tick_applies_the_requested_heading() {
    let mut game = session();
    game.handle_event(&key(VirtualKeyCode::Space, ElementState::Pressed));
    game.handle_event(&key(VirtualKeyCode::S, ElementState::Pressed));
    game.tick();
    assert_eq!(game.snake().heading(), Direction::PosX);
    assert_eq!(game.snake().head(), Vec3i::new(2, 1, 0));
}

#[test]
fn drag_only_while_left_button_is_down() {
    let mut game = session();
    let start = game.camera().azimuth();

    game.handle_event(&Event::CursorPosition { x: 100.0, y: 50.0 });
    assert_eq!(game.camera().azimuth(), start);

    game.handle_event(&left_button(ElementState::Pressed));
    game.handle_event(&Event::CursorPosition { x: 110.0, y: 50.0 });
    assert!((game.camera().azimuth() - (start + 0.1)).abs() < 1e-4);

    game.handle_event(&left_button(ElementState::Released));
    game.handle_event(&Event::CursorPosition { x: 300.0, y: 50.0 });
    assert!((game.camera().azimuth() - (start + 0.1)).abs() < 1e-4);
}

#[test]
fn scroll_zooms_the_camera() {
    let mut game = session();
    game.handle_event(&Event::Scroll { dx: 0.0, dy: 1.0 });
    assert!((game.camera().radius() - 13.5).abs() < 1e-4);
}

#[test]
fn f3_toggles_the_axis_gizmo() {
    let mut game = session();
    let size = SurfaceSize::new(940, 520);
    let mut list = DrawList::default();

    game.render(size, &mut list);
    let plain = list.world.line_count();

    game.handle_event(&key(VirtualKeyCode::F3, ElementState::Pressed));
    assert!(game.show_axes());
    game.render(size, &mut list);
    assert_eq!(list.world.line_count(), plain + 3);
    assert_eq!(list.clear_color, BACKGROUND);

    game.handle_event(&key(VirtualKeyCode::F3, ElementState::Pressed));
    assert!(!game.show_axes());
}
