use std::time::Duration;

use engine::graphics::DrawList;
use engine::surface::SurfaceSize;
use engine::{Event, GameApp};
use winit::event::{ElementState, MouseButton, VirtualKeyCode};

use crate::camera::{CameraOrbit, MoveIntent};
use crate::field::Field;
use crate::grid::{GridDims, TICK_PERIOD};
use crate::rng::{RandomSource, XorShiftRng};
use crate::scene::RenderFrame;
use crate::settings::ControlSettings;
use crate::snake::{Snake, TickOutcome};

pub fn key_intent(key: VirtualKeyCode) -> Option<MoveIntent> {
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(MoveIntent::Forward),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(MoveIntent::Backward),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(MoveIntent::Left),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(MoveIntent::Right),
        VirtualKeyCode::Space => Some(MoveIntent::Up),
        VirtualKeyCode::LShift => Some(MoveIntent::Down),
        _ => None,
    }
}

/// One running game: the board, the camera and the input state that drives them.
///
/// Lives on the render thread; every field is touched only from there.
#[derive(Debug)]
pub struct SnakeSession<R: RandomSource = XorShiftRng> {
    snake: Snake,
    field: Field<R>,
    camera: CameraOrbit,
    controls: ControlSettings,
    dragging: bool,
    last_cursor: (f64, f64),
    show_axes: bool,
}

impl SnakeSession<XorShiftRng> {
    pub fn new(controls: ControlSettings) -> Self {
        Self::with_field(Field::with_time_seed(GridDims::STANDARD), controls)
    }
}

impl<R: RandomSource> SnakeSession<R> {
    pub fn with_field(field: Field<R>, controls: ControlSettings) -> Self {
        Self {
            snake: Snake::new(field.dims()),
            field,
            camera: CameraOrbit::default(),
            controls,
            dragging: false,
            last_cursor: (0.0, 0.0),
            show_axes: false,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn field(&self) -> &Field<R> {
        &self.field
    }

    pub fn camera(&self) -> &CameraOrbit {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraOrbit {
        &mut self.camera
    }

    pub fn show_axes(&self) -> bool {
        self.show_axes
    }

    pub fn step(&mut self) -> TickOutcome {
        self.snake.update(&mut self.field)
    }

    fn on_key(&mut self, key: VirtualKeyCode) {
        if key == VirtualKeyCode::F3 {
            self.show_axes = !self.show_axes;
            log::debug!("axis overlay: {}", self.show_axes);
            return;
        }
        if let Some(intent) = key_intent(key) {
            let direction = self.camera.quadrant().remap(intent);
            self.snake.set_direction(direction);
        }
    }

    fn on_cursor(&mut self, x: f64, y: f64) {
        if self.dragging {
            let (last_x, last_y) = self.last_cursor;
            self.camera.drag(
                (last_x - x) as f32,
                (last_y - y) as f32,
                self.controls.drag_sensitivity,
            );
        }
        self.last_cursor = (x, y);
    }
}

impl<R: RandomSource + Send + 'static> GameApp for SnakeSession<R> {
    fn tick_period(&self) -> Duration {
        TICK_PERIOD
    }

    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::MouseButton {
                button: MouseButton::Left,
                state,
                ..
            } => self.dragging = state != ElementState::Released,
            Event::CursorPosition { x, y } => self.on_cursor(x, y),
            Event::Scroll { dy, .. } => {
                self.camera.zoom(dy as f32, self.controls.zoom_sensitivity);
            }
            Event::Key {
                key: Some(key),
                state: ElementState::Pressed,
                ..
            } => self.on_key(key),
            _ => {}
        }
    }

    fn tick(&mut self) {
        self.step();
    }

    fn render(&self, size: SurfaceSize, list: &mut DrawList) {
        RenderFrame::new(size, &self.camera, self.field.dims()).build(
            &self.snake,
            self.field.food(),
            self.show_axes,
            list,
        );
    }
}
