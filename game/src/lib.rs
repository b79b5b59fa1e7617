pub mod camera;
pub mod field;
pub mod glyphs;
pub mod grid;
pub mod icon;
pub mod rng;
pub mod scene;
pub mod session;
pub mod settings;
pub mod snake;

pub use session::SnakeSession;

pub const WINDOW_TITLE: &str = "Snake3D (Controls: W/A/S/D/Space/Shift/Mouse)";
pub const MIN_WINDOW_WIDTH: u32 = 940;
pub const MIN_WINDOW_HEIGHT: u32 = 520;
