pub mod app;
pub mod clock;
pub mod events;
pub mod graphics;
pub mod input_bridge;
pub mod logging;
pub mod pixels_renderer;
pub mod surface;
pub mod sync;

pub use app::{AppConfig, AppError, FrameDriver, GameApp, IconImage, run_game};
pub use clock::GameClock;
pub use events::{Event, EventQueue, SharedEvents};
pub use graphics::{DrawList, Renderer3d, Vertex3d};
pub use surface::SurfaceSize;
