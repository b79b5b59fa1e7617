use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::error::OsError;
use winit::event::Event as WinitEvent;
use winit::event_loop::{EventLoopBuilder, EventLoopProxy};
use winit::window::{BadIcon, Icon, Window, WindowBuilder};

use crate::clock::GameClock;
use crate::events::{Event, SharedEvents};
use crate::graphics::DrawList;
use crate::input_bridge::InputBridge;
use crate::pixels_renderer::{PixelsRenderer3d, RenderBackend};
use crate::surface::SurfaceSize;
use crate::sync::{InitBarrier, InitError, InitGuard};

// Sleep used instead of drawing while the window has no area.
const IDLE_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create application window: {0}")]
    CreateWindow(#[from] OsError),
    #[error("invalid window icon: {0}")]
    Icon(#[from] BadIcon),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[from] pixels::Error),
    #[error("failed to spawn render thread: {0}")]
    SpawnRenderThread(#[source] std::io::Error),
    #[error(transparent)]
    Init(#[from] InitError),
}

/// Raw RGBA icon pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Initial inner size; also the minimum and the size restored when leaving fullscreen.
    pub min_size: PhysicalSize<u32>,
    pub vsync: bool,
    pub backend: RenderBackend,
    pub icon: Option<IconImage>,
}

/// A game driven by the render thread.
///
/// Per frame: every pending event is passed to `handle_event` in order, then `tick` runs once per
/// elapsed `tick_period`, then `render` fills the draw list.
pub trait GameApp: Send + 'static {
    fn tick_period(&self) -> Duration;

    fn handle_event(&mut self, event: &Event);

    fn tick(&mut self);

    fn render(&self, size: SurfaceSize, list: &mut DrawList);
}

/// What the frame loop itself needs from one drain of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub resized: Option<SurfaceSize>,
    pub close_requested: bool,
    pub handled: usize,
}

/// The render-thread half of the app, independent of any window.
pub struct FrameDriver<G: GameApp> {
    game: G,
    events: Arc<SharedEvents>,
    clock: GameClock,
    scratch: Vec<Event>,
    list: DrawList,
}

impl<G: GameApp> FrameDriver<G> {
    pub fn new(game: G, events: Arc<SharedEvents>) -> Self {
        let clock = GameClock::new(game.tick_period());
        Self {
            game,
            events,
            clock,
            scratch: Vec::new(),
            list: DrawList::default(),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Drains the shared queue, then feeds each event to the game with the lock released.
    pub fn pump_events(&mut self) -> FrameEvents {
        self.scratch.clear();
        self.events.drain_into(&mut self.scratch);

        let mut frame = FrameEvents {
            handled: self.scratch.len(),
            ..FrameEvents::default()
        };
        for event in &self.scratch {
            match *event {
                Event::WindowSize { width, height } => {
                    frame.resized = Some(SurfaceSize::new(width, height));
                }
                Event::WindowClose => frame.close_requested = true,
                _ => {}
            }
            self.game.handle_event(event);
        }
        frame
    }

    /// Returns the number of ticks run.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let ticks = self.clock.advance(dt);
        for _ in 0..ticks {
            self.game.tick();
        }
        ticks
    }

    pub fn build_frame(&mut self, size: SurfaceSize) -> &DrawList {
        self.game.render(size, &mut self.list);
        &self.list
    }
}

/// Signal sent to the event loop when the render thread has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderThreadExited;

/// Whatever wakes the control thread once the render thread is gone.
pub trait ExitNotify {
    fn notify_exit(&self);
}

impl ExitNotify for EventLoopProxy<RenderThreadExited> {
    fn notify_exit(&self) {
        if self.send_event(RenderThreadExited).is_err() {
            log::debug!("event loop already gone");
        }
    }
}

/// Notifies on drop, so the control thread is woken on unwind as well as on a normal return.
pub struct ExitSignal<N: ExitNotify> {
    notifier: N,
}

impl<N: ExitNotify> ExitSignal<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: ExitNotify> Drop for ExitSignal<N> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("render thread is unwinding");
        }
        self.notifier.notify_exit();
    }
}

#[derive(Debug, Clone, Copy)]
struct RenderOptions {
    vsync: bool,
    backend: RenderBackend,
}

fn create_renderer(
    window: &Window,
    size: SurfaceSize,
    options: RenderOptions,
) -> Result<PixelsRenderer3d, pixels::Error> {
    let width = size.width.max(1);
    let height = size.height.max(1);
    let surface_texture = SurfaceTexture::new(width, height, window);
    let pixels = PixelsBuilder::new(width, height, surface_texture)
        .enable_vsync(options.vsync)
        .build()?;
    PixelsRenderer3d::new(pixels, size, options.backend)
}

fn render_main<G: GameApp>(
    window: Arc<Window>,
    events: Arc<SharedEvents>,
    init: InitGuard,
    proxy: EventLoopProxy<RenderThreadExited>,
    options: RenderOptions,
    game: G,
) {
    let _exit = ExitSignal::new(proxy);
    let size = SurfaceSize::from(window.inner_size());
    let mut renderer = match create_renderer(&window, size, options) {
        Ok(renderer) => renderer,
        Err(err) => {
            log::error!("failed to initialize renderer: {err}");
            init.fail(err.to_string());
            return;
        }
    };

    // Synthetic resize so the first drained frame sees the real size.
    events.push(Event::WindowSize {
        width: size.width,
        height: size.height,
    });
    init.ready();

    let mut driver = FrameDriver::new(game, events);
    let mut last_frame = Instant::now();
    loop {
        let frame = driver.pump_events();
        if let Some(size) = frame.resized {
            if let Err(err) = renderer.resize(size) {
                log::warn!("resize failed: {err}");
            }
        }
        if frame.close_requested {
            break;
        }

        let now = Instant::now();
        driver.advance(now.saturating_duration_since(last_frame));
        last_frame = now;

        let size = renderer.size();
        if size.is_empty() {
            thread::sleep(IDLE_FRAME);
            continue;
        }
        renderer.draw(driver.build_frame(size));
        if let Err(err) = renderer.present() {
            log::warn!("present failed: {err}");
        }
    }

    log::debug!("render loop finished");
}

fn join_render_thread(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        log::error!("render thread panicked");
    }
}

/// Opens the window, starts the render thread and runs the windowing event loop.
///
/// Returns only on setup failure; a normal close exits the process from inside the event loop.
pub fn run_game<G: GameApp>(config: AppConfig, game: G) -> Result<(), AppError> {
    let event_loop = EventLoopBuilder::<RenderThreadExited>::with_user_event().build();

    let mut builder = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(config.min_size)
        .with_min_inner_size(config.min_size);
    if let Some(icon) = config.icon.clone() {
        builder = builder.with_window_icon(Some(Icon::from_rgba(
            icon.rgba,
            icon.width,
            icon.height,
        )?));
    }
    let window = Arc::new(builder.build(&event_loop)?);

    let events = Arc::new(SharedEvents::new());
    events.set_window_size(SurfaceSize::from(window.inner_size()));
    let barrier = Arc::new(InitBarrier::new());

    let options = RenderOptions {
        vsync: config.vsync,
        backend: config.backend,
    };
    let render_thread = thread::Builder::new()
        .name("render".to_string())
        .spawn({
            let window = window.clone();
            let events = events.clone();
            let init = InitGuard::new(barrier.clone());
            let proxy = event_loop.create_proxy();
            move || render_main(window, events, init, proxy, options, game)
        })
        .map_err(AppError::SpawnRenderThread)?;

    if let Err(err) = barrier.wait() {
        join_render_thread(render_thread);
        return Err(err.into());
    }

    let mut bridge = InputBridge::new(events, config.min_size);
    let mut render_thread = Some(render_thread);

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            WinitEvent::WindowEvent { window_id, event } if window_id == window.id() => {
                bridge.handle_window_event(&window, &event);
            }
            WinitEvent::RedrawRequested(_) => bridge.refresh(),
            WinitEvent::UserEvent(RenderThreadExited) => control_flow.set_exit(),
            WinitEvent::LoopDestroyed => {
                if let Some(handle) = render_thread.take() {
                    join_render_thread(handle);
                }
            }
            _ => {}
        }
    });
}
