use std::collections::HashSet;
use std::sync::Arc;

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{
    ElementState, KeyboardInput, ModifiersState, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::window::{Fullscreen, Window};

use crate::events::{Event, SharedEvents};

/// Scroll deltas reported in pixels are converted to "lines" with this factor.
pub const PIXELS_PER_SCROLL_LINE: f64 = 40.0;

/// Side effects the bridge wants applied to the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    EnterFullscreen,
    LeaveFullscreen,
}

/// Runs on the windowing thread: turns window callbacks into queued [`Event`]s.
///
/// The only thing it does directly is the fullscreen toggle (F11). The fullscreen flag lives here
/// and nowhere else, so it never crosses threads.
///
/// OS key auto-repeat arrives as repeated presses; only the first press of a held key is queued.
#[derive(Debug)]
pub struct InputBridge {
    events: Arc<SharedEvents>,
    modifiers: ModifiersState,
    held: HashSet<VirtualKeyCode>,
    fullscreen: bool,
    windowed_size: PhysicalSize<u32>,
}

impl InputBridge {
    pub fn new(events: Arc<SharedEvents>, windowed_size: PhysicalSize<u32>) -> Self {
        Self {
            events,
            modifiers: ModifiersState::empty(),
            held: HashSet::new(),
            fullscreen: false,
            windowed_size,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn modifiers(&self) -> ModifiersState {
        self.modifiers
    }

    /// Translates and applies one window event.
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent<'_>) {
        if let Some(command) = self.translate(event) {
            self.apply(window, command);
        }
    }

    pub fn refresh(&self) {
        self.events.push(Event::WindowRefresh);
    }

    /// Queues whatever `event` maps to and returns the window command it triggers, if any.
    pub fn translate(&mut self, event: &WindowEvent<'_>) -> Option<WindowCommand> {
        match event {
            WindowEvent::Moved(pos) => {
                self.events.push(Event::WindowPosition { x: pos.x, y: pos.y });
            }
            WindowEvent::Resized(size) => self.push_size(*size),
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                self.push_size(**new_inner_size)
            }
            WindowEvent::CloseRequested => {
                self.events.push(Event::WindowClose);
            }
            WindowEvent::Focused(focused) => {
                if !*focused {
                    // Releases that happen while unfocused are never delivered.
                    self.held.clear();
                }
                self.events.push(Event::WindowFocus { focused: *focused });
            }
            WindowEvent::Occluded(occluded) => {
                self.events.push(Event::WindowIconify {
                    iconified: *occluded,
                });
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.events.push(Event::MouseButton {
                    button: *button,
                    state: *state,
                    modifiers: self.modifiers,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.events.push(Event::CursorPosition {
                    x: position.x,
                    y: position.y,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (f64::from(*x), f64::from(*y)),
                    MouseScrollDelta::PixelDelta(p) => {
                        (p.x / PIXELS_PER_SCROLL_LINE, p.y / PIXELS_PER_SCROLL_LINE)
                    }
                };
                self.events.push(Event::Scroll { dx, dy });
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        scancode,
                        state,
                        virtual_keycode,
                        ..
                    },
                ..
            } => {
                if self.is_repeat(*virtual_keycode, *state) {
                    log::trace!("ignoring auto-repeat of {virtual_keycode:?}");
                    return None;
                }
                self.events.push(Event::Key {
                    key: *virtual_keycode,
                    scancode: *scancode,
                    state: *state,
                    modifiers: self.modifiers,
                });
                if *state == ElementState::Pressed && *virtual_keycode == Some(VirtualKeyCode::F11)
                {
                    return Some(self.toggle_fullscreen());
                }
            }
            WindowEvent::ReceivedCharacter(ch) => {
                self.events.push(Event::Char { ch: *ch });
                self.events.push(Event::CharWithMods {
                    ch: *ch,
                    modifiers: self.modifiers,
                });
            }
            _ => {}
        }
        None
    }

    /// Updates the held-key set; true for a press of a key that is already down.
    fn is_repeat(&mut self, key: Option<VirtualKeyCode>, state: ElementState) -> bool {
        let Some(key) = key else {
            return false;
        };
        match state {
            ElementState::Pressed => !self.held.insert(key),
            ElementState::Released => {
                self.held.remove(&key);
                false
            }
        }
    }

    fn push_size(&self, size: PhysicalSize<u32>) {
        self.events.push(Event::WindowSize {
            width: size.width,
            height: size.height,
        });
        self.events.push(Event::FramebufferSize {
            width: size.width,
            height: size.height,
        });
    }

    fn toggle_fullscreen(&mut self) -> WindowCommand {
        self.fullscreen = !self.fullscreen;
        if self.fullscreen {
            WindowCommand::EnterFullscreen
        } else {
            WindowCommand::LeaveFullscreen
        }
    }

    fn apply(&self, window: &Window, command: WindowCommand) {
        match command {
            WindowCommand::EnterFullscreen => {
                log::info!("entering fullscreen");
                window.set_fullscreen(Some(Fullscreen::Borderless(window.current_monitor())));
            }
            WindowCommand::LeaveFullscreen => {
                log::info!("leaving fullscreen");
                window.set_fullscreen(None);
                window.set_inner_size(self.windowed_size);
                if let Some(monitor) = window.current_monitor() {
                    let origin = monitor.position();
                    let area = monitor.size();
                    let x = origin.x + centered(area.width, self.windowed_size.width);
                    let y = origin.y + centered(area.height, self.windowed_size.height);
                    window.set_outer_position(PhysicalPosition::new(x, y));
                }
            }
        }
    }
}

fn centered(outer: u32, inner: u32) -> i32 {
    (outer.saturating_sub(inner) / 2) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::DeviceId;

    #[allow(deprecated)]
    fn key_event(key: VirtualKeyCode, state: ElementState) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            // SAFETY: only compared against other ids, never handed to the platform.
            device_id: unsafe { DeviceId::dummy() },
            input: KeyboardInput {
                scancode: 0,
                state,
                virtual_keycode: Some(key),
                modifiers: ModifiersState::empty(),
            },
            is_synthetic: false,
        }
    }

    #[test]
    fn held_f11_toggles_fullscreen_once() {
        let events = Arc::new(SharedEvents::new());
        let mut bridge = InputBridge::new(events.clone(), PhysicalSize::new(940, 520));

        let first = bridge.translate(&key_event(VirtualKeyCode::F11, ElementState::Pressed));
        let repeat = bridge.translate(&key_event(VirtualKeyCode::F11, ElementState::Pressed));
        assert_eq!(first, Some(WindowCommand::EnterFullscreen));
        assert_eq!(repeat, None);
        assert!(bridge.is_fullscreen());
        assert_eq!(events.pending(), 1);

        bridge.translate(&key_event(VirtualKeyCode::F11, ElementState::Released));
        assert_eq!(
            bridge.translate(&key_event(VirtualKeyCode::F11, ElementState::Pressed)),
            Some(WindowCommand::LeaveFullscreen)
        );
        assert!(!bridge.is_fullscreen());
    }

    #[test]
    fn focus_loss_forgets_held_keys() {
        let events = Arc::new(SharedEvents::new());
        let mut bridge = InputBridge::new(events.clone(), PhysicalSize::new(940, 520));

        bridge.translate(&key_event(VirtualKeyCode::F3, ElementState::Pressed));
        bridge.translate(&WindowEvent::Focused(false));
        bridge.translate(&key_event(VirtualKeyCode::F3, ElementState::Pressed));

        let keys = events
            .drain_and_clear()
            .into_iter()
            .filter(|e| matches!(e, Event::Key { .. }))
            .count();
        assert_eq!(keys, 2);
    }

    #[test]
    fn modifiers_are_attached_to_key_events() {
        let events = Arc::new(SharedEvents::new());
        let mut bridge = InputBridge::new(events.clone(), PhysicalSize::new(940, 520));

        bridge.translate(&WindowEvent::ModifiersChanged(ModifiersState::SHIFT));
        assert_eq!(bridge.modifiers(), ModifiersState::SHIFT);

        bridge.translate(&key_event(VirtualKeyCode::W, ElementState::Pressed));
        assert_eq!(
            events.drain_and_clear(),
            vec![Event::Key {
                key: Some(VirtualKeyCode::W),
                scancode: 0,
                state: ElementState::Pressed,
                modifiers: ModifiersState::SHIFT,
            }]
        );
    }

    #[test]
    fn close_and_focus_are_queued_in_order() {
        let events = Arc::new(SharedEvents::new());
        let mut bridge = InputBridge::new(events.clone(), PhysicalSize::new(940, 520));

        assert_eq!(bridge.translate(&WindowEvent::Focused(false)), None);
        assert_eq!(bridge.translate(&WindowEvent::CloseRequested), None);

        assert_eq!(
            events.drain_and_clear(),
            vec![Event::WindowFocus { focused: false }, Event::WindowClose]
        );
    }

    #[test]
    fn resize_mirrors_window_size() {
        let events = Arc::new(SharedEvents::new());
        let mut bridge = InputBridge::new(events.clone(), PhysicalSize::new(940, 520));

        bridge.translate(&WindowEvent::Resized(PhysicalSize::new(800, 600)));
        assert_eq!(events.window_size(), crate::surface::SurfaceSize::new(800, 600));
        assert_eq!(events.pending(), 2);
    }
}
