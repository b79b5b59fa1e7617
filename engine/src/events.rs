use std::sync::{Mutex, MutexGuard, PoisonError};

use winit::event::{ElementState, ModifiersState, MouseButton, VirtualKeyCode};

use crate::surface::SurfaceSize;

/// Maximum number of events held between two drains.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Window and input events as seen by the simulation/render side.
///
/// One variant per callback kind the windowing layer reports. Payloads are plain copies, so an
/// event never borrows from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    WindowPosition {
        x: i32,
        y: i32,
    },
    WindowSize {
        width: u32,
        height: u32,
    },
    WindowClose,
    WindowRefresh,
    WindowFocus {
        focused: bool,
    },
    WindowIconify {
        iconified: bool,
    },
    FramebufferSize {
        width: u32,
        height: u32,
    },
    MouseButton {
        button: MouseButton,
        state: ElementState,
        modifiers: ModifiersState,
    },
    CursorPosition {
        x: f64,
        y: f64,
    },
    Scroll {
        dx: f64,
        dy: f64,
    },
    Key {
        key: Option<VirtualKeyCode>,
        scancode: u32,
        state: ElementState,
        modifiers: ModifiersState,
    },
    Char {
        ch: char,
    },
    CharWithMods {
        ch: char,
        modifiers: ModifiersState,
    },
}

impl Event {
    /// Singleton kinds keep at most one pending instance; a newer one overwrites it in place.
    pub fn is_singleton(&self) -> bool {
        matches!(self, Event::WindowPosition { .. } | Event::WindowSize { .. })
    }

    pub fn same_kind(&self, other: &Event) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Appended,
    Replaced,
    Dropped,
}

/// Fixed-capacity, append-until-drained event buffer.
///
/// Window position and size events are deduplicated (latest wins, keeping the slot of the first
/// one). Everything else appends; once full, further pushes are discarded.
#[derive(Debug)]
pub struct EventQueue {
    events: Vec<Event>,
    dropped: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(EVENT_QUEUE_CAPACITY),
            dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total number of events discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn push(&mut self, event: Event) -> PushOutcome {
        if event.is_singleton() {
            if let Some(slot) = self.events.iter_mut().find(|e| e.same_kind(&event)) {
                *slot = event;
                return PushOutcome::Replaced;
            }
        }

        if self.events.len() >= EVENT_QUEUE_CAPACITY {
            self.dropped = self.dropped.saturating_add(1);
            log::trace!("event queue full, dropping {event:?}");
            return PushOutcome::Dropped;
        }

        self.events.push(event);
        PushOutcome::Appended
    }

    /// Moves all pending events into `out` (in push order) and empties the queue.
    pub fn drain_into(&mut self, out: &mut Vec<Event>) {
        out.extend(self.events.drain(..));
    }

    pub fn drain_and_clear(&mut self) -> Vec<Event> {
        let mut out = Vec::with_capacity(self.events.len());
        self.drain_into(&mut out);
        out
    }
}

#[derive(Debug, Default)]
struct SharedInner {
    queue: EventQueue,
    window_size: SurfaceSize,
}

/// The only state shared between the windowing thread and the render thread.
///
/// One lock guards both the pending events and the mirrored window size, so a size event and the
/// size fields never disagree from the consumer's point of view.
#[derive(Debug, Default)]
pub struct SharedEvents {
    inner: Mutex<SharedInner>,
}

impl SharedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SharedInner> {
        // The guarded data stays consistent even if a holder panicked mid-push.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, event: Event) -> PushOutcome {
        let mut inner = self.lock();
        if let Event::WindowSize { width, height } = event {
            inner.window_size = SurfaceSize::new(width, height);
        }
        inner.queue.push(event)
    }

    pub fn window_size(&self) -> SurfaceSize {
        self.lock().window_size
    }

    pub fn set_window_size(&self, size: SurfaceSize) {
        self.lock().window_size = size;
    }

    /// Drains under the lock and returns; callers process the events after the lock is released.
    pub fn drain_into(&self, out: &mut Vec<Event>) {
        self.lock().queue.drain_into(out);
    }

    pub fn drain_and_clear(&self) -> Vec<Event> {
        self.lock().queue.drain_and_clear()
    }

    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn dropped(&self) -> u64 {
        self.lock().queue.dropped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_replacement_keeps_first_slot() {
        let mut q = EventQueue::new();
        q.push(Event::WindowPosition { x: 1, y: 1 });
        q.push(Event::WindowClose);
        assert_eq!(
            q.push(Event::WindowPosition { x: 5, y: 6 }),
            PushOutcome::Replaced
        );

        let events = q.drain_and_clear();
        assert_eq!(
            events,
            vec![Event::WindowPosition { x: 5, y: 6 }, Event::WindowClose]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn position_and_size_dedup_independently() {
        let mut q = EventQueue::new();
        q.push(Event::WindowSize {
            width: 10,
            height: 10,
        });
        q.push(Event::WindowPosition { x: 0, y: 0 });
        q.push(Event::WindowSize {
            width: 20,
            height: 30,
        });
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn framebuffer_size_is_not_deduplicated() {
        let mut q = EventQueue::new();
        q.push(Event::FramebufferSize {
            width: 1,
            height: 1,
        });
        q.push(Event::FramebufferSize {
            width: 2,
            height: 2,
        });
        assert_eq!(q.len(), 2);
    }
}
