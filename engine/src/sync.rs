use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("render context failed to initialize: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InitState {
    Pending,
    Ready,
    Failed(String),
}

/// One-shot startup handshake between the render thread and the control thread.
///
/// The render thread signals once its graphics context is set up; the control thread blocks in
/// [`InitBarrier::wait`] until then. A failed setup is reported instead of leaving the waiter hung.
#[derive(Debug)]
pub struct InitBarrier {
    state: Mutex<InitState>,
    changed: Condvar,
}

impl Default for InitBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl InitBarrier {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InitState::Pending),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn signal_ready(&self) {
        self.settle(InitState::Ready);
    }

    pub fn signal_failed(&self, reason: impl Into<String>) {
        self.settle(InitState::Failed(reason.into()));
    }

    // The first signal wins.
    fn settle(&self, next: InitState) {
        let mut state = self.lock();
        if *state == InitState::Pending {
            *state = next;
        }
        drop(state);
        self.changed.notify_all();
    }

    pub fn is_settled(&self) -> bool {
        *self.lock() != InitState::Pending
    }

    pub fn wait(&self) -> Result<(), InitError> {
        let mut state = self.lock();
        log::debug!("waiting for initialization");
        while *state == InitState::Pending {
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            if *state == InitState::Pending {
                log::debug!("spurious wakeup while waiting for initialization");
            }
        }

        match &*state {
            InitState::Failed(reason) => Err(InitError::Failed(reason.clone())),
            _ => {
                log::debug!("initialization done");
                Ok(())
            }
        }
    }
}

/// Reports failure on drop unless the barrier was already settled.
///
/// Held by the render thread during setup so an early return or panic still releases the waiter.
pub struct InitGuard {
    barrier: Arc<InitBarrier>,
}

impl InitGuard {
    pub fn new(barrier: Arc<InitBarrier>) -> Self {
        Self { barrier }
    }

    pub fn ready(self) {
        self.barrier.signal_ready();
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.barrier.signal_failed(reason);
    }
}

impl Drop for InitGuard {
    fn drop(&mut self) {
        self.barrier
            .signal_failed("render thread exited before initialization finished");
    }
}
