//! Frame loop bookkeeping, independent of `requestAnimationFrame`.

use std::cell::Cell;
use std::rc::Rc;

/// Shared stop flag for a running loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Scheduled,
    Stopped,
}

/// What the animation-frame callback should do this time round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Tick the scene, then request the next frame.
    Run,
    /// Do nothing and drop the loop.
    Stop,
}

#[derive(Debug)]
pub struct FrameDriver {
    state: FrameState,
    token: CancelToken,
    frames: u64,
}

impl FrameDriver {
    pub fn new(token: CancelToken) -> Self {
        Self {
            state: FrameState::Idle,
            token,
            frames: 0,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Marks the first frame as requested. Returns false if the loop cannot
    /// start (already running, stopped, or cancelled before starting).
    pub fn schedule(&mut self) -> bool {
        if self.state != FrameState::Idle {
            return false;
        }
        if self.token.is_cancelled() {
            self.state = FrameState::Stopped;
            return false;
        }
        self.state = FrameState::Scheduled;
        true
    }

    /// Called at the top of every animation frame.
    pub fn on_frame(&mut self) -> FrameAction {
        if self.state != FrameState::Scheduled {
            return FrameAction::Stop;
        }
        if self.token.is_cancelled() {
            self.state = FrameState::Stopped;
            return FrameAction::Stop;
        }
        self.frames += 1;
        FrameAction::Run
    }

    /// A tick failed; nothing else will run.
    pub fn fail(&mut self) {
        self.state = FrameState::Stopped;
    }
}
