//! Cooperative frame scheduler for corruption animations.
//!
//! The host owns the real timer and calls [`AnimationScheduler::tick`] with
//! the wall-clock time elapsed since the previous tick. The scheduler owns
//! the current frame index and accumulated time, so pausing and resuming
//! never depends on how the host's timer behaves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationScheduler {
    state: SchedulerState,
    interval_ms: u32,
    frame_count: usize,
    current_frame: usize,
    elapsed_ms: u64,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin from frame 0. Restarts if already running or paused.
    pub fn start(&mut self, interval_ms: u32, frame_count: usize) {
        self.interval_ms = interval_ms;
        self.frame_count = frame_count;
        self.current_frame = 0;
        self.elapsed_ms = 0;
        self.state = SchedulerState::Running;
        log::trace!("scheduler start: {interval_ms}ms x {frame_count} frames");
    }

    /// Returns `false` unless the scheduler was running.
    pub fn pause(&mut self) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        self.state = SchedulerState::Paused;
        log::trace!("scheduler paused at frame {}", self.current_frame);
        true
    }

    /// Returns `false` unless the scheduler was paused.
    pub fn resume(&mut self) -> bool {
        if self.state != SchedulerState::Paused {
            return false;
        }
        self.state = SchedulerState::Running;
        log::trace!("scheduler resumed at frame {}", self.current_frame);
        true
    }

    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
        self.current_frame = 0;
        self.elapsed_ms = 0;
    }

    /// Change cadence without losing the current frame.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
        self.elapsed_ms = self.elapsed_ms.min(u64::from(interval_ms));
    }

    /// Advance by `elapsed_ms`. Returns the frame now showing when at least
    /// one interval boundary was passed.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<usize> {
        if self.state != SchedulerState::Running || self.frame_count == 0 || self.interval_ms == 0
        {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let interval = u64::from(self.interval_ms);
        let steps = self.elapsed_ms / interval;
        if steps == 0 {
            return None;
        }
        self.elapsed_ms %= interval;
        let frames = u64::try_from(self.frame_count).unwrap_or(u64::MAX);
        let current = u64::try_from(self.current_frame).unwrap_or(0);
        let next = (current + steps % frames) % frames;
        self.current_frame = usize::try_from(next).unwrap_or(0);
        Some(self.current_frame)
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub const fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[must_use]
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}
