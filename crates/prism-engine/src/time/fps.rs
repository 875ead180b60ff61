use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Frames-per-second over a sliding one-second window.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: VecDeque<Instant>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame presented at `now` and returns the frames presented in
    /// the last second, including this one.
    pub fn record(&mut self, now: Instant) -> u32 {
        while let Some(&oldest) = self.frames.front() {
            if now.saturating_duration_since(oldest) < WINDOW {
                break;
            }
            self.frames.pop_front();
        }

        self.frames.push_back(now);
        self.frames.len() as u32
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }
}
