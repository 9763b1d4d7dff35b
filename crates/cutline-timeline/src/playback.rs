//! Playback cursor and the clock capability that advances it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

/// Source of per-frame ticks.
///
/// `on_tick` calls `callback` once for every tick that elapsed since the
/// previous call, passing the tick length in seconds. The embedding UI
/// decides when to pump the clock (typically once per rendered frame).
pub trait Clock {
    fn on_tick(&mut self, callback: &mut dyn FnMut(f64));
}

/// Current playback time and play/pause state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackCursor {
    current_time: f64,
    is_playing: bool,
}

impl PlaybackCursor {
    /// Paused at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Flip between playing and paused. Returns the new state.
    pub fn toggle_play(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Jump to `time`, clamped to `>= 0`. Non-finite times are ignored.
    pub fn seek(&mut self, time: f64) {
        if time.is_finite() {
            self.current_time = time.max(0.0);
        }
    }

    /// Advance by `dt` seconds while playing. Returns the new time.
    ///
    /// There is no upper bound: the composition length is derived elsewhere.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.is_playing && dt.is_finite() && dt > 0.0 {
            self.current_time += dt;
        }
        self.current_time
    }

    /// Apply every tick the clock has pending.
    pub fn drive(&mut self, clock: &mut dyn Clock) -> f64 {
        clock.on_tick(&mut |dt| {
            self.advance(dt);
        });
        self.current_time
    }
}

/// Clock fed by hand, for tests and scripted replays.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pending: VecDeque<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one tick of `dt` seconds.
    pub fn push(&mut self, dt: f64) {
        self.pending.push_back(dt);
    }

    /// Queue `count` ticks at a fixed frame rate.
    pub fn push_frames(&mut self, count: usize, fps: f64) {
        if fps > 0.0 {
            self.pending.extend(std::iter::repeat(1.0 / fps).take(count));
        }
    }

    /// Ticks not yet delivered.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Clock for ManualClock {
    fn on_tick(&mut self, callback: &mut dyn FnMut(f64)) {
        while let Some(dt) = self.pending.pop_front() {
            callback(dt);
        }
    }
}

/// Wall-clock ticks: each pump delivers the time elapsed since the last one.
#[derive(Debug, Clone)]
pub struct InstantClock {
    last: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn on_tick(&mut self, callback: &mut dyn FnMut(f64)) {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        if dt > 0.0 {
            callback(dt);
        }
    }
}
