//! Playback cursor over an immutable event trace.
//!
//! The controller owns the trace and a single index into it. Every
//! transition is a `&mut self` method that runs to completion, and none of
//! them can leave the index outside `[0, len-1]` (or away from 0 for an
//! empty trace). Autoplay is driven by the caller through [`Playback::tick`]
//! with the time elapsed since the previous tick, so it works equally under
//! a frame loop, a timer, or a simulated clock in tests.

use std::time::Duration;

use crate::events::Event;
use crate::utils::{autoplay_interval, clamp_index};

/// Coarse state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No events loaded.
    Idle,
    Paused,
    Playing,
}

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    #[inline]
    fn apply(self, index: usize) -> usize {
        match self {
            Direction::Backward => index.saturating_sub(1),
            Direction::Forward => index.saturating_add(1),
        }
    }
}

/// Cursor state machine over a generated trace.
#[derive(Debug, Clone)]
pub struct Playback {
    events: Vec<Event>,
    index: usize,
    playing: bool,
    speed: f64,
    /// Time accumulated towards the next autoplay advance.
    elapsed: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// An idle controller at speed 1.0.
    pub fn new() -> Self {
        Self::with_speed(1.0)
    }

    /// An idle controller at the given speed.
    ///
    /// A non-finite or non-positive `speed` is ignored as in
    /// [`set_speed`](Self::set_speed), leaving the controller at 1.0.
    pub fn with_speed(speed: f64) -> Self {
        let mut playback = Self {
            events: Vec::new(),
            index: 0,
            playing: false,
            speed: 1.0,
            elapsed: Duration::ZERO,
        };
        playback.set_speed(speed);
        playback
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The event under the cursor.
    pub fn current(&self) -> Option<&Event> {
        self.events.get(self.index)
    }

    /// Events up to and including the cursor; the input of every view.
    pub fn visible(&self) -> &[Event] {
        match self.events.len() {
            0 => &[],
            _ => &self.events[..=self.index],
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.events.is_empty() {
            PlaybackState::Idle
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// True when the cursor sits on the last event.
    pub fn at_end(&self) -> bool {
        !self.events.is_empty() && self.index == self.events.len() - 1
    }

    /// Current autoplay interval.
    pub fn interval(&self) -> Duration {
        autoplay_interval(self.speed)
    }

    fn last_index(&self) -> usize {
        self.events.len().saturating_sub(1)
    }

    fn move_to(&mut self, index: usize) {
        #[cfg(feature = "tracing")]
        {
            if index != self.index {
                tracing::trace!(from = self.index, to = index, "cursor moved");
            }
        }
        self.index = index;
    }

    /// Replace the trace, stop playback and rewind to the first event.
    pub fn load(&mut self, events: Vec<Event>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(events = events.len(), "trace loaded");
        self.playing = false;
        self.elapsed = Duration::ZERO;
        self.events = events;
        self.index = 0;
    }

    /// Start autoplay. No-op when already playing or when nothing is loaded.
    pub fn play(&mut self) {
        if self.playing || self.events.is_empty() {
            return;
        }
        self.playing = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pause and rewind to the first event.
    pub fn reset(&mut self) {
        self.pause();
        self.move_to(0);
    }

    /// Pause, then move one event in `direction`, clamped to the trace.
    pub fn step(&mut self, direction: Direction) {
        self.pause();
        let target = direction.apply(self.index).min(self.last_index());
        self.move_to(target);
    }

    pub fn step_forward(&mut self) {
        self.step(Direction::Forward);
    }

    pub fn step_backward(&mut self) {
        self.step(Direction::Backward);
    }

    /// Jump to `floor(target)` clamped to the trace, keeping autoplay running
    /// if it was running before the call.
    pub fn seek(&mut self, target: f64) {
        let was_playing = self.playing;
        self.pause();
        let index = clamp_index(target, self.events.len());
        self.move_to(index);
        if was_playing {
            self.play();
        }
    }

    /// Pause and jump forward to the next event that fills a table cell
    /// (`SetValue` or a cell-directed `Transfer`). Stays put if none is left.
    ///
    /// Returns whether the cursor moved.
    pub fn skip_to_next_fill(&mut self) -> bool {
        self.pause();
        let next = self
            .events
            .iter()
            .enumerate()
            .skip(self.index + 1)
            .find(|(_, e)| e.fills_cell())
            .map(|(k, _)| k);
        match next {
            Some(k) => {
                self.move_to(k);
                true
            }
            None => false,
        }
    }

    /// Change the autoplay speed. Non-finite or non-positive values are ignored.
    ///
    /// Returns whether the speed was accepted.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !(speed.is_finite() && speed > 0.0) {
            #[cfg(feature = "tracing")]
            tracing::warn!(speed, "ignoring invalid playback speed");
            return false;
        }
        self.speed = speed;
        self.elapsed = Duration::ZERO;
        true
    }

    /// Feed `elapsed` time to autoplay.
    ///
    /// Advances by at most one event per tick once the accumulated time
    /// reaches [`interval`](Self::interval); any overshoot is dropped. Reaching
    /// the last event pauses playback. Returns whether the cursor moved.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.playing {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed < self.interval() {
            return false;
        }
        self.elapsed = Duration::ZERO;

        let last = self.last_index();
        let next = (self.index + 1).min(last);
        let moved = next != self.index;
        self.move_to(next);
        if next == last {
            self.playing = false;
            #[cfg(feature = "tracing")]
            tracing::debug!(index = next, "playback reached the end");
        }
        moved
    }
}
