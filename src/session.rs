//! Owned visualization context.
//!
//! A [`Session`] bundles what a front end would otherwise keep as ambient
//! state: the selected mode, the input limits and the playback cursor. It is
//! created once and passed by reference; every `visualize` replaces the
//! trace and resets the cursor.

use std::time::Duration;

use crate::builder::SessionBuilder;
use crate::events::Event;
use crate::generators::Mode;
use crate::input::{InputError, InputLimits};
use crate::playback::Playback;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    limits: InputLimits,
    playback: Playback,
    autoplay: bool,
}

impl Default for Session {
    fn default() -> Self {
        SessionBuilder::new().build()
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub(crate) fn from_parts(mode: Mode, limits: InputLimits, playback: Playback, autoplay: bool) -> Self {
        Self {
            mode,
            limits,
            playback,
            autoplay,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Select the mode used by the next [`visualize`](Self::visualize).
    /// The loaded trace is left untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn limits(&self) -> InputLimits {
        self.limits
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn events(&self) -> &[Event] {
        self.playback.events()
    }

    /// Validate the pair, generate its trace for the current mode and load it.
    ///
    /// Starts playback when the session was built with autoplay. Returns the
    /// number of events loaded.
    ///
    /// # Errors
    /// Returns the [`InputError`] from the configured limits; the previous
    /// trace stays loaded in that case.
    pub fn visualize(&mut self, x: &str, y: &str) -> Result<usize, InputError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("visualize", mode = %self.mode);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        if let Err(err) = self.limits.check(x, y) {
            #[cfg(feature = "tracing")]
            tracing::warn!(%err, "input rejected");
            return Err(err);
        }
        let events = self.mode.generate(x, y);
        let len = events.len();
        self.playback.load(events);
        if self.autoplay {
            self.playback.play();
        }
        Ok(len)
    }

    /// Advance autoplay by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.playback.tick(elapsed)
    }

    /// Derived view state at the cursor.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::at(self.playback.events(), self.playback.index())
    }
}
