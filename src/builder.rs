use crate::generators::Mode;
use crate::input::InputLimits;
use crate::playback::Playback;
use crate::session::Session;

pub struct SessionBuilder {
    mode: Mode,
    speed: Option<f64>,
    limits: InputLimits,
    autoplay: bool,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            speed: None,
            limits: InputLimits::default(),
            autoplay: true,
        }
    }
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }
    /// # Panics
    /// Panics if `max_len == 0`.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be positive");
        self.limits.max_len = max_len;
        self
    }
    /// Start playing right after each successful `visualize`.
    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }
    /// An invalid configured speed leaves playback at 1.0.
    pub fn build(self) -> Session {
        let playback = match self.speed {
            Some(s) => Playback::with_speed(s),
            None => Playback::new(),
        };
        Session::from_parts(self.mode, self.limits, playback, self.autoplay)
    }
}
