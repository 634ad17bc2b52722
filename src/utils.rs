//! Assorted playback helpers.

use std::time::Duration;

/// Autoplay interval at speed 1.0.
pub const BASE_INTERVAL: Duration = Duration::from_millis(600);
/// Slowest speed honoured by autoplay.
pub const MIN_SPEED: f64 = 0.25;
/// Fastest speed honoured by autoplay.
pub const MAX_SPEED: f64 = 4.0;

/// Time between autoplay advances at `speed`.
///
/// The speed is clamped to `[MIN_SPEED, MAX_SPEED]`, so the interval ranges
/// from 150 ms to 2.4 s.
#[inline]
pub fn autoplay_interval(speed: f64) -> Duration {
    let nanos = BASE_INTERVAL.as_nanos() as f64 / speed.clamp(MIN_SPEED, MAX_SPEED);
    Duration::from_nanos(nanos.round() as u64)
}

/// Clamp a signed, possibly fractional position onto `[0, len-1]`.
///
/// Returns 0 for an empty trace and for NaN.
#[inline]
pub fn clamp_index(target: f64, len: usize) -> usize {
    if len == 0 || target.is_nan() {
        return 0;
    }
    let last = (len - 1) as f64;
    target.floor().clamp(0.0, last) as usize
}
