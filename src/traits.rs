//! Core trait for LCS trace generators.
//!
//! A generator turns an input pair into the full, ordered event trace of one
//! solving strategy. Implementations must be:
//! - deterministic: the same `(x, y)` always yields an identical trace,
//! - total: every pair of finite strings (empty ones included) produces a
//!   terminating, well-formed trace starting with [`Event::Init`],
//! - self-describing: the trace carries enough structure (dependencies,
//!   parents, transfer endpoints) to rebuild every view from a prefix.
//!
//! Characters are compared as Unicode scalar values with exact,
//! case-sensitive equality.

use crate::events::Event;
use crate::generators::Mode;

/// Trait for a strategy that explains LCS as a stream of events.
pub trait TraceGenerator {
    /// Which teaching mode this generator implements.
    fn mode(&self) -> Mode;

    /// Produce the complete trace for `x` against `y`.
    ///
    /// The event count grows with `len(x) * len(y)`; callers are expected to
    /// bound input length (see [`crate::input`]).
    fn generate(&self, x: &str, y: &str) -> Vec<Event>;
}
