//! Step-by-step traces of the Longest Common Subsequence dynamic program.
//!
//! This crate turns an input pair into a deterministic, replayable sequence
//! of [`Event`]s describing every micro-step of an LCS solver, and provides a
//! playback cursor to walk through it. It is the engine behind a teaching
//! visualizer: renderers never run the algorithm themselves, they derive the
//! table, the recursion tree and the final subsequence from a prefix of the
//! trace.
//!
//! ## Modes
//! - [`Mode::Tabulation`]: bottom-up grid fill in row-major order, with staged
//!   highlights (compare, candidates, winner) before each committed value.
//! - [`Mode::Memoized`]: top-down recursion with a memo table, simulated on an
//!   explicit frame stack. Each subproblem is called at most once; later
//!   references are reported as memo hits.
//!
//! ## Quick start
//! ```
//! use lcs_trace::{Mode, Playback, Snapshot};
//!
//! let events = Mode::Tabulation.generate("ABC", "BDC");
//! let mut playback = Playback::new();
//! playback.load(events);
//! playback.seek(f64::INFINITY);
//!
//! let snap = Snapshot::at(playback.events(), playback.index());
//! assert_eq!(snap.lcs_length, Some(2));
//! assert_eq!(snap.backtrack.unwrap().sequence, "BC");
//! ```
//!
//! ## Sessions
//! [`Session`] bundles a mode, input limits and a cursor into one owned
//! context, which is what an interactive front end holds on to:
//! ```
//! use std::time::Duration;
//! use lcs_trace::{Mode, Session};
//!
//! let mut session = Session::builder().with_mode(Mode::Memoized).build();
//! session.visualize("AB", "AB").unwrap();
//! while session.playback().is_playing() {
//!     session.tick(Duration::from_millis(16));
//! }
//! assert_eq!(session.snapshot().lcs_length, Some(2));
//! ```

pub mod builder;
pub mod events;
pub mod generators;
pub mod input;
pub mod playback;
pub mod session;
pub mod snapshot;
pub mod traits;
pub mod utils;

pub use crate::builder::SessionBuilder;
pub use crate::events::{CodeLine, Coord, Endpoint, EndpointKind, Event, EventKind};
pub use crate::generators::{generate_both, Mode, TracePair};
pub use crate::input::{InputError, InputLimits};
pub use crate::playback::{Direction, Playback, PlaybackState};
pub use crate::session::Session;
pub use crate::snapshot::Snapshot;
pub use crate::traits::TraceGenerator;
