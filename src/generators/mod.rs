//! Trace generators, one per teaching mode.
//!
//! - [`tabulation`] : bottom-up grid fill, one `SetValue` per interior cell.
//! - [`memo`]       : top-down recursion with a memo table, simulated on an
//!   explicit frame stack.
//!
//! Both implement [`TraceGenerator`](crate::traits::TraceGenerator) and are
//! pure functions of their input pair.

pub mod memo;
pub mod tabulation;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::join;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::traits::TraceGenerator;

pub use memo::Memoized;
pub use tabulation::Tabulation;

/// Teaching mode: which strategy explains the LCS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Bottom-up DP table fill.
    #[default]
    Tabulation,
    /// Top-down recursion with memo hits.
    Memoized,
}

impl Mode {
    pub fn generator(self) -> &'static dyn TraceGenerator {
        match self {
            Mode::Tabulation => &Tabulation,
            Mode::Memoized => &Memoized,
        }
    }

    /// Generate the trace for this mode.
    pub fn generate(self, x: &str, y: &str) -> Vec<Event> {
        self.generator().generate(x, y)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Tabulation => "tabulation",
            Mode::Memoized => "memo",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown [`Mode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}' (expected 'tabulation' or 'memo')")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tabulation" | "dp" | "table" => Ok(Mode::Tabulation),
            "memo" | "memoized" | "recursion" => Ok(Mode::Memoized),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

/// Traces for both modes of the same input pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePair {
    pub tabulation: Vec<Event>,
    pub memoized: Vec<Event>,
}

impl TracePair {
    pub fn get(&self, mode: Mode) -> &[Event] {
        match mode {
            Mode::Tabulation => &self.tabulation,
            Mode::Memoized => &self.memoized,
        }
    }
}

/// Generate both traces, concurrently when the `parallel` feature is enabled.
#[cfg(feature = "parallel")]
pub fn generate_both(x: &str, y: &str) -> TracePair {
    let (tabulation, memoized) = join(|| tabulation::generate(x, y), || memo::generate(x, y));
    TracePair {
        tabulation,
        memoized,
    }
}

/// Generate both traces (serial execution).
#[cfg(not(feature = "parallel"))]
pub fn generate_both(x: &str, y: &str) -> TracePair {
    TracePair {
        tabulation: tabulation::generate(x, y),
        memoized: memo::generate(x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_labels() {
        for mode in [Mode::Tabulation, Mode::Memoized] {
            assert_eq!(mode.label().parse::<Mode>(), Ok(mode));
            assert_eq!(mode.generator().mode(), mode);
        }
        assert_eq!("DP".parse::<Mode>(), Ok(Mode::Tabulation));
        assert_eq!(
            "greedy".parse::<Mode>(),
            Err(ParseModeError("greedy".to_owned()))
        );
    }

    #[test]
    fn generate_both_matches_individual_runs() {
        let pair = generate_both("ABC", "BDC");
        assert_eq!(pair.get(Mode::Tabulation), tabulation::generate("ABC", "BDC").as_slice());
        assert_eq!(pair.get(Mode::Memoized), memo::generate("ABC", "BDC").as_slice());
    }
}
