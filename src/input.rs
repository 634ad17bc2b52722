//! Caller-side input bounds.
//!
//! Generators accept any pair of strings, but trace length and the simulated
//! call depth grow with `len(x) * len(y)`, so an interactive front end keeps
//! inputs short. Lengths are counted in characters, not bytes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default per-input character limit for interactive use.
pub const DEFAULT_MAX_LEN: usize = 6;

/// Which of the two inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::X => "X",
            Side::Y => "Y",
        })
    }
}

/// Rejected input pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// One input exceeds the configured character limit.
    #[error("input {side} has {len} characters; at most {max} allowed")]
    TooLong { side: Side, len: usize, max: usize },

    /// Both inputs are empty.
    #[error("at least one input must be non-empty")]
    BothEmpty,
}

/// Bounds applied before a trace is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputLimits {
    /// Maximum characters per input.
    pub max_len: usize,
    /// Accept `("", "")`.
    pub allow_both_empty: bool,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            allow_both_empty: false,
        }
    }
}

impl InputLimits {
    /// No length bound; only for batch use, interactive traces get very long.
    pub const fn unbounded() -> Self {
        Self {
            max_len: usize::MAX,
            allow_both_empty: true,
        }
    }

    /// Check an input pair against these limits.
    ///
    /// # Errors
    /// [`InputError::TooLong`] naming the first offending side, or
    /// [`InputError::BothEmpty`] when both are empty and that is not allowed.
    pub fn check(&self, x: &str, y: &str) -> Result<(), InputError> {
        for (side, s) in [(Side::X, x), (Side::Y, y)] {
            let len = s.chars().count();
            if len > self.max_len {
                return Err(InputError::TooLong {
                    side,
                    len,
                    max: self.max_len,
                });
            }
        }
        if !self.allow_both_empty && x.is_empty() && y.is_empty() {
            return Err(InputError::BothEmpty);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_accept_short_pairs() {
        let limits = InputLimits::default();
        assert_eq!(limits.check("ABC", "BDC"), Ok(()));
        assert_eq!(limits.check("", "XYZ"), Ok(()));
        assert_eq!(limits.check("ABCDEF", "ABCDEF"), Ok(()));
    }

    #[test]
    fn too_long_reports_side_and_char_count() {
        let limits = InputLimits::default();
        assert_eq!(
            limits.check("ABC", "ABCDEFG"),
            Err(InputError::TooLong {
                side: Side::Y,
                len: 7,
                max: 6
            })
        );
        // Six characters, twelve bytes.
        assert_eq!(limits.check("éééééé", "A"), Ok(()));
    }

    #[test]
    fn both_empty_rejected_unless_allowed() {
        assert_eq!(InputLimits::default().check("", ""), Err(InputError::BothEmpty));
        assert_eq!(InputLimits::unbounded().check("", ""), Ok(()));
    }

    #[test]
    fn error_messages_are_readable() {
        let err = InputError::TooLong {
            side: Side::X,
            len: 9,
            max: 6,
        };
        assert_eq!(err.to_string(), "input X has 9 characters; at most 6 allowed");
    }
}
