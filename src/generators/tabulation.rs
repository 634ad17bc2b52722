//! Bottom-up tabulation trace.
//!
//! Cells are filled in row-major order over `1..=n` x `1..=m`. Row 0 and
//! column 0 are implicitly zero and produce no events. Each interior cell
//! is explained in stages so a renderer can show the comparison, the
//! candidate neighbours, the chosen neighbour, the value travelling into
//! the cell and finally the committed value:
//!
//! - match: highlight, highlight diagonal, transfer, set, `MatchIf`, `Return`
//! - mismatch: highlight, highlight both, highlight winner, transfer, set,
//!   `Else`, `Return`
//!
//! On a tie the neighbour above, `(i-1, j)`, wins. Backtracking uses the same
//! rule, so the trace and the reconstructed subsequence agree.

use crate::events::{CodeLine, Coord, Endpoint, Event};
use crate::generators::Mode;
use crate::traits::TraceGenerator;

/// Tabulation (grid fill) generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tabulation;

impl TraceGenerator for Tabulation {
    fn mode(&self) -> Mode {
        Mode::Tabulation
    }

    fn generate(&self, x: &str, y: &str) -> Vec<Event> {
        generate(x, y)
    }
}

/// Number of events a tabulation trace of the given shape holds.
///
/// One `Init`, six events per matching cell and seven per mismatching cell.
pub fn expected_len(x: &str, y: &str) -> usize {
    let xs: Vec<char> = x.chars().collect();
    let ys: Vec<char> = y.chars().collect();
    let mut total = 1;
    for cx in &xs {
        for cy in &ys {
            total += if cx == cy { 6 } else { 7 };
        }
    }
    total
}

/// Generate the tabulation trace for `x` against `y`.
pub fn generate(x: &str, y: &str) -> Vec<Event> {
    let xs: Vec<char> = x.chars().collect();
    let ys: Vec<char> = y.chars().collect();
    let n = xs.len();
    let m = ys.len();

    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!("tabulate", n, m);
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let mut events = Vec::with_capacity(expected_len(x, y));
    events.push(Event::Init {
        x: x.to_owned(),
        y: y.to_owned(),
    });

    // Base row/column stay zero; only interior cells are traced.
    let mut dp = vec![vec![0u32; m + 1]; n + 1];

    for i in 1..=n {
        for j in 1..=m {
            events.push(Event::ComputeHighlight { i, j, deps: Vec::new() });

            if xs[i - 1] == ys[j - 1] {
                let value = dp[i - 1][j - 1] + 1;
                events.push(Event::ComputeHighlight {
                    i,
                    j,
                    deps: vec![Coord::new(i - 1, j - 1)],
                });
                events.push(Event::Transfer {
                    from: Endpoint::cell(i - 1, j - 1),
                    to: Endpoint::cell(i, j),
                    value,
                });
                dp[i][j] = value;
                events.push(Event::SetValue { i, j, value });
                events.push(Event::Code {
                    line: CodeLine::MatchIf,
                });
            } else {
                let above = dp[i - 1][j];
                let left = dp[i][j - 1];
                events.push(Event::ComputeHighlight {
                    i,
                    j,
                    deps: vec![Coord::new(i - 1, j), Coord::new(i, j - 1)],
                });
                let (winner, value) = if above >= left {
                    (Coord::new(i - 1, j), above)
                } else {
                    (Coord::new(i, j - 1), left)
                };
                events.push(Event::ComputeHighlight {
                    i,
                    j,
                    deps: vec![winner],
                });
                events.push(Event::Transfer {
                    from: Endpoint::cell(winner.i, winner.j),
                    to: Endpoint::cell(i, j),
                    value,
                });
                dp[i][j] = value;
                events.push(Event::SetValue { i, j, value });
                events.push(Event::Code { line: CodeLine::Else });
            }

            events.push(Event::Code {
                line: CodeLine::Return,
            });
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(events = events.len(), lcs = dp[n][m], "tabulation trace generated");

    events
}
