//! Top-down memoized recursion trace.
//!
//! The recursion is simulated with an explicit frame stack rather than host
//! calls, so arbitrarily deep inputs never touch the native stack and every
//! step of the call tree surfaces as an event. A frame that needs its
//! children re-enters the stack with an advanced [`Stage`] underneath them,
//! and picks up again once they are resolved.
//!
//! Per popped frame at [`Stage::Enter`]:
//! 1. `Code(Entry)`.
//! 2. Memo already set: `Code(MemoHit)`, `MemoHit`, and a transfer from the
//!    cached cell to the caller's node (to the frame's own node at the root).
//!    This check runs before the base-case check, so a base subproblem met a
//!    second time is a memo hit.
//! 3. Base case: `Code(Base)`, `CallStart`, `CallEnd(0)`, node to cell transfer.
//! 4. Otherwise `CallStart`, then `Code(MatchIf)` with one child `(i-1,j-1)`,
//!    or `Code(Else)` with children `(i-1,j)` then `(i,j-1)`.
//!
//! Resumed frames read their children's memo entries and emit `CallEnd`
//! followed by the node to cell transfer that caches the result.

use crate::events::{CodeLine, Coord, Endpoint, Event};
use crate::generators::Mode;
use crate::traits::TraceGenerator;

/// Memoized-recursion (call tree) generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Memoized;

impl TraceGenerator for Memoized {
    fn mode(&self) -> Mode {
        Mode::Memoized
    }

    fn generate(&self, x: &str, y: &str) -> Vec<Event> {
        generate(x, y)
    }
}

/// Resumption point of a simulated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// First time the frame is popped.
    Enter,
    /// The diagonal child has been resolved.
    AfterMatch,
    /// Both the `(i-1,j)` and `(i,j-1)` children have been resolved.
    AfterElse,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    at: Coord,
    /// The invocation that scheduled this frame; `None` for the root call.
    caller: Option<Coord>,
    stage: Stage,
}

impl Frame {
    fn root(at: Coord) -> Self {
        Self {
            at,
            caller: None,
            stage: Stage::Enter,
        }
    }

    fn child(at: Coord, caller: Coord) -> Self {
        Self {
            at,
            caller: Some(caller),
            stage: Stage::Enter,
        }
    }

    fn resume(self, stage: Stage) -> Self {
        Self { stage, ..self }
    }
}

/// Memo table over `(n+1) x (m+1)` coordinates.
struct Memo {
    cols: usize,
    values: Vec<Option<u32>>,
}

impl Memo {
    fn new(n: usize, m: usize) -> Self {
        Self {
            cols: m + 1,
            values: vec![None; (n + 1) * (m + 1)],
        }
    }

    #[inline]
    fn get(&self, at: Coord) -> Option<u32> {
        self.values[at.i * self.cols + at.j]
    }

    #[inline]
    fn set(&mut self, at: Coord, value: u32) {
        self.values[at.i * self.cols + at.j] = Some(value);
    }

    /// Value of a child that the stack discipline guarantees is resolved.
    fn resolved(&self, at: Coord) -> u32 {
        let value = self.get(at);
        debug_assert!(value.is_some(), "child {at} resumed before it was resolved");
        value.unwrap_or_default()
    }
}

/// Generate the memoized-recursion trace for `x` against `y`.
pub fn generate(x: &str, y: &str) -> Vec<Event> {
    let xs: Vec<char> = x.chars().collect();
    let ys: Vec<char> = y.chars().collect();
    let n = xs.len();
    let m = ys.len();

    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!("memoize", n, m);
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let mut events = vec![Event::Init {
        x: x.to_owned(),
        y: y.to_owned(),
    }];
    let mut memo = Memo::new(n, m);
    let mut stack = vec![Frame::root(Coord::new(n, m))];
    #[cfg(feature = "tracing")]
    let mut max_depth = stack.len();

    while let Some(frame) = stack.pop() {
        let Coord { i, j } = frame.at;
        match frame.stage {
            Stage::Enter => {
                events.push(Event::Code {
                    line: CodeLine::Entry,
                });

                if let Some(value) = memo.get(frame.at) {
                    let to = frame.caller.unwrap_or(frame.at);
                    events.push(Event::Code {
                        line: CodeLine::MemoHit,
                    });
                    events.push(Event::MemoHit { i, j, value });
                    events.push(Event::Transfer {
                        from: Endpoint::cell(i, j),
                        to: Endpoint::node(to.i, to.j),
                        value,
                    });
                    continue;
                }

                if frame.at.is_base() {
                    events.push(Event::Code {
                        line: CodeLine::Base,
                    });
                    events.push(Event::CallStart {
                        i,
                        j,
                        parent: frame.caller,
                    });
                    events.push(Event::CallEnd { i, j, value: 0 });
                    events.push(Event::Transfer {
                        from: Endpoint::node(i, j),
                        to: Endpoint::cell(i, j),
                        value: 0,
                    });
                    memo.set(frame.at, 0);
                    continue;
                }

                events.push(Event::CallStart {
                    i,
                    j,
                    parent: frame.caller,
                });
                if xs[i - 1] == ys[j - 1] {
                    events.push(Event::Code {
                        line: CodeLine::MatchIf,
                    });
                    stack.push(frame.resume(Stage::AfterMatch));
                    stack.push(Frame::child(Coord::new(i - 1, j - 1), frame.at));
                } else {
                    events.push(Event::Code { line: CodeLine::Else });
                    stack.push(frame.resume(Stage::AfterElse));
                    // LIFO: (i-1, j) is pushed last so it is explored first.
                    stack.push(Frame::child(Coord::new(i, j - 1), frame.at));
                    stack.push(Frame::child(Coord::new(i - 1, j), frame.at));
                }
                #[cfg(feature = "tracing")]
                {
                    max_depth = max_depth.max(stack.len());
                }
            }
            Stage::AfterMatch => {
                let value = memo.resolved(Coord::new(i - 1, j - 1)) + 1;
                finish(&mut events, &mut memo, frame.at, value);
            }
            Stage::AfterElse => {
                let first = memo.resolved(Coord::new(i - 1, j));
                let second = memo.resolved(Coord::new(i, j - 1));
                finish(&mut events, &mut memo, frame.at, first.max(second));
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        events = events.len(),
        max_depth,
        lcs = memo.get(Coord::new(n, m)).unwrap_or_default(),
        "memoized trace generated"
    );

    events
}

fn finish(events: &mut Vec<Event>, memo: &mut Memo, at: Coord, value: u32) {
    memo.set(at, value);
    events.push(Event::CallEnd {
        i: at.i,
        j: at.j,
        value,
    });
    events.push(Event::Transfer {
        from: Endpoint::node(at.i, at.j),
        to: Endpoint::cell(at.i, at.j),
        value,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn call_starts(events: &[Event]) -> Vec<(Coord, Option<Coord>)> {
        events
            .iter()
            .filter_map(|e| match *e {
                Event::CallStart { i, j, parent } => Some((Coord::new(i, j), parent)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn both_empty_is_a_single_base_call() {
        let events = generate("", "");
        assert_eq!(
            events,
            vec![
                Event::Init {
                    x: String::new(),
                    y: String::new()
                },
                Event::Code {
                    line: CodeLine::Entry
                },
                Event::Code {
                    line: CodeLine::Base
                },
                Event::CallStart {
                    i: 0,
                    j: 0,
                    parent: None
                },
                Event::CallEnd { i: 0, j: 0, value: 0 },
                Event::Transfer {
                    from: Endpoint::node(0, 0),
                    to: Endpoint::cell(0, 0),
                    value: 0
                },
            ]
        );
    }

    #[test]
    fn single_match_descends_diagonally() {
        let events = generate("A", "A");
        assert_eq!(
            call_starts(&events),
            vec![
                (Coord::new(1, 1), None),
                (Coord::new(0, 0), Some(Coord::new(1, 1)))
            ]
        );
        assert_eq!(
            events.last(),
            Some(&Event::Transfer {
                from: Endpoint::node(1, 1),
                to: Endpoint::cell(1, 1),
                value: 1
            })
        );
    }

    #[test]
    fn mismatch_visits_previous_row_first() {
        let events = generate("A", "B");
        assert_eq!(
            call_starts(&events),
            vec![
                (Coord::new(1, 1), None),
                (Coord::new(0, 1), Some(Coord::new(1, 1))),
                (Coord::new(1, 0), Some(Coord::new(1, 1))),
            ]
        );
    }

    #[test]
    fn revisited_base_case_is_a_memo_hit() {
        // (1,1) resolves (1,0) while exploring the (1,2) branch; the match at
        // (2,1) then asks for (1,0) again.
        let events = generate("AB", "BC");
        let hits: Vec<Coord> = events
            .iter()
            .filter_map(|e| match *e {
                Event::MemoHit { i, j, .. } => Some(Coord::new(i, j)),
                _ => None,
            })
            .collect();
        assert!(hits.iter().any(|c| c.is_base()), "expected a base memo hit, got {hits:?}");
        let mut starts: HashMap<Coord, usize> = HashMap::new();
        for (c, _) in call_starts(&events) {
            *starts.entry(c).or_default() += 1;
        }
        assert!(starts.values().all(|&count| count == 1));
    }

    #[test]
    fn memo_hit_is_preceded_by_code_and_followed_by_transfer_to_caller() {
        let events = generate("AB", "BC");
        let pos = events
            .iter()
            .position(|e| matches!(e, Event::MemoHit { .. }))
            .unwrap();
        assert_eq!(events[pos - 1], Event::Code { line: CodeLine::MemoHit });
        assert_eq!(events[pos - 2], Event::Code { line: CodeLine::Entry });
        match (&events[pos], &events[pos + 1]) {
            (Event::MemoHit { i, j, value }, Event::Transfer { from, to, value: v }) => {
                assert_eq!(*from, Endpoint::cell(*i, *j));
                assert_eq!(to.kind, crate::events::EndpointKind::Node);
                assert_eq!(v, value);
            }
            other => panic!("unexpected pair {other:?}"),
        }
    }

    #[test]
    fn deep_inputs_do_not_recurse_natively() {
        let x = "AB".repeat(100);
        let y = "BA".repeat(100);
        let events = generate(&x, &y);
        let last_end = events
            .iter()
            .rev()
            .find_map(|e| match *e {
                Event::CallEnd { i, j, value } if i == 200 && j == 200 => Some(value),
                _ => None,
            });
        assert_eq!(last_end, Some(199));
    }
}
