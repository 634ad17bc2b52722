//! Event vocabulary shared by the generators, the playback cursor and every
//! consumer that derives view state from a trace.
//!
//! A trace is a plain `Vec<Event>`. It always starts with [`Event::Init`]
//! and is never mutated after generation; consumers recover grid, call-tree
//! and backtracking state by scanning a prefix of it.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A DP coordinate: `i` indexes into `x` (rows), `j` into `y` (columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub i: usize,
    pub j: usize,
}

impl Coord {
    #[inline]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Row 0 and column 0 hold the empty-prefix subproblems.
    #[inline]
    pub const fn is_base(self) -> bool {
        self.i == 0 || self.j == 0
    }

    /// Anti-diagonal rank; every dependency of a cell has a strictly smaller rank.
    #[inline]
    pub const fn rank(self) -> usize {
        self.i + self.j
    }
}

impl From<(usize, usize)> for Coord {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

/// Whether a transfer endpoint is a table cell or a recursion-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EndpointKind {
    Cell,
    Node,
}

/// One end of a [`Event::Transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub i: usize,
    pub j: usize,
}

impl Endpoint {
    pub const fn cell(i: usize, j: usize) -> Self {
        Self {
            kind: EndpointKind::Cell,
            i,
            j,
        }
    }

    pub const fn node(i: usize, j: usize) -> Self {
        Self {
            kind: EndpointKind::Node,
            i,
            j,
        }
    }

    #[inline]
    pub const fn coord(self) -> Coord {
        Coord::new(self.i, self.j)
    }

    #[inline]
    pub fn is_cell(self) -> bool {
        self.kind == EndpointKind::Cell
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            EndpointKind::Cell => "cell",
            EndpointKind::Node => "node",
        };
        write!(f, "{tag}({},{})", self.i, self.j)
    }
}

/// Lines of the memoized reference program shown next to the visualization.
///
/// The discriminant is the 0-based line number in [`PROGRAM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CodeLine {
    Entry = 0,
    MemoHit = 1,
    Base = 2,
    MatchIf = 3,
    MatchSet = 4,
    Else = 5,
    ElseSet = 6,
    Return = 7,
}

/// The reference program, one entry per [`CodeLine`].
pub const PROGRAM: [&str; 8] = [
    "function LCS(X, Y, i, j):",
    "    if memo[i][j] != -1: return memo[i][j]",
    "    if i == 0 or j == 0: return 0",
    "    if X[i-1] == Y[j-1]:",
    "        memo[i][j] = 1 + LCS(X, Y, i-1, j-1)",
    "    else:",
    "        memo[i][j] = max(LCS(X, Y, i-1, j), LCS(X, Y, i, j-1))",
    "    return memo[i][j]",
];

impl CodeLine {
    pub const ALL: [CodeLine; 8] = [
        CodeLine::Entry,
        CodeLine::MemoHit,
        CodeLine::Base,
        CodeLine::MatchIf,
        CodeLine::MatchSet,
        CodeLine::Else,
        CodeLine::ElseSet,
        CodeLine::Return,
    ];

    #[inline]
    pub const fn number(self) -> usize {
        self as usize
    }

    pub const fn text(self) -> &'static str {
        PROGRAM[self as usize]
    }

    pub fn from_number(line: usize) -> Option<Self> {
        Self::ALL.get(line).copied()
    }
}

/// Discriminant of an [`Event`], handy for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Init,
    Code,
    ComputeHighlight,
    SetValue,
    Transfer,
    CallStart,
    CallEnd,
    MemoHit,
}

impl EventKind {
    pub const fn label(self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Code => "code",
            EventKind::ComputeHighlight => "compute",
            EventKind::SetValue => "set",
            EventKind::Transfer => "transfer",
            EventKind::CallStart => "call_start",
            EventKind::CallEnd => "call_end",
            EventKind::MemoHit => "memo_hit",
        }
    }
}

/// A single micro-step of an LCS solver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Event {
    /// Declares the inputs. Always the first event of a trace.
    Init { x: String, y: String },
    /// Highlights a line of the reference program. Carries no algorithmic state.
    Code { line: CodeLine },
    /// Cell `(i,j)` is under consideration; `deps` narrows over successive
    /// events for the same cell (none, then candidates, then the winner).
    ComputeHighlight { i: usize, j: usize, deps: Vec<Coord> },
    /// Commits a tabulated value.
    SetValue { i: usize, j: usize, value: u32 },
    /// A value moving between cells and/or recursion nodes.
    Transfer {
        from: Endpoint,
        to: Endpoint,
        value: u32,
    },
    /// A recursive invocation for `(i,j)` begins.
    CallStart {
        i: usize,
        j: usize,
        parent: Option<Coord>,
    },
    /// The invocation for `(i,j)` returns `value`.
    CallEnd { i: usize, j: usize, value: u32 },
    /// `(i,j)` was already resolved and is served from the memo table.
    MemoHit { i: usize, j: usize, value: u32 },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Init { .. } => EventKind::Init,
            Event::Code { .. } => EventKind::Code,
            Event::ComputeHighlight { .. } => EventKind::ComputeHighlight,
            Event::SetValue { .. } => EventKind::SetValue,
            Event::Transfer { .. } => EventKind::Transfer,
            Event::CallStart { .. } => EventKind::CallStart,
            Event::CallEnd { .. } => EventKind::CallEnd,
            Event::MemoHit { .. } => EventKind::MemoHit,
        }
    }

    /// The coordinate an event is "about", if any. Transfers report their destination.
    pub fn coord(&self) -> Option<Coord> {
        match *self {
            Event::Init { .. } | Event::Code { .. } => None,
            Event::ComputeHighlight { i, j, .. }
            | Event::SetValue { i, j, .. }
            | Event::CallStart { i, j, .. }
            | Event::CallEnd { i, j, .. }
            | Event::MemoHit { i, j, .. } => Some(Coord::new(i, j)),
            Event::Transfer { to, .. } => Some(to.coord()),
        }
    }

    /// True for events that put a value into the table: `SetValue` and
    /// transfers whose destination is a cell.
    pub fn fills_cell(&self) -> bool {
        match self {
            Event::SetValue { .. } => true,
            Event::Transfer { to, .. } => to.is_cell(),
            _ => false,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Init { x, y } => write!(f, "init x={x:?} y={y:?}"),
            Event::Code { line } => write!(f, "code line {}: {}", line.number(), line.text().trim()),
            Event::ComputeHighlight { i, j, deps } => {
                write!(f, "compute ({i},{j}) deps=[")?;
                for (k, d) in deps.iter().enumerate() {
                    if k > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{d}")?;
                }
                f.write_str("]")
            }
            Event::SetValue { i, j, value } => write!(f, "set ({i},{j}) = {value}"),
            Event::Transfer { from, to, value } => write!(f, "transfer {from} -> {to} value={value}"),
            Event::CallStart { i, j, parent } => match parent {
                Some(p) => write!(f, "call ({i},{j}) from {p}"),
                None => write!(f, "call ({i},{j})"),
            },
            Event::CallEnd { i, j, value } => write!(f, "return ({i},{j}) = {value}"),
            Event::MemoHit { i, j, value } => write!(f, "memo hit ({i},{j}) = {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_lines_match_code_numbers() {
        for line in CodeLine::ALL {
            assert_eq!(CodeLine::from_number(line.number()), Some(line));
            assert_eq!(line.text(), PROGRAM[line.number()]);
        }
        assert_eq!(CodeLine::from_number(8), None);
        assert!(CodeLine::MemoHit.text().contains("memo[i][j] != -1"));
        assert!(CodeLine::Base.text().contains("i == 0"));
    }

    #[test]
    fn fills_cell_only_for_cell_destinations() {
        assert!(Event::SetValue { i: 1, j: 1, value: 1 }.fills_cell());
        let to_cell = Event::Transfer {
            from: Endpoint::node(1, 1),
            to: Endpoint::cell(1, 1),
            value: 1,
        };
        let to_node = Event::Transfer {
            from: Endpoint::cell(1, 1),
            to: Endpoint::node(2, 1),
            value: 1,
        };
        assert!(to_cell.fills_cell());
        assert!(!to_node.fills_cell());
        assert!(!Event::CallEnd { i: 1, j: 1, value: 1 }.fills_cell());
    }

    #[test]
    fn transfer_coord_is_destination() {
        let e = Event::Transfer {
            from: Endpoint::cell(0, 0),
            to: Endpoint::node(3, 2),
            value: 0,
        };
        assert_eq!(e.coord(), Some(Coord::new(3, 2)));
        assert_eq!(e.kind(), EventKind::Transfer);
        assert_eq!(Event::Code { line: CodeLine::Entry }.coord(), None);
    }

    #[test]
    fn display_is_compact() {
        let e = Event::CallStart {
            i: 1,
            j: 2,
            parent: Some(Coord::new(2, 2)),
        };
        assert_eq!(e.to_string(), "call (1,2) from (2,2)");
        let e = Event::ComputeHighlight {
            i: 2,
            j: 2,
            deps: vec![Coord::new(1, 2), Coord::new(2, 1)],
        };
        assert_eq!(e.to_string(), "compute (2,2) deps=[(1,2) (2,1)]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_snake_case_tags() {
        let e = Event::MemoHit { i: 1, j: 0, value: 0 };
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"type":"memo_hit","i":1,"j":0,"value":0}"#);
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
