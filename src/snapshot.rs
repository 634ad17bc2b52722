//! View state derived from a trace prefix.
//!
//! Everything a renderer shows is a pure function of `(events, index)`:
//! the table contents and highlights, the recursion tree, the highlighted
//! program line, the characters being compared, the running LCS length and,
//! once the final cell is reached, the backtracked subsequence. Each
//! derivation scans `events[..=index]` (an index past the end is clamped).

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::events::{CodeLine, Coord, Event};

/// Clamp `index` onto the trace and return the visible prefix.
pub fn visible(events: &[Event], index: usize) -> &[Event] {
    match events.len() {
        0 => &[],
        len => &events[..=index.min(len - 1)],
    }
}

/// The input pair declared by the trace's `Init` event.
pub fn inputs(events: &[Event]) -> Option<(&str, &str)> {
    events.iter().find_map(|e| match e {
        Event::Init { x, y } => Some((x.as_str(), y.as_str())),
        _ => None,
    })
}

fn dims(events: &[Event]) -> (Vec<char>, Vec<char>) {
    let (x, y) = inputs(events).unwrap_or(("", ""));
    (x.chars().collect(), y.chars().collect())
}

/// Table state at a point of the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<Option<u32>>,
    /// Interior cell currently being computed.
    pub active: Option<Coord>,
    /// Neighbours glowing as dependencies of the active cell.
    pub deps: Vec<Coord>,
    /// Cell read by the current memo hit.
    pub memo_source: Option<Coord>,
}

impl Grid {
    /// Derive the table at `index`.
    ///
    /// A cell-directed transfer fills its cell only once a later event is
    /// current; while it is the current event its value is still in flight.
    pub fn at(events: &[Event], index: usize) -> Self {
        let (xs, ys) = dims(events);
        let rows = xs.len() + 1;
        let cols = ys.len() + 1;
        let mut grid = Grid {
            rows,
            cols,
            values: vec![None; rows * cols],
            active: None,
            deps: Vec::new(),
            memo_source: None,
        };

        let prefix = visible(events, index);
        let current = prefix.len().saturating_sub(1);
        for (k, event) in prefix.iter().enumerate() {
            match event {
                Event::SetValue { i, j, value } => {
                    grid.put(Coord::new(*i, *j), *value);
                    grid.deps.clear();
                }
                Event::Transfer { to, value, .. } if to.is_cell() => {
                    if k < current {
                        grid.put(to.coord(), *value);
                    } else {
                        grid.deps.clear();
                    }
                }
                Event::ComputeHighlight { i, j, deps } => {
                    let at = Coord::new(*i, *j);
                    if !at.is_base() {
                        grid.active = Some(at);
                    }
                    grid.deps.clone_from(deps);
                }
                _ => {}
            }
        }
        if let Some(Event::MemoHit { i, j, .. }) = prefix.last() {
            grid.memo_source = Some(Coord::new(*i, *j));
        }
        grid
    }

    fn put(&mut self, at: Coord, value: u32) {
        if at.i < self.rows && at.j < self.cols {
            self.values[at.i * self.cols + at.j] = Some(value);
        }
    }

    /// Number of rows, `len(x) + 1`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, `len(y) + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shown value of a cell, `None` while blank.
    pub fn value(&self, at: Coord) -> Option<u32> {
        if at.i < self.rows && at.j < self.cols {
            self.values[at.i * self.cols + at.j]
        } else {
            None
        }
    }

    pub fn is_dep(&self, at: Coord) -> bool {
        self.deps.contains(&at)
    }

    /// Count of cells showing a value.
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Lifecycle of a recursion-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeState {
    /// Called and not yet returned.
    Active,
    /// Returned this value.
    Done(u32),
    /// Returned earlier and has since been served from the memo table.
    Memo(u32),
}

/// How a caller's children were resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemoClass {
    /// Some children were memo hits, others were real calls.
    Partial,
    /// Every child reference was a memo hit.
    Full,
}

/// A node of the recursion tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallNode {
    pub at: Coord,
    pub parent: Option<Coord>,
    pub state: NodeState,
    pub memo_class: Option<MemoClass>,
    /// Trace index of the node's `CallStart`.
    pub first_step: usize,
}

/// Recursion tree at a point of the trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallTree {
    /// Nodes in the order their calls started.
    pub nodes: Vec<CallNode>,
    /// Parent to child edges in first-seen order.
    pub edges: Vec<(Coord, Coord)>,
    /// Innermost open call.
    pub active: Option<Coord>,
}

impl CallTree {
    pub fn at(events: &[Event], index: usize) -> Self {
        let mut tree = CallTree::default();
        let mut slot: HashMap<Coord, usize> = HashMap::new();
        let mut open: Vec<Coord> = Vec::new();
        let mut had_memo: HashMap<Coord, bool> = HashMap::new();
        let mut had_call: HashMap<Coord, bool> = HashMap::new();

        for (k, event) in visible(events, index).iter().enumerate() {
            match *event {
                Event::CallStart { i, j, parent } => {
                    let at = Coord::new(i, j);
                    let parent = parent.or_else(|| open.last().copied());
                    if let Some(p) = parent {
                        had_call.insert(p, true);
                        if !tree.edges.contains(&(p, at)) {
                            tree.edges.push((p, at));
                        }
                    }
                    match slot.get(&at) {
                        Some(&s) => tree.nodes[s].state = NodeState::Active,
                        None => {
                            slot.insert(at, tree.nodes.len());
                            tree.nodes.push(CallNode {
                                at,
                                parent,
                                state: NodeState::Active,
                                memo_class: None,
                                first_step: k,
                            });
                        }
                    }
                    open.push(at);
                    tree.active = Some(at);
                }
                Event::CallEnd { i, j, value } => {
                    let at = Coord::new(i, j);
                    if let Some(&s) = slot.get(&at) {
                        let node = &mut tree.nodes[s];
                        node.state = NodeState::Done(value);
                        if had_memo.get(&at).copied().unwrap_or(false) && node.memo_class.is_none() {
                            node.memo_class = Some(if had_call.get(&at).copied().unwrap_or(false) {
                                MemoClass::Partial
                            } else {
                                MemoClass::Full
                            });
                        }
                    }
                    if open.last() == Some(&at) {
                        open.pop();
                    }
                    tree.active = open.last().copied();
                }
                Event::MemoHit { i, j, value } => {
                    let at = Coord::new(i, j);
                    if let Some(&s) = slot.get(&at) {
                        tree.nodes[s].state = NodeState::Memo(value);
                    }
                    if let Some(&caller) = open.last() {
                        had_memo.insert(caller, true);
                        tree.active = Some(caller);
                    }
                }
                _ => {}
            }
        }
        tree
    }

    pub fn node(&self, at: Coord) -> Option<&CallNode> {
        self.nodes.iter().find(|n| n.at == at)
    }

    pub fn children(&self, at: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.edges
            .iter()
            .filter(move |(p, _)| *p == at)
            .map(|&(_, c)| c)
    }

    pub fn root(&self) -> Option<&CallNode> {
        self.nodes.iter().find(|n| n.parent.is_none())
    }
}

/// Characters being compared at a point of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comparison {
    pub at: Coord,
    /// 0-based positions into `x` and `y`; `None` for base coordinates.
    pub positions: Option<(usize, usize)>,
    pub is_match: bool,
}

impl Comparison {
    /// Latest interior highlight, call or memo hit at `index`.
    pub fn at(events: &[Event], index: usize) -> Option<Self> {
        let (xs, ys) = dims(events);
        visible(events, index).iter().rev().find_map(|e| {
            let at = match *e {
                Event::ComputeHighlight { i, j, .. } if i > 0 && j > 0 => Coord::new(i, j),
                Event::CallStart { i, j, .. } | Event::MemoHit { i, j, .. } => Coord::new(i, j),
                _ => return None,
            };
            let positions = (!at.is_base()).then(|| (at.i - 1, at.j - 1));
            let is_match = positions
                .map(|(p, q)| xs.get(p).is_some() && xs.get(p) == ys.get(q))
                .unwrap_or(false);
            Some(Comparison {
                at,
                positions,
                is_match,
            })
        })
    }
}

/// Last highlighted program line at `index`.
pub fn code_line(events: &[Event], index: usize) -> Option<CodeLine> {
    visible(events, index).iter().rev().find_map(|e| match *e {
        Event::Code { line } => Some(line),
        _ => None,
    })
}

/// LCS length once the final cell `(n, m)` has been committed or returned.
pub fn lcs_length(events: &[Event], index: usize) -> Option<u32> {
    let (xs, ys) = dims(events);
    let goal = Coord::new(xs.len(), ys.len());
    visible(events, index).iter().rev().find_map(|e| match *e {
        Event::SetValue { i, j, value } | Event::CallEnd { i, j, value }
            if Coord::new(i, j) == goal =>
        {
            Some(value)
        }
        _ => None,
    })
}

/// One cell on the backtracking path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathStep {
    pub at: Coord,
    /// The characters at this cell matched and were taken.
    pub is_match: bool,
}

/// Result of walking the table back from `(n, m)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Backtrack {
    /// Visited cells from `(n, m)` towards the origin, excluding the base cell
    /// where the walk stops.
    pub path: Vec<PathStep>,
    /// The reconstructed common subsequence.
    pub sequence: String,
}

/// Walk back from `(n, m)` using `value` for table lookups.
///
/// A match takes the character and moves diagonally. Otherwise the walk
/// moves to `(i-1, j)` when its value is at least that of `(i, j-1)`, and to
/// `(i, j-1)` otherwise. It stops on row 0 or column 0.
pub fn backtrack<F>(x: &str, y: &str, value: F) -> Backtrack
where
    F: Fn(Coord) -> u32,
{
    let xs: Vec<char> = x.chars().collect();
    let ys: Vec<char> = y.chars().collect();
    let (mut i, mut j) = (xs.len(), ys.len());
    let mut path = Vec::with_capacity(i + j);
    let mut taken = Vec::new();

    while i > 0 && j > 0 {
        let at = Coord::new(i, j);
        if xs[i - 1] == ys[j - 1] {
            taken.push(xs[i - 1]);
            path.push(PathStep { at, is_match: true });
            i -= 1;
            j -= 1;
        } else {
            path.push(PathStep { at, is_match: false });
            if value(Coord::new(i - 1, j)) >= value(Coord::new(i, j - 1)) {
                i -= 1;
            } else {
                j -= 1;
            }
        }
    }

    Backtrack {
        path,
        sequence: taken.into_iter().rev().collect(),
    }
}

/// Backtrack over the values recorded in `events[..=index]`.
///
/// Uses `SetValue` (tabulation) and `CallEnd` (memoized) values; the walk
/// only reads cells that either mode has resolved by the time `(n, m)` is.
/// Returns `None` until the final cell has been reached.
pub fn backtrack_at(events: &[Event], index: usize) -> Option<Backtrack> {
    lcs_length(events, index)?;
    let (x, y) = inputs(events)?;
    let mut recorded: HashMap<Coord, u32> = HashMap::new();
    for e in visible(events, index) {
        if let Event::SetValue { i, j, value } | Event::CallEnd { i, j, value } = *e {
            recorded.insert(Coord::new(i, j), value);
        }
    }
    Some(backtrack(x, y, |at| recorded.get(&at).copied().unwrap_or(0)))
}

/// Everything derivable at one cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub index: usize,
    pub grid: Grid,
    pub tree: CallTree,
    pub code_line: Option<CodeLine>,
    pub comparison: Option<Comparison>,
    pub lcs_length: Option<u32>,
    pub backtrack: Option<Backtrack>,
}

impl Snapshot {
    pub fn at(events: &[Event], index: usize) -> Self {
        let index = index.min(events.len().saturating_sub(1));
        Snapshot {
            index,
            grid: Grid::at(events, index),
            tree: CallTree::at(events, index),
            code_line: code_line(events, index),
            comparison: Comparison::at(events, index),
            lcs_length: lcs_length(events, index),
            backtrack: backtrack_at(events, index),
        }
    }

    /// The final cell has been reached.
    pub fn is_complete(&self) -> bool {
        self.lcs_length.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{memo, tabulation};

    #[test]
    fn visible_clamps_index() {
        let events = tabulation::generate("A", "A");
        assert_eq!(visible(&events, 100).len(), events.len());
        assert_eq!(visible(&events, 0).len(), 1);
        assert!(visible(&[], 3).is_empty());
    }

    #[test]
    fn transfer_value_lands_after_the_transfer_step() {
        let events = tabulation::generate("A", "A");
        // 3 = transfer into (1,1), 4 = SetValue.
        assert!(matches!(events[3], Event::Transfer { .. }));
        let during = Grid::at(&events, 3);
        assert_eq!(during.value(Coord::new(1, 1)), None);
        assert!(during.deps.is_empty());
        let after = Grid::at(&events, 4);
        assert_eq!(after.value(Coord::new(1, 1)), Some(1));
    }

    #[test]
    fn deps_narrow_then_clear() {
        let events = tabulation::generate("A", "B");
        assert_eq!(Grid::at(&events, 1).deps, vec![]);
        assert_eq!(
            Grid::at(&events, 2).deps,
            vec![Coord::new(0, 1), Coord::new(1, 0)]
        );
        assert_eq!(Grid::at(&events, 3).deps, vec![Coord::new(0, 1)]);
        assert_eq!(Grid::at(&events, 3).active, Some(Coord::new(1, 1)));
        assert!(Grid::at(&events, 5).deps.is_empty());
    }

    #[test]
    fn memo_grid_fills_from_node_transfers() {
        let events = memo::generate("AB", "BC");
        let last = events.len() - 1;
        let grid = Grid::at(&events, last);
        // The root's own transfer is current, so it is still in flight.
        assert_eq!(grid.value(Coord::new(2, 2)), None);
        assert_eq!(grid.value(Coord::new(2, 1)), Some(1));
        assert_eq!(grid.value(Coord::new(0, 2)), Some(0));
    }

    #[test]
    fn memo_source_only_while_hit_is_current() {
        let events = memo::generate("AB", "BC");
        let k = events
            .iter()
            .position(|e| matches!(e, Event::MemoHit { .. }))
            .unwrap();
        assert_eq!(Grid::at(&events, k).memo_source, Some(Coord::new(1, 0)));
        assert_eq!(Grid::at(&events, k + 1).memo_source, None);
    }

    #[test]
    fn call_tree_tracks_states_and_edges() {
        let events = memo::generate("A", "B");
        let tree = CallTree::at(&events, events.len() - 1);
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.root().map(|n| n.at), Some(Coord::new(1, 1)));
        assert_eq!(
            tree.children(Coord::new(1, 1)).collect::<Vec<_>>(),
            vec![Coord::new(0, 1), Coord::new(1, 0)]
        );
        assert!(tree
            .nodes
            .iter()
            .all(|n| n.state == NodeState::Done(0)));
        assert_eq!(tree.active, None);

        // Right after the root call starts, it is the only active node.
        let tree = CallTree::at(&events, 2);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].state, NodeState::Active);
    }

    #[test]
    fn call_tree_classifies_memo_consumers() {
        // (2,1) matches and its only child (1,0) is served from the memo.
        let events = memo::generate("AB", "BC");
        let tree = CallTree::at(&events, events.len() - 1);
        let node = tree.node(Coord::new(2, 1)).unwrap();
        assert_eq!(node.memo_class, Some(MemoClass::Full));
        assert_eq!(tree.node(Coord::new(1, 0)).unwrap().state, NodeState::Memo(0));
        let root = tree.node(Coord::new(2, 2)).unwrap();
        assert_eq!(root.memo_class, None);
    }

    #[test]
    fn comparison_follows_latest_call() {
        let events = memo::generate("AB", "BC");
        let cmp = Comparison::at(&events, 2).unwrap();
        assert_eq!(cmp.at, Coord::new(2, 2));
        assert_eq!(cmp.positions, Some((1, 1)));
        assert!(!cmp.is_match);
        assert_eq!(Comparison::at(&events, 0), None);
    }

    #[test]
    fn code_line_and_length() {
        let events = tabulation::generate("AB", "AB");
        let last = events.len() - 1;
        assert_eq!(code_line(&events, last), Some(CodeLine::Return));
        assert_eq!(code_line(&events, 0), None);
        assert_eq!(lcs_length(&events, last), Some(2));
        assert_eq!(lcs_length(&events, 1), None);
    }

    #[test]
    fn backtrack_prefers_previous_row_on_ties() {
        // "AB" vs "BA": dp(1,2)=1 and dp(2,1)=1 tie at (2,2), so the walk
        // goes to (1,2) and takes "A".
        let events = tabulation::generate("AB", "BA");
        let bt = backtrack_at(&events, events.len() - 1).unwrap();
        assert_eq!(bt.sequence, "A");
        assert_eq!(bt.path[0], PathStep { at: Coord::new(2, 2), is_match: false });
        assert_eq!(bt.path[1], PathStep { at: Coord::new(1, 2), is_match: true });
    }

    #[test]
    fn backtrack_unavailable_until_complete() {
        let events = tabulation::generate("ABC", "BDC");
        let final_set = events
            .iter()
            .position(|e| matches!(e, Event::SetValue { i: 3, j: 3, .. }))
            .unwrap();
        assert!(backtrack_at(&events, final_set - 1).is_none());
        assert!(backtrack_at(&events, final_set).is_some());
        let snap = Snapshot::at(&events, events.len() + 10);
        assert!(snap.is_complete());
        assert_eq!(snap.index, events.len() - 1);
        assert_eq!(snap.backtrack.map(|b| b.sequence), Some("BC".to_owned()));
    }
}
